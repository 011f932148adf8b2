use serde::{Deserialize, Serialize};

/// A single object-storage change the pipeline is asked to handle.
///
/// `key` is already URL-decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub bucket: String,
    pub key: String,
}

impl ChangeNotification {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// An object key split into path prefix, base name and extension.
///
/// `prefix + name + extension` always equals the key it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedKey {
    /// Everything up to and including the last `/`; empty for top-level keys.
    pub prefix: String,
    pub name: String,
    /// Extension including the leading dot, e.g. `.jpg`.
    pub extension: String,
}

impl ParsedKey {
    /// The extension without its leading dot, e.g. `jpg`.
    pub fn bare_extension(&self) -> &str {
        &self.extension[1..]
    }

    pub fn to_key(&self) -> String {
        format!("{}{}{}", self.prefix, self.name, self.extension)
    }
}
