//! Object key parsing

use imgshrink_core::ParsedKey;

/// Split an object key into `<prefix/><name><.extension>`.
///
/// The prefix ends at the last `/`, the extension starts at the last `.` of the file
/// name. Returns `None` when there is no file name, no dot, nothing before the dot
/// (`.png`), or nothing after it (`cat.`).
pub fn split_key(key: &str) -> Option<ParsedKey> {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    let (prefix, file_name) = key.split_at(name_start);

    let dot = file_name.rfind('.')?;
    let (name, extension) = file_name.split_at(dot);

    if name.is_empty() || extension.len() < 2 {
        return None;
    }

    Some(ParsedKey {
        prefix: prefix.to_string(),
        name: name.to_string(),
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nested_key() {
        let parsed = split_key("album/2024/cat.jpg").unwrap();
        assert_eq!(parsed.prefix, "album/2024/");
        assert_eq!(parsed.name, "cat");
        assert_eq!(parsed.extension, ".jpg");
    }

    #[test]
    fn test_split_top_level_key() {
        let parsed = split_key("cat.png").unwrap();
        assert_eq!(parsed.prefix, "");
        assert_eq!(parsed.name, "cat");
        assert_eq!(parsed.extension, ".png");
    }

    #[test]
    fn test_split_uses_last_dot() {
        let parsed = split_key("backups/cat.tar.jpeg").unwrap();
        assert_eq!(parsed.name, "cat.tar");
        assert_eq!(parsed.extension, ".jpeg");
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        assert_eq!(split_key("v1.2/README"), None);

        let parsed = split_key("v1.2/cat.jpg").unwrap();
        assert_eq!(parsed.prefix, "v1.2/");
        assert_eq!(parsed.name, "cat");
    }

    #[test]
    fn test_split_rejects_keys_without_extension() {
        assert_eq!(split_key(""), None);
        assert_eq!(split_key("README"), None);
        assert_eq!(split_key("album/"), None);
        assert_eq!(split_key("album/cat."), None);
        assert_eq!(split_key("album/.jpg"), None);
        assert_eq!(split_key(".jpg"), None);
    }

    #[test]
    fn test_split_keeps_case() {
        let parsed = split_key("Album/Cat.JPG").unwrap();
        assert_eq!(parsed.extension, ".JPG");
    }

    #[test]
    fn test_split_reconstructs_key() {
        let keys = [
            "cat.jpg",
            "album/cat.jpg",
            "a/b/c/d.e.f.png",
            "with space/my photo.jpeg",
            "unicode/貓.png",
            "//double//slash.jpg",
        ];
        for key in keys {
            let parsed = split_key(key).unwrap();
            assert_eq!(parsed.to_key(), key);
        }
    }
}
