/// Source extensions scanned when no allowlist is configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Return true if `path` ends in `.<ext>` for one of `extensions`.
///
/// Matching is case-insensitive (`App.TSX` counts). A leading dot in a
/// configured extension is ignored, so `".ts"` and `"ts"` are equivalent.
pub fn has_source_extension(path: &str, extensions: &[String]) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_default_allowlist() {
        let exts = defaults();
        assert!(has_source_extension("src/a.ts", &exts));
        assert!(has_source_extension("src/a.tsx", &exts));
        assert!(has_source_extension("a.js", &exts));
        assert!(has_source_extension("lib/b.jsx", &exts));
        assert!(!has_source_extension("src/a.rs", &exts));
        assert!(!has_source_extension("src/a.d.mts", &exts));
        assert!(!has_source_extension("README", &exts));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(has_source_extension("src/App.TSX", &defaults()));
    }

    #[test]
    fn test_dotted_directory_does_not_count() {
        assert!(!has_source_extension("src.ts/README", &defaults()));
    }

    #[test]
    fn test_leading_dot_in_allowlist() {
        let exts = vec![".mjs".to_string()];
        assert!(has_source_extension("x/y.mjs", &exts));
    }
}
