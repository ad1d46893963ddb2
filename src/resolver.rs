/// Convert Windows-style separators to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve a relative import specifier against the importing file's location.
///
/// The result is the specifier rewritten to a repository-relative path: no
/// file-existence check, no extension probing, no `index` lookup. A `..` that
/// would climb above the repository root is dropped silently.
pub fn resolve(importer: &str, specifier: &str) -> String {
    let importer = normalize_path(importer);
    let dir = match importer.rfind('/') {
        Some(pos) => &importer[..pos],
        None => "",
    };
    let joined = format!("{dir}/{}", normalize_path(specifier));

    let mut stack: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            ".." => {
                stack.pop();
            }
            "." | "" => {}
            other => stack.push(other),
        }
    }
    stack.join("/")
}
