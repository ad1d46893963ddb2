use std::path::{Path, PathBuf};

use crate::error::{GraphError, SkipReason};

use super::{FileRef, FileSource, SourceFuture};

/// Source backed by a checked-out directory on disk.
///
/// Respects `.gitignore` rules and always excludes `node_modules` and `.git`.
/// Other dot-directories are listed. Paths are reported relative to the root
/// with forward slashes; the content locator is the file's absolute path.
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileSource for LocalSource {
    fn enumerate(&self) -> SourceFuture<'_, Result<Vec<FileRef>, GraphError>> {
        let root = self.root.clone();
        Box::pin(async move {
            let walk_root = root.clone();
            // The walk is blocking filesystem work; keep it off the async workers.
            tokio::task::spawn_blocking(move || walk_repository(&walk_root))
                .await
                .unwrap_or_else(|join_err| {
                    Err(GraphError::LocalRoot {
                        path: root,
                        source: std::io::Error::other(join_err.to_string()),
                    })
                })
        })
    }

    fn fetch<'a>(&'a self, file: &'a FileRef) -> SourceFuture<'a, Result<String, SkipReason>> {
        Box::pin(async move {
            tokio::fs::read_to_string(&file.content_locator)
                .await
                .map_err(|e| SkipReason::Io(e.to_string()))
        })
    }
}

/// Walk `root` and list every file, sorted by path.
///
/// Content locators are absolute: `root` is canonicalized before walking.
fn walk_repository(root: &Path) -> Result<Vec<FileRef>, GraphError> {
    let root_error = |source| GraphError::LocalRoot {
        path: root.to_path_buf(),
        source,
    };
    let canonical = std::fs::canonicalize(root).map_err(root_error)?;
    if !canonical.is_dir() {
        return Err(root_error(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    let root = canonical.as_path();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        // Dot-directories such as `.storybook/` are part of the repository tree.
        .hidden(false)
        // Read .gitignore files even when the directory is not inside a git repository.
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("walk error: {err}");
                continue;
            }
        };

        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        if path_has_skipped_component(root, path) {
            continue;
        }

        let Some(relative) = repo_relative(root, path) else {
            continue;
        };
        files.push(FileRef {
            path: relative,
            content_locator: path.to_string_lossy().into_owned(),
        });
    }

    Ok(files)
}

/// Directory names never listed, whatever the ignore files say.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Returns true if a component of `path` below `root` is one of [`SKIPPED_DIRS`].
fn path_has_skipped_component(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| SKIPPED_DIRS.iter().any(|dir| c.as_os_str() == *dir))
}

/// Forward-slash path of `path` relative to `root`, or `None` if it lies outside.
fn repo_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[tokio::test]
    async fn test_enumerate_lists_relative_sorted_paths() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src/util")).unwrap();
        fs::write(dir.path().join("src/util/b.ts"), "").unwrap();
        fs::write(dir.path().join("src/a.ts"), "").unwrap();
        fs::write(dir.path().join("README.md"), "# hi").unwrap();

        let source = LocalSource::new(dir.path());
        let files = source.enumerate().await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "src/a.ts", "src/util/b.ts"]);
    }

    #[tokio::test]
    async fn test_enumerate_excludes_node_modules_and_gitignored() {
        let dir = tmp();
        let nm = dir.path().join("node_modules").join("pkg");
        fs::create_dir_all(&nm).unwrap();
        fs::write(nm.join("index.js"), "").unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/out.js"), "").unwrap();
        fs::write(dir.path().join(".gitignore"), "dist/\n").unwrap();
        fs::write(dir.path().join("app.js"), "").unwrap();

        let source = LocalSource::new(dir.path());
        let files = source.enumerate().await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".gitignore", "app.js"]);
    }

    #[tokio::test]
    async fn test_enumerate_lists_dot_directories_but_not_git() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join(".storybook")).unwrap();
        fs::write(dir.path().join(".storybook/main.ts"), "").unwrap();
        fs::create_dir_all(dir.path().join(".git/refs")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::write(dir.path().join("index.ts"), "").unwrap();

        let source = LocalSource::new(dir.path());
        let files = source.enumerate().await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec![".storybook/main.ts", "index.ts"]);
    }

    #[tokio::test]
    async fn test_locator_is_absolute_for_non_canonical_root() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.ts"), "import b from './b';").unwrap();

        // `<tmp>/src/..` names the same directory without being canonical.
        let source = LocalSource::new(dir.path().join("src").join(".."));
        let files = source.enumerate().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/a.ts");

        let expected = fs::canonicalize(dir.path()).unwrap().join("src").join("a.ts");
        assert_eq!(Path::new(&files[0].content_locator), expected.as_path());
        assert!(Path::new(&files[0].content_locator).is_absolute());
        assert_eq!(source.fetch(&files[0]).await.unwrap(), "import b from './b';");
    }

    #[tokio::test]
    async fn test_fetch_reads_content() {
        let dir = tmp();
        fs::write(dir.path().join("a.ts"), "import b from './b';").unwrap();

        let source = LocalSource::new(dir.path());
        let files = source.enumerate().await.unwrap();
        let text = source.fetch(&files[0]).await.unwrap();
        assert_eq!(text, "import b from './b';");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_a_skip() {
        let source = LocalSource::new("/nonexistent-root");
        let file = FileRef {
            path: "gone.ts".into(),
            content_locator: "/nonexistent-root/gone.ts".into(),
        };
        let err = source.fetch(&file).await.unwrap_err();
        assert!(matches!(err, SkipReason::Io(_)));
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let dir = tmp();
        let source = LocalSource::new(dir.path().join("missing"));
        let err = source.enumerate().await.unwrap_err();
        assert!(matches!(err, GraphError::LocalRoot { .. }));
    }
}
