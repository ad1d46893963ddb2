use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::error::{GraphError, SkipReason};
use crate::resolver::normalize_path;

use super::{FileRef, FileSource, SourceFuture};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("repo-graph/", env!("CARGO_PKG_VERSION"));

static REPO_URL_RE: OnceLock<Regex> = OnceLock::new();

fn repo_url_re() -> &'static Regex {
    REPO_URL_RE.get_or_init(|| {
        Regex::new(r"(?i)^https?://github\.com/([^/]+)/([^/]+)(?:/|$)")
            .expect("invalid repository URL pattern")
    })
}

/// Owner/repository identity parsed from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse `https://github.com/<owner>/<repo>[/anything]`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidRepoUrl`] for anything else.
    pub fn parse(url: &str) -> Result<Self, GraphError> {
        let caps = repo_url_re()
            .captures(url.trim())
            .ok_or_else(|| GraphError::InvalidRepoUrl(url.to_owned()))?;
        Ok(Self {
            owner: caps[1].to_owned(),
            repo: caps[2].to_owned(),
        })
    }
}

/// Response of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Live source backed by the GitHub REST API and the raw content host.
pub struct GitHubSource {
    client: Client,
    repo: RepoRef,
    api_base: String,
    raw_base: String,
    reference: String,
    token: Option<String>,
}

impl GitHubSource {
    /// Build a source for `repo`. The token is read once from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(repo: RepoRef, config: &GithubConfig) -> Result<Self, GraphError> {
        let client = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()?;
        let token = std::env::var(config.token_env())
            .ok()
            .filter(|t| !t.trim().is_empty());
        Ok(Self {
            client,
            repo,
            api_base: config.api_base().trim_end_matches('/').to_owned(),
            raw_base: config.raw_base().trim_end_matches('/').to_owned(),
            reference: config.reference().to_owned(),
            token,
        })
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, self.repo.owner, self.repo.repo, self.reference
        )
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base, self.repo.owner, self.repo.repo, self.reference, path
        )
    }

    async fn list_tree(&self) -> Result<Vec<FileRef>, GraphError> {
        let mut request = self
            .client
            .get(self.tree_url())
            .header(ACCEPT, GITHUB_ACCEPT);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GraphError::Listing {
                status: status.as_u16(),
                body,
            });
        }

        let tree: TreeResponse = serde_json::from_str(&body)?;
        if tree.truncated {
            tracing::warn!(
                owner = %self.repo.owner,
                repo = %self.repo.repo,
                "repository tree listing was truncated by GitHub"
            );
        }

        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| {
                let path = normalize_path(&entry.path);
                FileRef {
                    content_locator: self.raw_url(&path),
                    path,
                }
            })
            .collect())
    }

    async fn fetch_raw(&self, url: &str) -> Result<String, SkipReason> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SkipReason::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SkipReason::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| SkipReason::Transport(e.to_string()))
    }
}

impl FileSource for GitHubSource {
    fn enumerate(&self) -> SourceFuture<'_, Result<Vec<FileRef>, GraphError>> {
        Box::pin(self.list_tree())
    }

    fn fetch<'a>(&'a self, file: &'a FileRef) -> SourceFuture<'a, Result<String, SkipReason>> {
        Box::pin(self.fetch_raw(&file.content_locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url() {
        let r = RepoRef::parse("https://github.com/vercel/next.js").unwrap();
        assert_eq!(r.owner, "vercel");
        assert_eq!(r.repo, "next.js");
    }

    #[test]
    fn test_parse_repo_url_with_trailing_path() {
        let r = RepoRef::parse("https://github.com/owner/repo/tree/main/src").unwrap();
        assert_eq!(r, RepoRef { owner: "owner".into(), repo: "repo".into() });
    }

    #[test]
    fn test_parse_repo_url_case_insensitive_and_http() {
        let r = RepoRef::parse("HTTP://GitHub.com/Owner/Repo/").unwrap();
        assert_eq!(r.owner, "Owner");
        assert_eq!(r.repo, "Repo");
    }

    #[test]
    fn test_parse_repo_url_rejects_malformed() {
        for bad in [
            "",
            "github.com/owner/repo",
            "https://gitlab.com/owner/repo",
            "https://github.com/owner",
            "https://github.com/owner/",
            "not a url",
        ] {
            let err = RepoRef::parse(bad).unwrap_err();
            assert!(
                matches!(err, GraphError::InvalidRepoUrl(_)),
                "expected InvalidRepoUrl for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_urls_are_built_from_config() {
        let config = GithubConfig {
            api_base: Some("https://ghe.example.com/api/v3/".into()),
            raw_base: Some("https://raw.example.com".into()),
            reference: Some("main".into()),
            token_env: Some("REPO_GRAPH_TEST_UNSET_TOKEN".into()),
            timeout_secs: Some(1),
        };
        let repo = RepoRef { owner: "o".into(), repo: "r".into() };
        let source = GitHubSource::new(repo, &config).unwrap();
        assert_eq!(
            source.tree_url(),
            "https://ghe.example.com/api/v3/repos/o/r/git/trees/main?recursive=1"
        );
        assert_eq!(source.raw_url("src/a.ts"), "https://raw.example.com/o/r/main/src/a.ts");
        assert!(source.token.is_none());
    }

    /// Canned `(request target, status, body)` triples; anything else answers 404.
    type Routes = Vec<(&'static str, u16, &'static str)>;

    /// Serve `routes` over HTTP/1.1 on a loopback port and return its base URL.
    async fn serve(routes: Routes) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&request);
                    let target = head.split_whitespace().nth(1).unwrap_or_default();
                    let (status, body) = routes
                        .iter()
                        .find(|(path, _, _)| *path == target)
                        .map(|(_, status, body)| (*status, *body))
                        .unwrap_or((404, "Not Found"));
                    let response = format!(
                        "HTTP/1.1 {status} Canned\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn source_at(base: &str, repo: &str) -> GitHubSource {
        let config = GithubConfig {
            api_base: Some(base.to_owned()),
            raw_base: Some(base.to_owned()),
            reference: None,
            token_env: Some("REPO_GRAPH_TEST_UNSET_TOKEN".into()),
            timeout_secs: Some(5),
        };
        let repo = RepoRef { owner: "o".into(), repo: repo.into() };
        GitHubSource::new(repo, &config).unwrap()
    }

    const TREE_BODY: &str = r#"{
        "sha": "abc",
        "tree": [
            {"path": "src", "type": "tree", "mode": "040000"},
            {"path": "src/a.ts", "type": "blob", "size": 20},
            {"path": "src/gone.ts", "type": "blob", "size": 10},
            {"path": "vendor/lib", "type": "commit"}
        ],
        "truncated": false
    }"#;

    #[tokio::test]
    async fn test_listing_keeps_blobs_and_fetches_raw_content() {
        let base = serve(vec![
            ("/repos/o/r/git/trees/HEAD?recursive=1", 200, TREE_BODY),
            ("/o/r/HEAD/src/a.ts", 200, "import b from './b';"),
        ])
        .await;
        let source = source_at(&base, "r");

        let files = source.enumerate().await.unwrap();
        assert_eq!(
            files,
            vec![
                FileRef {
                    path: "src/a.ts".into(),
                    content_locator: format!("{base}/o/r/HEAD/src/a.ts"),
                },
                FileRef {
                    path: "src/gone.ts".into(),
                    content_locator: format!("{base}/o/r/HEAD/src/gone.ts"),
                },
            ]
        );

        assert_eq!(source.fetch(&files[0]).await.unwrap(), "import b from './b';");
        assert_eq!(source.fetch(&files[1]).await, Err(SkipReason::Status(404)));
    }

    #[tokio::test]
    async fn test_listing_error_status_is_fatal() {
        let base = serve(vec![(
            "/repos/o/denied/git/trees/HEAD?recursive=1",
            403,
            "rate limited",
        )])
        .await;
        let source = source_at(&base, "denied");

        let err = source.enumerate().await.unwrap_err();
        match err {
            GraphError::Listing { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Listing error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_listing_with_unexpected_payload_is_decode_error() {
        let base = serve(vec![("/repos/o/r/git/trees/HEAD?recursive=1", 200, "not json")]).await;
        let err = source_at(&base, "r").enumerate().await.unwrap_err();
        assert!(matches!(err, GraphError::Decode(_)), "got {err:?}");
    }
}
