//! Response shapes for the GitHub REST API endpoints we call.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::Value;

use crate::sources::SourceError;

/// Response from `/search/users`
#[derive(Debug, Deserialize)]
pub struct SearchUsersResponse {
    #[serde(default)]
    pub total_count: u64,

    /// Raw user items, passed through to candidates untouched
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Repository entry from `/users/{user}/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// User entry from `/users/{user}`
#[derive(Debug, Clone, Deserialize)]
pub struct UserMetadata {
    pub login: String,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
}

/// README resource from `/repos/{owner}/{repo}/readme`
#[derive(Debug, Clone, Deserialize)]
pub struct Readme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Readme {
    /// Decode the README text.
    ///
    /// Base64 content may be wrapped across lines. Bytes that are not valid
    /// UTF-8 are replaced rather than rejected.
    pub fn decode(&self) -> Result<String, SourceError> {
        match self.encoding.as_deref() {
            Some(encoding) if !encoding.eq_ignore_ascii_case("base64") => {
                Ok(self.content.clone())
            }
            _ => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD.decode(compact.as_bytes())?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}

/// Query parameters for a repository listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoListing {
    pub sort: Option<&'static str>,
    pub per_page: u32,
}

impl RepoListing {
    /// The single most-starred repository
    pub fn top_starred() -> Self {
        Self {
            sort: Some("stars"),
            per_page: 1,
        }
    }

    /// First page of repositories in default order
    pub fn first_page(per_page: u32) -> Self {
        Self {
            sort: None,
            per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readme_decode_wrapped_base64() {
        // "Contact: maintainer@proj.dev\n" split over two lines
        let readme = Readme {
            name: Some("README.md".to_string()),
            content: "Q29udGFjdDogbWFpbnRhaW5lckBw\ncm9qLmRldgo=\n".to_string(),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(readme.decode().unwrap(), "Contact: maintainer@proj.dev\n");
    }

    #[test]
    fn test_readme_decode_replaces_invalid_utf8() {
        // 0xFF 0x41 -> replacement char followed by "A"
        let readme = Readme {
            name: None,
            content: "/0E=".to_string(),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(readme.decode().unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn test_readme_decode_rejects_bad_base64() {
        let readme = Readme {
            name: None,
            content: "!!not base64!!".to_string(),
            encoding: Some("base64".to_string()),
        };
        assert!(matches!(readme.decode(), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_readme_plain_encoding_passthrough() {
        let readme = Readme {
            name: None,
            content: "plain text".to_string(),
            encoding: Some("utf-8".to_string()),
        };
        assert_eq!(readme.decode().unwrap(), "plain text");
    }

    #[test]
    fn test_repository_defaults() {
        let repo: Repository = serde_json::from_str(r#"{"name": "tiny"}"#).unwrap();
        assert_eq!(repo.stargazers_count, 0);
        assert_eq!(repo.forks_count, 0);
    }

    #[test]
    fn test_repo_listing_presets() {
        assert_eq!(RepoListing::top_starred().sort, Some("stars"));
        assert_eq!(RepoListing::top_starred().per_page, 1);
        assert_eq!(RepoListing::first_page(100).sort, None);
    }
}
