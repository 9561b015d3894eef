use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{AtlasError, AtlasResult};
use crate::models::Project;

/// Where the map viewer gets its projects from.
#[async_trait]
pub trait ProjectFeed: Send + Sync {
    async fn load(&self) -> AtlasResult<Vec<Project>>;

    /// Shown in the map title.
    fn describe(&self) -> String;
}

/// A JSON array of projects, either a local file or anything served over
/// HTTP (including the API's own `/projects`).
#[derive(Clone)]
pub enum FeedSource {
    File(PathBuf),
    Remote { client: Client, url: String },
}

impl FeedSource {
    pub fn parse(source: &str, client: Client) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            FeedSource::Remote {
                client,
                url: source.to_string(),
            }
        } else {
            FeedSource::File(PathBuf::from(source))
        }
    }
}

#[async_trait]
impl ProjectFeed for FeedSource {
    async fn load(&self) -> AtlasResult<Vec<Project>> {
        let body = match self {
            FeedSource::File(path) => {
                debug!(path = %path.display(), "reading project feed");
                tokio::fs::read(path).await?
            }
            FeedSource::Remote { client, url } => {
                debug!(%url, "fetching project feed");
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AtlasError::status(status, format!("Feed returned {status}")));
                }
                response.bytes().await?.to_vec()
            }
        };

        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        match self {
            FeedSource::File(path) => path.display().to_string(),
            FeedSource::Remote { url, .. } => url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn urls_are_remote_and_everything_else_is_a_path() {
        assert!(matches!(
            FeedSource::parse("https://atlas.example/api/projects", Client::new()),
            FeedSource::Remote { .. }
        ));
        assert!(matches!(
            FeedSource::parse("data/projects.json", Client::new()),
            FeedSource::File(_)
        ));
    }

    #[tokio::test]
    async fn loads_projects_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Site C","status":"In-Progress","province":"British Columbia","city":"Fort St. John","budget":16000000000,"latitude":56.2,"longitude":-120.9}}]"#
        )
        .unwrap();

        let feed = FeedSource::File(file.path().to_path_buf());
        let projects = feed.load().await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].coordinates(), Some((56.2, -120.9)));
    }

    #[tokio::test]
    async fn malformed_feed_is_a_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"an array\"}}").unwrap();

        let feed = FeedSource::File(file.path().to_path_buf());
        assert!(matches!(feed.load().await, Err(AtlasError::Decode(_))));
    }
}
