pub mod feed;
pub mod geocoder;

use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AtlasError, AtlasResult};
use crate::models::{
    Assignment, Company, ImportReport, NewAssignment, NewCompany, NewProject, Project, RecordKind,
};

pub use feed::{FeedSource, ProjectFeed};
pub use geocoder::{Geocoder, NominatimGeocoder};

/// Remote persistence for projects, companies and assignments.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn load_projects(&self) -> AtlasResult<Vec<Project>>;
    async fn load_companies(&self) -> AtlasResult<Vec<Company>>;
    async fn load_assignments(&self) -> AtlasResult<Vec<Assignment>>;

    async fn create_project(&self, project: &NewProject) -> AtlasResult<Project>;
    async fn create_company(&self, company: &NewCompany) -> AtlasResult<Company>;
    async fn create_assignment(&self, assignment: &NewAssignment) -> AtlasResult<Assignment>;

    async fn delete(&self, kind: RecordKind, id: i64) -> AtlasResult<()>;

    async fn import_projects(&self, upload: ImportUpload) -> AtlasResult<ImportReport>;
}

/// A file read from disk, ready to be sent to the batch import endpoint.
#[derive(Debug, Clone)]
pub struct ImportUpload {
    pub file_name: String,
    pub mime: mime::Mime,
    pub bytes: Vec<u8>,
}

impl ImportUpload {
    pub async fn read(path: &Path) -> AtlasResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import".to_string());

        Ok(Self {
            mime: guess_mime(path),
            file_name,
            bytes,
        })
    }
}

fn guess_mime(path: &Path) -> mime::Mime {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => mime::TEXT_CSV,
        "json" => mime::APPLICATION_JSON,
        "txt" => mime::TEXT_PLAIN,
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        "xls" => "application/vnd.ms-excel"
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Error body the API sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turn a non-success response into [`AtlasError::Status`], preferring the
/// server's own `error` message over `fallback`.
async fn check(response: Response, fallback: &str) -> AtlasResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    Err(AtlasError::status(status, message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> AtlasResult<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// HTTP client for the records API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_list<T: DeserializeOwned>(&self, kind: RecordKind) -> AtlasResult<Vec<T>> {
        let url = self.url(kind.endpoint());
        debug!(%url, "fetching collection");

        let response = self.client.get(&url).send().await?;
        let response = check(response, &format!("Failed to load {}", kind.plural())).await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, kind: RecordKind, body: &B) -> AtlasResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(kind.endpoint());
        debug!(%url, "creating record");

        let response = self.client.post(&url).json(body).send().await?;
        let response = check(response, &format!("Failed to save {}", kind.singular())).await?;
        decode(response).await
    }
}

/// Shared client setup: timeout and a user agent, which the geocoder
/// requires of every caller.
pub fn http_client(config: &Config) -> AtlasResult<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[async_trait]
impl RemoteStore for ApiClient {
    async fn load_projects(&self) -> AtlasResult<Vec<Project>> {
        self.get_list(RecordKind::Project).await
    }

    async fn load_companies(&self) -> AtlasResult<Vec<Company>> {
        self.get_list(RecordKind::Company).await
    }

    async fn load_assignments(&self) -> AtlasResult<Vec<Assignment>> {
        self.get_list(RecordKind::Assignment).await
    }

    async fn create_project(&self, project: &NewProject) -> AtlasResult<Project> {
        self.post_json(RecordKind::Project, project).await
    }

    async fn create_company(&self, company: &NewCompany) -> AtlasResult<Company> {
        self.post_json(RecordKind::Company, company).await
    }

    async fn create_assignment(&self, assignment: &NewAssignment) -> AtlasResult<Assignment> {
        self.post_json(RecordKind::Assignment, assignment).await
    }

    async fn delete(&self, kind: RecordKind, id: i64) -> AtlasResult<()> {
        let url = self.url(&format!("{}/{}", kind.endpoint(), id));
        info!(%url, "deleting record");

        let response = self.client.delete(&url).send().await?;
        check(response, &format!("Failed to delete {}", kind.singular())).await?;
        Ok(())
    }

    async fn import_projects(&self, upload: ImportUpload) -> AtlasResult<ImportReport> {
        let url = self.url("projects/import");
        info!(%url, file = %upload.file_name, bytes = upload.bytes.len(), "uploading import file");

        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime.as_ref())?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let response = check(response, "Import failed").await?;
        decode(response).await
    }
}
