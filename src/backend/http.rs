//! HTTP backend over the mobility API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Credential, MapBackend};
use crate::config::MaprConfig;
use crate::error::{MaprError, Result};
use crate::model::{BoundingBox, Project, ProjectDetail, ResolutionLevel};

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &MaprConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mobi_mapr/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self { client, base_url: config.api_base_url.trim_end_matches('/').to_string() })
    }

    pub fn bounds_url(&self, project: &Project) -> String {
        format!("{}/tiles/bounds?project={}", self.base_url, project.id)
    }

    pub fn detail_url(&self, project: &Project, feature_id: &str, level: ResolutionLevel) -> String {
        format!(
            "{}/projects/{}/features/{}?level={}",
            self.base_url,
            project.id,
            urlencoding::encode(feature_id),
            level.as_str()
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, credential: &Credential) -> Result<T> {
        debug!("GET {}", url);
        let (key, value) = credential.query_pair();
        let response = self.client.get(url).query(&[(key, value)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MaprError::BackendStatus { status: status.as_u16(), endpoint: url.to_string() });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MapBackend for HttpBackend {
    async fn fetch_bounds(&self, project: &Project, credential: &Credential) -> Result<BoundingBox> {
        let bbox: BoundingBox = self.get_json(&self.bounds_url(project), credential).await?;
        if !bbox.is_valid() {
            return Err(MaprError::InvalidBounds);
        }
        Ok(bbox)
    }

    async fn fetch_detail(
        &self,
        project: &Project,
        feature_id: &str,
        level: ResolutionLevel,
        credential: &Credential,
    ) -> Result<ProjectDetail> {
        self.get_json(&self.detail_url(project, feature_id, level), credential).await
    }
}
