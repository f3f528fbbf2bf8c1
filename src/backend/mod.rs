//! Backend Module
//!
//! The tile/bounds and project-detail API the map view depends on, behind a
//! trait so the controller can run against mocks.

pub mod auth;
pub mod http;

pub use auth::Credential;
pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{BoundingBox, Project, ProjectDetail, ResolutionLevel};

#[async_trait]
pub trait MapBackend: Send + Sync {
    /// Extent of a project's results.
    async fn fetch_bounds(&self, project: &Project, credential: &Credential) -> Result<BoundingBox>;

    /// Hexagon records and axis side tables for one selected feature.
    async fn fetch_detail(
        &self,
        project: &Project,
        feature_id: &str,
        level: ResolutionLevel,
        credential: &Credential,
    ) -> Result<ProjectDetail>;
}
