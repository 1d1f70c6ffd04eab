//! Persistence seam between the worker pool and artifact production

use crate::HarvestError;
use async_trait::async_trait;
use std::path::Path;

/// Turns extracted item markup into an artifact at a destination path
///
/// Implementations must be shareable across workers. A failure is reported
/// to the calling worker and is never retried.
#[async_trait]
pub trait Persister: Send + Sync {
    /// Produces the artifact for `content` at `destination`
    async fn persist(&self, content: &str, destination: &Path) -> Result<(), HarvestError>;
}
