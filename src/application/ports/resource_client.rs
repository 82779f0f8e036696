use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::app_error::AppResult;

/// Access to the remote identity service's resources.
///
/// Owns everything that happens on the way to the service (transport,
/// request signing, response decoding). Bodies are the service's JSON
/// representations; typing happens in [`crate::data_store::DataStore`].
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Full representation of the resource at `href`.
    async fn fetch(&self, href: &str) -> AppResult<Value>;

    /// Partial update. Only `properties` are written; the full updated
    /// representation is returned.
    async fn update(&self, href: &str, properties: Map<String, Value>) -> AppResult<Value>;

    async fn delete(&self, href: &str) -> AppResult<()>;
}
