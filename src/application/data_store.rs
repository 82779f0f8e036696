use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use webconfig_types::{Resource, ResourceRef};

use crate::app_error::{AppError, AppResult};
use crate::ports::resource_client::ResourceClient;

type Entries = HashMap<String, Arc<OnceCell<Value>>>;

/// Typed, caching front for a [`ResourceClient`].
///
/// Resolution is keyed by href. With caching enabled each distinct href is
/// fetched at most once, also when several tasks resolve it concurrently;
/// later resolutions are served from the last fetched or persisted
/// representation.
pub struct DataStore {
    client: Arc<dyn ResourceClient>,
    cache: Option<Mutex<Entries>>,
}

impl DataStore {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self::with_cache(client, true)
    }

    pub fn with_cache(client: Arc<dyn ResourceClient>, enabled: bool) -> Self {
        Self {
            client,
            cache: enabled.then(|| Mutex::new(HashMap::new())),
        }
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Resolve the resource at `href`, through the cache when enabled.
    #[instrument(skip(self))]
    pub async fn get<T: Resource>(&self, href: &str) -> AppResult<T> {
        let value = self.cached_value(href).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn resolve<T: Resource>(&self, link: &ResourceRef<T>) -> AppResult<T> {
        self.get(link.href()).await
    }

    /// Fetch `href` from the client even if it is cached, replacing the
    /// cached representation.
    #[instrument(skip(self))]
    pub async fn fetch_fresh<T: Resource>(&self, href: &str) -> AppResult<T> {
        let value = self.client.fetch(href).await?;
        self.store(href, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    /// Persist every property of `resource` and return the service's
    /// representation of the result.
    #[instrument(skip(self, resource), fields(href = resource.href()))]
    pub async fn save<T: Resource + Serialize>(&self, resource: &T) -> AppResult<T> {
        let mut properties = match serde_json::to_value(resource)? {
            Value::Object(map) => map,
            _ => {
                return Err(AppError::Internal(format!(
                    "{} does not serialize to an object",
                    resource.href()
                )));
            }
        };
        properties.remove("href");

        let value = self.update_properties(resource.href(), properties).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Write only `properties` to the resource at `href`.
    #[instrument(skip(self, properties))]
    pub async fn update_properties(
        &self,
        href: &str,
        properties: Map<String, Value>,
    ) -> AppResult<Value> {
        debug!(properties = ?properties.keys().collect::<Vec<_>>(), "updating resource");
        let value = self.client.update(href, properties).await?;
        self.store(href, value.clone());
        Ok(value)
    }

    /// Delete the resource at `href`.
    ///
    /// The service may cascade the delete to other resources, so the whole
    /// cache is dropped.
    #[instrument(skip(self))]
    pub async fn delete(&self, href: &str) -> AppResult<()> {
        self.client.delete(href).await?;
        self.clear();
        Ok(())
    }

    pub fn evict(&self, href: &str) {
        if let Some(cache) = &self.cache {
            lock(cache).remove(href);
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            lock(cache).clear();
        }
    }

    async fn cached_value(&self, href: &str) -> AppResult<Value> {
        let Some(cache) = &self.cache else {
            return self.client.fetch(href).await;
        };

        let cell = lock(cache).entry(href.to_string()).or_default().clone();
        if let Some(value) = cell.get() {
            debug!(href, "resolved from cache");
            return Ok(value.clone());
        }

        let fetched = cell
            .get_or_try_init(|| async {
                debug!(href, "cache miss, fetching");
                self.client.fetch(href).await
            })
            .await
            .cloned();

        if fetched.is_err() {
            let mut entries = lock(cache);
            if entries.get(href).is_some_and(|entry| Arc::ptr_eq(entry, &cell)) {
                entries.remove(href);
            }
        }
        fetched
    }

    fn store(&self, href: &str, value: Value) {
        if let Some(cache) = &self.cache {
            lock(cache).insert(href.to_string(), Arc::new(OnceCell::new_with(Some(value))));
        }
    }
}

fn lock(cache: &Mutex<Entries>) -> std::sync::MutexGuard<'_, Entries> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
