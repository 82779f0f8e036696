use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::app_error::AppResult;
use crate::ports::resource_client::ResourceClient;

/// Forwards to another client and records how often each href is fetched.
///
/// Every fetch yields once before forwarding so concurrent callers overlap.
pub struct CountingClient {
    inner: Arc<dyn ResourceClient>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl CountingClient {
    pub fn new(inner: Arc<dyn ResourceClient>) -> Self {
        Self {
            inner,
            fetches: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetches(&self, href: &str) -> usize {
        self.fetches.lock().unwrap().get(href).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ResourceClient for CountingClient {
    async fn fetch(&self, href: &str) -> AppResult<Value> {
        *self.fetches.lock().unwrap().entry(href.to_string()).or_default() += 1;
        tokio::task::yield_now().await;
        self.inner.fetch(href).await
    }

    async fn update(&self, href: &str, properties: Map<String, Value>) -> AppResult<Value> {
        self.inner.update(href, properties).await
    }

    async fn delete(&self, href: &str) -> AppResult<()> {
        self.inner.delete(href).await
    }
}
