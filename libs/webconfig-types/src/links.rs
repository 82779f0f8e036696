use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A remotely addressable resource.
///
/// Every resource carries its own `href`, which is also the identifier used
/// to resolve and cache it.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    fn href(&self) -> &str;
}

/// Read-only creation and modification timestamps populated by the service.
pub trait Auditable {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn modified_at(&self) -> Option<DateTime<Utc>>;
}

/// Typed link to another resource, serialized as `{"href": "..."}`.
///
/// The target type only exists at compile time: resolving a
/// `ResourceRef<Application>` can only ever produce an `Application`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ResourceRef<T> {
    href: String,
    #[serde(skip)]
    target: PhantomData<fn() -> T>,
}

impl<T> ResourceRef<T> {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            target: PhantomData,
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

impl<T> Clone for ResourceRef<T> {
    fn clone(&self) -> Self {
        Self::new(self.href.clone())
    }
}

impl<T> PartialEq for ResourceRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.href == other.href
    }
}

impl<T> Eq for ResourceRef<T> {}

impl<T> fmt::Debug for ResourceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRef").field("href", &self.href).finish()
    }
}

impl<T> fmt::Display for ResourceRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.href)
    }
}
