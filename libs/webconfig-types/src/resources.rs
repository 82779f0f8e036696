use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::links::{Auditable, Resource, ResourceRef};
use crate::status::ResourceStatus;
use crate::web_config::ApplicationWebConfig;

/// Top-level account boundary owning applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub href: String,
    pub name: String,
    /// Unique, URL-safe tenant key
    pub key: String,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// A registered client application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub href: String,
    pub name: String,
    pub status: ResourceStatus,
    pub tenant: TenantRef,
    pub web_config: WebConfigRef,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// API key credential.
///
/// The secret is redacted in `Debug` output and never serialized back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub href: String,
    pub id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    pub status: ResourceStatus,
    pub tenant: TenantRef,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::new(raw.into()))
}

impl Resource for Tenant {
    fn href(&self) -> &str {
        &self.href
    }
}

impl Resource for Application {
    fn href(&self) -> &str {
        &self.href
    }
}

impl Resource for ApiKey {
    fn href(&self) -> &str {
        &self.href
    }
}

impl Auditable for Tenant {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}

impl Auditable for Application {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}

impl From<&ApiKey> for ApiKeyRef {
    fn from(key: &ApiKey) -> Self {
        ResourceRef::new(key.href.clone())
    }
}

pub type TenantRef = ResourceRef<Tenant>;
pub type ApplicationRef = ResourceRef<Application>;
pub type ApiKeyRef = ResourceRef<ApiKey>;
pub type WebConfigRef = ResourceRef<ApplicationWebConfig>;
