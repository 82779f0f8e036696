use serde::{Deserialize, Serialize};

use crate::links::{Resource, ResourceRef};

pub const DEFAULT_ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const DEFAULT_REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Settings for one of the token cookies the hosted front end sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CookieConfig {
    pub href: String,
    pub name: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub http_only: bool,
    /// `None` means the flag follows the scheme of the incoming request.
    pub secure: Option<bool>,
    pub same_site: Option<SameSite>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl CookieConfig {
    pub fn named(href: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            name: name.into(),
            domain: None,
            path: Some("/".to_string()),
            http_only: true,
            secure: None,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl Resource for CookieConfig {
    fn href(&self) -> &str {
        &self.href
    }
}

pub type CookieConfigRef = ResourceRef<CookieConfig>;
