use serde::{Deserialize, Serialize};

use crate::features::{WebFeature, WebFeatureKind};
use crate::links::{Resource, ResourceRef};

/// Default lifetime of access tokens issued through the client credentials grant.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u32 = 3600;

/// OAuth2 token endpoint settings of the hosted front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oauth2Config {
    pub href: String,
    pub enabled: bool,
    pub client_credentials: ClientCredentialsGrant,
    pub password: PasswordGrant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientCredentialsGrant {
    pub enabled: bool,
    pub access_token: AccessTokenSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessTokenSettings {
    /// Lifetime in seconds.
    pub ttl: u32,
}

impl Default for AccessTokenSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_ACCESS_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PasswordGrant {
    pub enabled: bool,
    pub validation_strategy: ValidationStrategy,
}

/// Where access tokens issued through the password grant are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStrategy {
    /// Signature and expiry checked by the application itself.
    #[default]
    Local,
    /// Every token checked against the identity service.
    Remote,
}

impl Resource for Oauth2Config {
    fn href(&self) -> &str {
        &self.href
    }
}

impl WebFeature for Oauth2Config {
    const KIND: WebFeatureKind = WebFeatureKind::Oauth2;

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn default_at(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            enabled: WebFeatureKind::Oauth2.default_enabled(),
            client_credentials: ClientCredentialsGrant {
                enabled: true,
                access_token: AccessTokenSettings::default(),
            },
            password: PasswordGrant {
                enabled: true,
                validation_strategy: ValidationStrategy::default(),
            },
        }
    }
}

pub type Oauth2ConfigRef = ResourceRef<Oauth2Config>;
