//! Wire types for the application web configuration resource.
//!
//! This crate provides:
//! - `ApplicationWebConfig` and its status enum
//! - Typed `{"href": ...}` links between resources
//! - The nested sub-configs (OAuth2, cookies, self-service flows)
//! - The owning `Application`, `Tenant` and signing `ApiKey`
//! - Error codes and the service's error body

mod cookies;
mod errors;
mod features;
mod links;
mod oauth2;
mod resources;
mod status;
mod web_config;

pub use cookies::{
    CookieConfig, CookieConfigRef, DEFAULT_ACCESS_TOKEN_COOKIE, DEFAULT_REFRESH_TOKEN_COOKIE,
    SameSite,
};
pub use errors::{ApiErrorBody, ErrorCode};
pub use features::{
    CallbackConfig, CallbackConfigRef, ChangePasswordConfig, ChangePasswordConfigRef,
    ForgotPasswordConfig, ForgotPasswordConfigRef, IdSiteConfig, IdSiteConfigRef, LoginConfig,
    LoginConfigRef, LogoutConfig, LogoutConfigRef, MeConfig, MeConfigRef, MeExpansion,
    RegisterConfig, RegisterConfigRef, VerifyEmailConfig, VerifyEmailConfigRef, WebFeature,
    WebFeatureKind,
};
pub use links::{Auditable, Resource, ResourceRef};
pub use oauth2::{
    AccessTokenSettings, ClientCredentialsGrant, DEFAULT_ACCESS_TOKEN_TTL_SECS, Oauth2Config,
    Oauth2ConfigRef, PasswordGrant, ValidationStrategy,
};
pub use resources::{ApiKey, ApiKeyRef, Application, ApplicationRef, Tenant, TenantRef, WebConfigRef};
pub use status::{ResourceStatus, WebConfigStatus};
pub use web_config::{ApplicationWebConfig, READ_ONLY_PROPERTIES, WRITABLE_PROPERTIES};
