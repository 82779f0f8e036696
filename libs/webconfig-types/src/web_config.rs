use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookies::CookieConfigRef;
use crate::features::{
    CallbackConfigRef, ChangePasswordConfigRef, ForgotPasswordConfigRef, IdSiteConfigRef,
    LoginConfigRef, LogoutConfigRef, MeConfigRef, RegisterConfigRef, VerifyEmailConfigRef,
};
use crate::links::{Auditable, Resource};
use crate::oauth2::Oauth2ConfigRef;
use crate::resources::{ApiKeyRef, ApplicationRef, TenantRef};
use crate::status::WebConfigStatus;

/// Representation of an application's hosted web front-end configuration.
///
/// Every nested sub-config is a link; it has its own href and is fetched and
/// updated independently of this resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWebConfig {
    pub href: String,

    /// Generated by the service from `dns_label`, unique across all tenants.
    /// `None` until the config has been provisioned.
    pub domain_name: Option<String>,

    /// Preferred subdomain label chosen by the tenant.
    pub dns_label: Option<String>,

    pub status: WebConfigStatus,

    /// Key the service signs issued tokens with.
    pub signing_api_key: ApiKeyRef,

    pub application: ApplicationRef,
    pub tenant: TenantRef,

    pub oauth2: Oauth2ConfigRef,
    pub access_token_cookie: CookieConfigRef,
    pub refresh_token_cookie: CookieConfigRef,
    pub register: RegisterConfigRef,
    pub verify_email: VerifyEmailConfigRef,
    pub login: LoginConfigRef,
    pub logout: LogoutConfigRef,
    pub forgot_password: ForgotPasswordConfigRef,
    pub change_password: ChangePasswordConfigRef,
    pub id_site: IdSiteConfigRef,
    pub callback: CallbackConfigRef,
    pub me: MeConfigRef,

    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Property names of a web config that only the service may write.
pub const READ_ONLY_PROPERTIES: &[&str] = &[
    "href",
    "domainName",
    "application",
    "tenant",
    "oauth2",
    "accessTokenCookie",
    "refreshTokenCookie",
    "register",
    "verifyEmail",
    "login",
    "logout",
    "forgotPassword",
    "changePassword",
    "idSite",
    "callback",
    "me",
    "createdAt",
    "modifiedAt",
];

/// Property names of a web config a client may update.
pub const WRITABLE_PROPERTIES: &[&str] = &["dnsLabel", "status", "signingApiKey"];

impl Resource for ApplicationWebConfig {
    fn href(&self) -> &str {
        &self.href
    }
}

impl Auditable for ApplicationWebConfig {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}
