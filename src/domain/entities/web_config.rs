use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use webconfig_types::{
    ApiKeyRef, ApplicationRef, ApplicationWebConfig, Auditable, CallbackConfigRef,
    ChangePasswordConfigRef, CookieConfigRef, ForgotPasswordConfigRef, IdSiteConfigRef,
    LoginConfigRef, LogoutConfigRef, MeConfigRef, Oauth2ConfigRef, RegisterConfigRef, TenantRef,
    VerifyEmailConfigRef, WebConfigStatus, WebFeature,
};

use crate::app_error::AppResult;
use crate::data_store::DataStore;

/// Values set locally and not yet persisted.
#[derive(Debug, Clone, Default)]
struct StagedChanges {
    dns_label: Option<Option<String>>,
    status: Option<WebConfigStatus>,
    signing_api_key: Option<ApiKeyRef>,
}

impl StagedChanges {
    fn is_empty(&self) -> bool {
        self.dns_label.is_none() && self.status.is_none() && self.signing_api_key.is_none()
    }

    fn into_properties(self) -> Map<String, Value> {
        let mut properties = Map::new();
        if let Some(label) = self.dns_label {
            properties.insert("dnsLabel".into(), label.map(Value::String).unwrap_or(Value::Null));
        }
        if let Some(status) = self.status {
            properties.insert("status".into(), Value::String(status.as_str().into()));
        }
        if let Some(key) = self.signing_api_key {
            properties.insert("signingApiKey".into(), serde_json::json!({ "href": key.href() }));
        }
        properties
    }
}

/// Read/write view of an application's web config.
///
/// Getters reflect the last fetched or persisted snapshot overlaid with
/// staged local changes. Setters never fail; they only stage values for the
/// next [`save`](Self::save). `domain_name` is owned by the service and only
/// changes when a new snapshot arrives.
///
/// The owning application and tenant have no setters:
///
/// ```compile_fail
/// # use webconfig::domain::entities::web_config::WebConfigResource;
/// # fn reassign(config: &mut WebConfigResource, other: webconfig_types::ApplicationRef) {
/// config.set_application(other);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebConfigResource {
    snapshot: ApplicationWebConfig,
    staged: StagedChanges,
}

impl WebConfigResource {
    pub fn from_snapshot(snapshot: ApplicationWebConfig) -> Self {
        Self {
            snapshot,
            staged: StagedChanges::default(),
        }
    }

    /// The last representation received from the service, without staged changes.
    pub fn snapshot(&self) -> &ApplicationWebConfig {
        &self.snapshot
    }

    pub fn href(&self) -> &str {
        &self.snapshot.href
    }

    pub fn domain_name(&self) -> Option<&str> {
        self.snapshot.domain_name.as_deref()
    }

    pub fn dns_label(&self) -> Option<&str> {
        match &self.staged.dns_label {
            Some(staged) => staged.as_deref(),
            None => self.snapshot.dns_label.as_deref(),
        }
    }

    /// Choose the subdomain label. Saving it makes the service regenerate
    /// the domain name.
    pub fn set_dns_label(&mut self, dns_label: impl Into<String>) {
        self.staged.dns_label = Some(Some(dns_label.into()));
    }

    /// Drop the chosen label; the service falls back to a generated one.
    pub fn clear_dns_label(&mut self) {
        self.staged.dns_label = Some(None);
    }

    pub fn status(&self) -> WebConfigStatus {
        self.staged.status.unwrap_or(self.snapshot.status)
    }

    pub fn set_status(&mut self, status: WebConfigStatus) {
        self.staged.status = Some(status);
    }

    pub fn is_enabled(&self) -> bool {
        self.status().is_enabled()
    }

    pub fn signing_api_key(&self) -> &ApiKeyRef {
        self.staged
            .signing_api_key
            .as_ref()
            .unwrap_or(&self.snapshot.signing_api_key)
    }

    pub fn set_signing_api_key(&mut self, key: impl Into<ApiKeyRef>) {
        self.staged.signing_api_key = Some(key.into());
    }

    pub fn application(&self) -> &ApplicationRef {
        &self.snapshot.application
    }

    pub fn tenant(&self) -> &TenantRef {
        &self.snapshot.tenant
    }

    pub fn oauth2(&self) -> &Oauth2ConfigRef {
        &self.snapshot.oauth2
    }

    pub fn access_token_cookie(&self) -> &CookieConfigRef {
        &self.snapshot.access_token_cookie
    }

    pub fn refresh_token_cookie(&self) -> &CookieConfigRef {
        &self.snapshot.refresh_token_cookie
    }

    pub fn register(&self) -> &RegisterConfigRef {
        &self.snapshot.register
    }

    pub fn verify_email(&self) -> &VerifyEmailConfigRef {
        &self.snapshot.verify_email
    }

    pub fn login(&self) -> &LoginConfigRef {
        &self.snapshot.login
    }

    pub fn logout(&self) -> &LogoutConfigRef {
        &self.snapshot.logout
    }

    pub fn forgot_password(&self) -> &ForgotPasswordConfigRef {
        &self.snapshot.forgot_password
    }

    pub fn change_password(&self) -> &ChangePasswordConfigRef {
        &self.snapshot.change_password
    }

    pub fn id_site(&self) -> &IdSiteConfigRef {
        &self.snapshot.id_site
    }

    pub fn callback(&self) -> &CallbackConfigRef {
        &self.snapshot.callback
    }

    pub fn me(&self) -> &MeConfigRef {
        &self.snapshot.me
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.created_at()
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.modified_at()
    }

    pub fn is_dirty(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Whether a flow actually takes effect: a disabled web config
    /// suppresses every feature regardless of its own flag.
    pub fn is_feature_active<F: WebFeature>(&self, feature: &F) -> bool {
        self.is_enabled() && feature.is_enabled()
    }

    /// Persist staged changes. On success the service's representation
    /// (including a regenerated domain name) replaces the snapshot; on
    /// failure the staged changes are kept.
    #[instrument(skip(self, store), fields(href = %self.snapshot.href))]
    pub async fn save(&mut self, store: &DataStore) -> AppResult<()> {
        if self.staged.is_empty() {
            debug!("no staged changes");
            return Ok(());
        }

        let properties = self.staged.clone().into_properties();
        let value = store.update_properties(&self.snapshot.href, properties).await?;
        self.snapshot = serde_json::from_value(value)?;
        self.staged = StagedChanges::default();

        info!(
            domain_name = ?self.snapshot.domain_name,
            status = %self.snapshot.status,
            "web config saved"
        );
        Ok(())
    }

    /// Re-fetch the resource, discarding staged changes.
    #[instrument(skip(self, store), fields(href = %self.snapshot.href))]
    pub async fn refresh(&mut self, store: &DataStore) -> AppResult<()> {
        self.snapshot = store.fetch_fresh(&self.snapshot.href).await?;
        self.staged = StagedChanges::default();
        Ok(())
    }
}
