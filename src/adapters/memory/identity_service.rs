use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;
use webconfig_types::{
    ApiKeyRef, Application, ApplicationRef, ApplicationWebConfig, CallbackConfig,
    ChangePasswordConfig, CookieConfig, DEFAULT_ACCESS_TOKEN_COOKIE, DEFAULT_REFRESH_TOKEN_COOKIE,
    ForgotPasswordConfig, IdSiteConfig, LoginConfig, LogoutConfig, MeConfig, Oauth2Config,
    READ_ONLY_PROPERTIES, RegisterConfig, ResourceRef, ResourceStatus, Tenant, TenantRef,
    VerifyEmailConfig, WRITABLE_PROPERTIES, WebConfigRef, WebConfigStatus, WebFeature,
    WebFeatureKind,
};

use super::dns_label::{generate_dns_label, validate_dns_label};
use crate::app_error::{AppError, AppResult};
use crate::infra::config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_BASE_DOMAIN};
use crate::ports::resource_client::ResourceClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Tenant,
    Application,
    ApiKey,
    WebConfig,
    Cookie,
    Feature(WebFeatureKind),
}

#[derive(Debug, Clone)]
struct StoredResource {
    kind: ResourceKind,
    body: Value,
}

#[derive(Default)]
struct ServiceState {
    resources: HashMap<String, StoredResource>,
    fetches: HashMap<String, usize>,
}

/// In-process stand-in for the remote identity service.
///
/// Provisions tenants and applications, hands out JSON representations by
/// href and enforces the service-side rules for web configs: generated and
/// unique domain names, read-only properties, tenant-scoped signing keys and
/// cascade deletion with the owning application.
pub struct InMemoryIdentityService {
    api_base_url: String,
    base_domain: String,
    state: Mutex<ServiceState>,
    available: AtomicBool,
}

impl Default for InMemoryIdentityService {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_BASE_DOMAIN)
    }
}

impl InMemoryIdentityService {
    pub fn new(api_base_url: impl Into<String>, base_domain: impl Into<String>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            base_domain: base_domain.into(),
            state: Mutex::new(ServiceState::default()),
            available: AtomicBool::new(true),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api_base_url.as_str(), config.base_domain.clone())
    }

    /// Toggle a simulated outage; while unavailable every client call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// How many times the resource at `href` has been fetched.
    pub fn fetch_count(&self, href: &str) -> usize {
        self.lock().fetches.get(href).copied().unwrap_or(0)
    }

    pub fn create_tenant(&self, name: &str) -> AppResult<Tenant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("tenant name is required".into()));
        }

        let mut state = self.lock();
        let now = Utc::now();
        let tenant = Tenant {
            href: self.mint_href("tenants"),
            name: name.to_string(),
            key: unused_tenant_key(&state, &slugify(name)),
            created_at: Some(now),
            modified_at: Some(now),
        };

        insert(&mut state, ResourceKind::Tenant, &tenant.href, &tenant)?;
        info!(href = %tenant.href, "tenant created");
        Ok(tenant)
    }

    /// Provision an application together with its signing key, its web
    /// config and every nested sub-config.
    pub fn create_application(&self, tenant: &TenantRef, name: &str) -> AppResult<Application> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("application name is required".into()));
        }

        let mut state = self.lock();
        match state.resources.get(tenant.href()) {
            Some(stored) if stored.kind == ResourceKind::Tenant => {}
            _ => return Err(AppError::InvalidInput(format!("unknown tenant {}", tenant))),
        }

        let now = Utc::now();
        let app_href = self.mint_href("applications");
        let web_config_href = self.mint_href("applicationWebConfigs");
        let key_id = Uuid::new_v4().simple().to_string();
        let key_href = format!("{}/apiKeys/{}", self.api_base_url, key_id);

        let api_key = serde_json::json!({
            "href": key_href,
            "id": key_id,
            "secret": Uuid::new_v4().simple().to_string(),
            "status": ResourceStatus::Enabled,
            "tenant": tenant,
        });
        state.resources.insert(
            key_href.clone(),
            StoredResource {
                kind: ResourceKind::ApiKey,
                body: api_key,
            },
        );

        let sub = |segment: &str| format!("{}/{}", web_config_href, segment);
        let feature = |kind: WebFeatureKind| sub(kind.as_ref());

        let access_cookie = CookieConfig::named(sub("accessTokenCookie"), DEFAULT_ACCESS_TOKEN_COOKIE);
        let refresh_cookie =
            CookieConfig::named(sub("refreshTokenCookie"), DEFAULT_REFRESH_TOKEN_COOKIE);
        insert(&mut state, ResourceKind::Cookie, &access_cookie.href, &access_cookie)?;
        insert(&mut state, ResourceKind::Cookie, &refresh_cookie.href, &refresh_cookie)?;

        insert_feature(&mut state, Oauth2Config::default_at(feature(WebFeatureKind::Oauth2)))?;
        insert_feature(&mut state, RegisterConfig::default_at(feature(WebFeatureKind::Register)))?;
        insert_feature(
            &mut state,
            VerifyEmailConfig::default_at(feature(WebFeatureKind::VerifyEmail)),
        )?;
        insert_feature(&mut state, LoginConfig::default_at(feature(WebFeatureKind::Login)))?;
        insert_feature(&mut state, LogoutConfig::default_at(feature(WebFeatureKind::Logout)))?;
        insert_feature(
            &mut state,
            ForgotPasswordConfig::default_at(feature(WebFeatureKind::ForgotPassword)),
        )?;
        insert_feature(
            &mut state,
            ChangePasswordConfig::default_at(feature(WebFeatureKind::ChangePassword)),
        )?;
        insert_feature(&mut state, IdSiteConfig::default_at(feature(WebFeatureKind::IdSite)))?;
        insert_feature(&mut state, CallbackConfig::default_at(feature(WebFeatureKind::Callback)))?;
        insert_feature(&mut state, MeConfig::default_at(feature(WebFeatureKind::Me)))?;

        let domain_name = self.unused_generated_domain(&state);
        let web_config = ApplicationWebConfig {
            href: web_config_href.clone(),
            domain_name: Some(domain_name),
            dns_label: None,
            status: WebConfigStatus::Enabled,
            signing_api_key: ApiKeyRef::new(key_href),
            application: ApplicationRef::new(app_href.clone()),
            tenant: tenant.clone(),
            oauth2: ResourceRef::new(feature(WebFeatureKind::Oauth2)),
            access_token_cookie: ResourceRef::new(access_cookie.href.clone()),
            refresh_token_cookie: ResourceRef::new(refresh_cookie.href.clone()),
            register: ResourceRef::new(feature(WebFeatureKind::Register)),
            verify_email: ResourceRef::new(feature(WebFeatureKind::VerifyEmail)),
            login: ResourceRef::new(feature(WebFeatureKind::Login)),
            logout: ResourceRef::new(feature(WebFeatureKind::Logout)),
            forgot_password: ResourceRef::new(feature(WebFeatureKind::ForgotPassword)),
            change_password: ResourceRef::new(feature(WebFeatureKind::ChangePassword)),
            id_site: ResourceRef::new(feature(WebFeatureKind::IdSite)),
            callback: ResourceRef::new(feature(WebFeatureKind::Callback)),
            me: ResourceRef::new(feature(WebFeatureKind::Me)),
            created_at: Some(now),
            modified_at: Some(now),
        };
        insert(&mut state, ResourceKind::WebConfig, &web_config.href, &web_config)?;

        let application = Application {
            href: app_href,
            name: name.to_string(),
            status: ResourceStatus::Enabled,
            tenant: tenant.clone(),
            web_config: WebConfigRef::new(web_config_href),
            created_at: Some(now),
            modified_at: Some(now),
        };
        insert(&mut state, ResourceKind::Application, &application.href, &application)?;

        info!(
            href = %application.href,
            domain_name = ?web_config.domain_name,
            "application provisioned"
        );
        Ok(application)
    }

    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Unavailable("identity service unreachable".into()))
        }
    }

    fn mint_href(&self, collection: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base_url,
            collection,
            Uuid::new_v4().simple()
        )
    }

    fn domain_for(&self, label: &str) -> String {
        format!("{}.{}", label, self.base_domain)
    }

    fn unused_generated_domain(&self, state: &ServiceState) -> String {
        loop {
            let domain = self.domain_for(&generate_dns_label());
            if domain_owner(state, &domain).is_none() {
                return domain;
            }
        }
    }

    fn update_web_config(
        &self,
        state: &mut ServiceState,
        href: &str,
        properties: &Map<String, Value>,
    ) -> AppResult<Value> {
        for key in properties.keys() {
            if READ_ONLY_PROPERTIES.contains(&key.as_str()) {
                return Err(AppError::InvalidInput(format!("{} is read-only", key)));
            }
            if !WRITABLE_PROPERTIES.contains(&key.as_str()) {
                return Err(AppError::InvalidInput(format!("unknown property {}", key)));
            }
        }

        let current: ApplicationWebConfig = typed_body(state, href)?;
        let mut next = current.clone();

        if let Some(label) = properties.get("dnsLabel") {
            match label {
                Value::Null => {
                    if current.dns_label.is_some() {
                        next.dns_label = None;
                        next.domain_name = Some(self.unused_generated_domain(state));
                    }
                }
                Value::String(label) => {
                    if current.dns_label.as_deref() != Some(label.as_str()) {
                        validate_dns_label(label)?;
                        let domain = self.domain_for(label);
                        if domain_owner(state, &domain).is_some_and(|owner| owner != href) {
                            return Err(AppError::Conflict(format!(
                                "domain name {} is already in use",
                                domain
                            )));
                        }
                        next.dns_label = Some(label.clone());
                        next.domain_name = Some(domain);
                    }
                }
                _ => return Err(AppError::InvalidInput("dnsLabel must be a string".into())),
            }
        }

        if let Some(status) = properties.get("status") {
            next.status = serde_json::from_value(status.clone()).map_err(|_| {
                AppError::InvalidInput("status must be ENABLED or DISABLED".into())
            })?;
        }

        if let Some(key) = properties.get("signingApiKey") {
            let key: ApiKeyRef = serde_json::from_value(key.clone())
                .map_err(|_| AppError::InvalidInput("signingApiKey must be a link".into()))?;
            let owner = match state.resources.get(key.href()) {
                Some(stored) if stored.kind == ResourceKind::ApiKey => {
                    stored.body.get("tenant").and_then(|t| t.get("href")).cloned()
                }
                _ => None,
            };
            if owner.as_ref().and_then(Value::as_str) != Some(current.tenant.href()) {
                return Err(AppError::InvalidInput(format!(
                    "signingApiKey {} is not an API key of this tenant",
                    key
                )));
            }
            next.signing_api_key = key;
        }

        if next == current {
            return Ok(serde_json::to_value(&current)?);
        }

        next.modified_at = Some(Utc::now());
        let body = serde_json::to_value(&next)?;
        replace_body(state, href, body.clone());
        info!(
            href,
            domain_name = ?next.domain_name,
            status = %next.status,
            "web config updated"
        );
        Ok(body)
    }

    fn update_application(
        &self,
        state: &mut ServiceState,
        href: &str,
        properties: &Map<String, Value>,
    ) -> AppResult<Value> {
        let mut application: Application = typed_body(state, href)?;

        for (key, value) in properties {
            match key.as_str() {
                "name" => {
                    let name = value.as_str().map(str::trim).unwrap_or_default();
                    if name.is_empty() {
                        return Err(AppError::InvalidInput("name must be a non-empty string".into()));
                    }
                    application.name = name.to_string();
                }
                "status" => {
                    application.status = serde_json::from_value(value.clone()).map_err(|_| {
                        AppError::InvalidInput("status must be ENABLED or DISABLED".into())
                    })?;
                }
                "tenant" | "webConfig" | "createdAt" | "modifiedAt" => {
                    return Err(AppError::InvalidInput(format!("{} is read-only", key)));
                }
                _ => return Err(AppError::InvalidInput(format!("unknown property {}", key))),
            }
        }

        application.modified_at = Some(Utc::now());
        let body = serde_json::to_value(&application)?;
        replace_body(state, href, body.clone());
        Ok(body)
    }

    fn delete_application(&self, state: &mut ServiceState, href: &str) -> AppResult<()> {
        let application: Application = typed_body(state, href)?;
        let web_config = application.web_config.href();
        let nested_prefix = format!("{}/", web_config);

        state.resources.remove(href);
        state
            .resources
            .retain(|key, _| key != web_config && !key.starts_with(&nested_prefix));

        info!(href, web_config, "application deleted with its web config");
        Ok(())
    }
}

#[async_trait]
impl ResourceClient for InMemoryIdentityService {
    async fn fetch(&self, href: &str) -> AppResult<Value> {
        self.ensure_available()?;
        let mut state = self.lock();
        let body = state
            .resources
            .get(href)
            .map(|stored| stored.body.clone())
            .ok_or(AppError::NotFound)?;
        *state.fetches.entry(href.to_string()).or_default() += 1;
        debug!(href, "resource fetched");
        Ok(body)
    }

    async fn update(&self, href: &str, properties: Map<String, Value>) -> AppResult<Value> {
        self.ensure_available()?;
        let mut state = self.lock();
        let stored = state.resources.get(href).cloned().ok_or(AppError::NotFound)?;

        let result = match stored.kind {
            ResourceKind::WebConfig => self.update_web_config(&mut state, href, &properties),
            ResourceKind::Application => self.update_application(&mut state, href, &properties),
            ResourceKind::Cookie => merge_sub_config::<CookieConfig>(&mut state, href, &stored.body, properties),
            ResourceKind::Feature(kind) => {
                merge_feature(&mut state, kind, href, &stored.body, properties)
            }
            ResourceKind::Tenant | ResourceKind::ApiKey => Err(AppError::Forbidden(format!(
                "{} cannot be modified through this API",
                href
            ))),
        };

        if let Err(err) = &result {
            warn!(href, error = %err, "update rejected");
        }
        result
    }

    async fn delete(&self, href: &str) -> AppResult<()> {
        self.ensure_available()?;
        let mut state = self.lock();
        let kind = state
            .resources
            .get(href)
            .map(|stored| stored.kind)
            .ok_or(AppError::NotFound)?;

        match kind {
            ResourceKind::Application => self.delete_application(&mut state, href),
            ResourceKind::WebConfig | ResourceKind::Cookie | ResourceKind::Feature(_) => {
                Err(AppError::Forbidden(
                    "web configs are removed together with their application".into(),
                ))
            }
            ResourceKind::Tenant | ResourceKind::ApiKey => Err(AppError::Forbidden(format!(
                "{} cannot be deleted through this API",
                href
            ))),
        }
    }
}

fn insert<T: Serialize>(
    state: &mut ServiceState,
    kind: ResourceKind,
    href: &str,
    resource: &T,
) -> AppResult<()> {
    let body = serde_json::to_value(resource)?;
    state
        .resources
        .insert(href.to_string(), StoredResource { kind, body });
    Ok(())
}

fn insert_feature<F: WebFeature>(state: &mut ServiceState, feature: F) -> AppResult<()> {
    let href = feature.href().to_string();
    insert(state, ResourceKind::Feature(F::KIND), &href, &feature)
}

fn typed_body<T: DeserializeOwned>(state: &ServiceState, href: &str) -> AppResult<T> {
    let stored = state.resources.get(href).ok_or(AppError::NotFound)?;
    Ok(serde_json::from_value(stored.body.clone())?)
}

fn replace_body(state: &mut ServiceState, href: &str, body: Value) {
    if let Some(stored) = state.resources.get_mut(href) {
        stored.body = body;
    }
}

/// Lowercase ASCII letters and digits, every other run of characters
/// collapsed into one hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "tenant".to_string()
    } else {
        slug.to_string()
    }
}

fn unused_tenant_key(state: &ServiceState, base: &str) -> String {
    let taken = |key: &str| {
        state.resources.values().any(|stored| {
            stored.kind == ResourceKind::Tenant
                && stored.body.get("key").and_then(Value::as_str) == Some(key)
        })
    };
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|key| !taken(key))
        .unwrap_or_else(|| base.to_string())
}

fn domain_owner<'a>(state: &'a ServiceState, domain: &str) -> Option<&'a str> {
    state.resources.iter().find_map(|(href, stored)| {
        let matches = stored.kind == ResourceKind::WebConfig
            && stored.body.get("domainName").and_then(Value::as_str) == Some(domain);
        matches.then_some(href.as_str())
    })
}

fn merge_feature(
    state: &mut ServiceState,
    kind: WebFeatureKind,
    href: &str,
    current: &Value,
    properties: Map<String, Value>,
) -> AppResult<Value> {
    match kind {
        WebFeatureKind::Oauth2 => merge_sub_config::<Oauth2Config>(state, href, current, properties),
        WebFeatureKind::Register => merge_sub_config::<RegisterConfig>(state, href, current, properties),
        WebFeatureKind::VerifyEmail => {
            merge_sub_config::<VerifyEmailConfig>(state, href, current, properties)
        }
        WebFeatureKind::Login => merge_sub_config::<LoginConfig>(state, href, current, properties),
        WebFeatureKind::Logout => merge_sub_config::<LogoutConfig>(state, href, current, properties),
        WebFeatureKind::ForgotPassword => {
            merge_sub_config::<ForgotPasswordConfig>(state, href, current, properties)
        }
        WebFeatureKind::ChangePassword => {
            merge_sub_config::<ChangePasswordConfig>(state, href, current, properties)
        }
        WebFeatureKind::IdSite => merge_sub_config::<IdSiteConfig>(state, href, current, properties),
        WebFeatureKind::Callback => merge_sub_config::<CallbackConfig>(state, href, current, properties),
        WebFeatureKind::Me => merge_sub_config::<MeConfig>(state, href, current, properties),
    }
}

/// Merge `properties` into a sub-config and accept the result only if it
/// still has the sub-config's shape. The typed value is what gets stored.
fn merge_sub_config<T: DeserializeOwned + Serialize>(
    state: &mut ServiceState,
    href: &str,
    current: &Value,
    properties: Map<String, Value>,
) -> AppResult<Value> {
    let mut merged = current.clone();
    let Some(fields) = merged.as_object_mut() else {
        return Err(AppError::Internal(format!("{} is not an object", href)));
    };

    for (key, value) in properties {
        if key == "href" {
            if value.as_str() != Some(href) {
                return Err(AppError::InvalidInput("href is read-only".into()));
            }
            continue;
        }
        if !fields.contains_key(&key) {
            return Err(AppError::InvalidInput(format!("unknown property {}", key)));
        }
        fields.insert(key, value);
    }

    let typed = serde_json::from_value::<T>(merged)
        .map_err(|e| AppError::InvalidInput(format!("invalid configuration: {}", e)))?;
    let body = serde_json::to_value(&typed)?;

    replace_body(state, href, body.clone());
    Ok(body)
}
