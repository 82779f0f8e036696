use std::sync::Arc;

use tracing::{info, instrument};
use url::Url;
use webconfig_types::{
    ApiKey, Application, ApplicationRef, ResourceRef, Tenant, WebFeature, WebFeatureKind,
};

use crate::app_error::{AppError, AppResult};
use crate::data_store::DataStore;
use crate::domain::entities::{
    feature_availability::FeatureAvailability, web_config::WebConfigResource,
};

#[derive(Clone)]
pub struct WebConfigUseCases {
    store: Arc<DataStore>,
}

impl WebConfigUseCases {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Fetch the web config at `href`, bypassing any cached copy.
    #[instrument(skip(self))]
    pub async fn load(&self, href: &str) -> AppResult<WebConfigResource> {
        let snapshot = self.store.fetch_fresh(href).await?;
        Ok(WebConfigResource::from_snapshot(snapshot))
    }

    #[instrument(skip(self, application), fields(application = %application))]
    pub async fn load_for_application(
        &self,
        application: &ApplicationRef,
    ) -> AppResult<WebConfigResource> {
        let application = self.store.resolve(application).await?;
        self.load(application.web_config.href()).await
    }

    /// Configured and effective state of every self-service flow.
    #[instrument(skip(self, config), fields(href = %config.href()))]
    pub async fn feature_availability(
        &self,
        config: &WebConfigResource,
    ) -> AppResult<Vec<FeatureAvailability>> {
        let (oauth2, register, verify_email, login, logout, forgot, change, id_site, callback, me) = tokio::try_join!(
            self.feature_flag(config.oauth2()),
            self.feature_flag(config.register()),
            self.feature_flag(config.verify_email()),
            self.feature_flag(config.login()),
            self.feature_flag(config.logout()),
            self.feature_flag(config.forgot_password()),
            self.feature_flag(config.change_password()),
            self.feature_flag(config.id_site()),
            self.feature_flag(config.callback()),
            self.feature_flag(config.me()),
        )?;

        let enabled = config.is_enabled();
        Ok([
            (WebFeatureKind::Oauth2, oauth2),
            (WebFeatureKind::Register, register),
            (WebFeatureKind::VerifyEmail, verify_email),
            (WebFeatureKind::Login, login),
            (WebFeatureKind::Logout, logout),
            (WebFeatureKind::ForgotPassword, forgot),
            (WebFeatureKind::ChangePassword, change),
            (WebFeatureKind::IdSite, id_site),
            (WebFeatureKind::Callback, callback),
            (WebFeatureKind::Me, me),
        ]
        .into_iter()
        .map(|(kind, configured)| FeatureAvailability::new(kind, configured, enabled))
        .collect())
    }

    /// Toggle one flow and persist it immediately.
    #[instrument(skip(self), fields(kind = %F::KIND))]
    pub async fn set_feature_enabled<F: WebFeature>(
        &self,
        feature: &ResourceRef<F>,
        enabled: bool,
    ) -> AppResult<F> {
        let mut config = self.store.resolve(feature).await?;
        if config.is_enabled() == enabled {
            return Ok(config);
        }

        config.set_enabled(enabled);
        let saved = self.store.save(&config).await?;
        info!(enabled, "feature toggled");
        Ok(saved)
    }

    /// Base URL of the hosted front end, or `None` while it is unreachable
    /// (web config disabled or not yet provisioned). Reflects the persisted
    /// state only; staged changes are ignored.
    pub fn hosted_endpoint(&self, config: &WebConfigResource) -> AppResult<Option<Url>> {
        let snapshot = config.snapshot();
        if !snapshot.status.is_enabled() {
            return Ok(None);
        }
        let Some(domain_name) = snapshot.domain_name.as_deref() else {
            return Ok(None);
        };

        Url::parse(&format!("https://{}/", domain_name))
            .map(Some)
            .map_err(|e| AppError::Internal(format!("invalid domain name {domain_name}: {e}")))
    }

    pub async fn signing_key(&self, config: &WebConfigResource) -> AppResult<ApiKey> {
        self.store.resolve(config.signing_api_key()).await
    }

    pub async fn application(&self, config: &WebConfigResource) -> AppResult<Application> {
        self.store.resolve(config.application()).await
    }

    pub async fn tenant(&self, config: &WebConfigResource) -> AppResult<Tenant> {
        self.store.resolve(config.tenant()).await
    }

    async fn feature_flag<F: WebFeature>(&self, feature: &ResourceRef<F>) -> AppResult<bool> {
        Ok(self.store.resolve(feature).await?.is_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIdentityService;
    use secrecy::ExposeSecret;
    use webconfig_types::{LoginConfig, TenantRef, WebConfigStatus};

    struct Fixture {
        service: Arc<InMemoryIdentityService>,
        use_cases: WebConfigUseCases,
        application: Application,
    }

    fn fixture() -> Fixture {
        let service = Arc::new(InMemoryIdentityService::default());
        let tenant = service.create_tenant("acme").unwrap();
        let application = service
            .create_application(&TenantRef::new(tenant.href), "storefront")
            .unwrap();
        let use_cases = WebConfigUseCases::new(Arc::new(DataStore::new(service.clone())));
        Fixture {
            service,
            use_cases,
            application,
        }
    }

    fn app_ref(app: &Application) -> ApplicationRef {
        ApplicationRef::new(app.href.clone())
    }

    #[tokio::test]
    async fn test_dns_label_regenerates_domain_name() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load_for_application(&app_ref(&f.application))
            .await
            .unwrap();
        let generated = config.domain_name().unwrap().to_string();
        assert!(config.dns_label().is_none());

        config.set_dns_label("storefront");
        assert_eq!(config.domain_name(), Some(generated.as_str()));

        config.save(f.use_cases.store()).await.unwrap();
        config.refresh(f.use_cases.store()).await.unwrap();

        let domain_name = config.domain_name().unwrap();
        assert!(domain_name.starts_with("storefront."));
        assert_ne!(domain_name, generated);
    }

    #[tokio::test]
    async fn test_status_round_trip() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        config.set_status(WebConfigStatus::Disabled);
        config.save(f.use_cases.store()).await.unwrap();
        config.refresh(f.use_cases.store()).await.unwrap();

        assert_eq!(config.status(), WebConfigStatus::Disabled);
        assert!(!config.is_dirty());
        assert!(config.modified_at() >= config.created_at());
    }

    #[tokio::test]
    async fn test_refresh_discards_staged_changes() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        config.set_dns_label("never-saved");
        config.set_status(WebConfigStatus::Disabled);
        config.refresh(f.use_cases.store()).await.unwrap();

        assert!(config.dns_label().is_none());
        assert_eq!(config.status(), WebConfigStatus::Enabled);
        assert!(!config.is_dirty());
    }

    #[tokio::test]
    async fn test_rejected_save_keeps_staged_values() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        config.set_dns_label("Not A Label");
        let err = config.save(f.use_cases.store()).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(config.dns_label(), Some("Not A Label"));
        assert!(config.is_dirty());
        assert!(config.snapshot().dns_label.is_none());
    }

    #[tokio::test]
    async fn test_disabled_config_suppresses_every_feature() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();
        assert!(f.use_cases.hosted_endpoint(&config).unwrap().is_some());

        config.set_status(WebConfigStatus::Disabled);
        config.save(f.use_cases.store()).await.unwrap();

        let availability = f.use_cases.feature_availability(&config).await.unwrap();
        assert_eq!(availability.len(), 10);
        assert!(availability.iter().all(|a| !a.active));
        assert!(availability.iter().any(|a| a.is_suppressed()));
        assert!(f.use_cases.hosted_endpoint(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enabled_config_reports_feature_flags() {
        let f = fixture();
        let config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        let availability = f.use_cases.feature_availability(&config).await.unwrap();
        for entry in &availability {
            assert_eq!(entry.configured, entry.kind.default_enabled());
            assert_eq!(entry.active, entry.configured);
        }

        let endpoint = f.use_cases.hosted_endpoint(&config).unwrap().unwrap();
        assert_eq!(endpoint.host_str(), config.domain_name());
    }

    #[tokio::test]
    async fn test_nested_configs_resolve_once_per_href() {
        let f = fixture();
        let config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        f.use_cases.feature_availability(&config).await.unwrap();
        f.use_cases.feature_availability(&config).await.unwrap();
        let login: LoginConfig = f.use_cases.store().resolve(config.login()).await.unwrap();

        assert!(login.enabled);
        assert_eq!(f.service.fetch_count(config.login().href()), 1);
        assert_eq!(f.service.fetch_count(config.me().href()), 1);
        assert_eq!(f.service.fetch_count(config.oauth2().href()), 1);
    }

    #[tokio::test]
    async fn test_set_feature_enabled_persists() {
        let f = fixture();
        let config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        let saved = f
            .use_cases
            .set_feature_enabled(config.forgot_password(), true)
            .await
            .unwrap();
        assert!(saved.enabled);

        let availability = f.use_cases.feature_availability(&config).await.unwrap();
        let forgot = availability
            .iter()
            .find(|a| a.kind == WebFeatureKind::ForgotPassword)
            .unwrap();
        assert!(forgot.active);
    }

    #[tokio::test]
    async fn test_back_references_resolve() {
        let f = fixture();
        let config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        let application = f.use_cases.application(&config).await.unwrap();
        let tenant = f.use_cases.tenant(&config).await.unwrap();
        let key = f.use_cases.signing_key(&config).await.unwrap();

        assert_eq!(application, f.application);
        assert_eq!(tenant.name, "acme");
        assert_eq!(key.tenant, *config.tenant());
        assert!(!key.secret.expose_secret().is_empty());
    }

    #[tokio::test]
    async fn test_signing_key_round_trip_within_tenant() {
        let f = fixture();
        let sibling = f
            .service
            .create_application(&f.application.tenant, "backoffice")
            .unwrap();
        let sibling_config = f.use_cases.load(sibling.web_config.href()).await.unwrap();
        let key = f.use_cases.signing_key(&sibling_config).await.unwrap();

        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();
        let original = config.signing_api_key().clone();
        assert_ne!(original.href(), key.href);

        config.set_signing_api_key(&key);
        config.save(f.use_cases.store()).await.unwrap();
        config.refresh(f.use_cases.store()).await.unwrap();

        assert_eq!(config.signing_api_key().href(), key.href);
        assert_ne!(*config.signing_api_key(), original);
        assert!(!config.is_dirty());
    }

    #[tokio::test]
    async fn test_hosted_endpoint_ignores_staged_status() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        config.set_status(WebConfigStatus::Disabled);
        assert!(f.use_cases.hosted_endpoint(&config).unwrap().is_some());

        config.save(f.use_cases.store()).await.unwrap();
        assert!(f.use_cases.hosted_endpoint(&config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signing_key_must_belong_to_tenant() {
        let f = fixture();
        let other = f.service.create_tenant("other").unwrap();
        let foreign = f
            .service
            .create_application(&TenantRef::new(other.href), "elsewhere")
            .unwrap();
        let foreign_config = f.use_cases.load(foreign.web_config.href()).await.unwrap();

        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();
        config.set_signing_api_key(foreign_config.signing_api_key().clone());

        let err = config.save(f.use_cases.store()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_outage_surfaces_unavailable() {
        let f = fixture();
        let mut config = f
            .use_cases
            .load(f.application.web_config.href())
            .await
            .unwrap();

        f.service.set_available(false);
        config.set_dns_label("offline");
        let err = config.save(f.use_cases.store()).await.unwrap_err();

        assert!(matches!(err, AppError::Unavailable(_)));
        assert!(config.is_dirty());
    }

    #[tokio::test]
    async fn test_deleting_application_removes_web_config() {
        let f = fixture();
        let href = f.application.web_config.href().to_string();
        f.use_cases.load(&href).await.unwrap();

        f.use_cases.store().delete(&f.application.href).await.unwrap();

        let err = f.use_cases.load(&href).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
