//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;
use webconfig_types::{ApplicationWebConfig, ResourceRef, WebConfigStatus};

const BASE: &str = "https://api.example.com/v1";

/// Create a provisioned, enabled web config with sensible defaults.
pub fn create_test_web_config(
    overrides: impl FnOnce(&mut ApplicationWebConfig),
) -> ApplicationWebConfig {
    let href = format!("{}/applicationWebConfigs/{}", BASE, Uuid::new_v4().simple());
    fn sub<T>(href: &str, segment: &str) -> ResourceRef<T> {
        ResourceRef::new(format!("{}/{}", href, segment))
    }

    let mut config = ApplicationWebConfig {
        href: href.clone(),
        domain_name: Some("app-k3x9q2m7wz.apps.example.com".to_string()),
        dns_label: None,
        status: WebConfigStatus::Enabled,
        signing_api_key: ResourceRef::new(format!("{}/apiKeys/{}", BASE, Uuid::new_v4().simple())),
        application: ResourceRef::new(format!("{}/applications/{}", BASE, Uuid::new_v4().simple())),
        tenant: ResourceRef::new(format!("{}/tenants/{}", BASE, Uuid::new_v4().simple())),
        oauth2: sub(&href, "oauth2"),
        access_token_cookie: sub(&href, "accessTokenCookie"),
        refresh_token_cookie: sub(&href, "refreshTokenCookie"),
        register: sub(&href, "register"),
        verify_email: sub(&href, "verifyEmail"),
        login: sub(&href, "login"),
        logout: sub(&href, "logout"),
        forgot_password: sub(&href, "forgotPassword"),
        change_password: sub(&href, "changePassword"),
        id_site: sub(&href, "idSite"),
        callback: sub(&href, "callback"),
        me: sub(&href, "me"),
        created_at: Some(test_datetime()),
        modified_at: Some(test_datetime()),
    };
    overrides(&mut config);
    config
}

/// Fixed timestamp for deterministic fixtures.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}
