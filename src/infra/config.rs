use env_helpers::get_env_default;
use url::Url;

use crate::infra::error::InfraError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.example.com/v1/";
pub const DEFAULT_BASE_DOMAIN: &str = "apps.example.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL resource hrefs are minted under.
    pub api_base_url: Url,
    /// Suffix appended to DNS labels to form domain names.
    pub base_domain: String,
    /// Whether the data store caches resolved resources by href.
    pub resolve_cache: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            resolve_cache: true,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load from the environment, after applying a `.env` file if present.
    pub fn from_env() -> Result<Self, InfraError> {
        dotenvy::dotenv().ok();

        let api_base_url: String =
            get_env_default("WEBCONFIG_API_BASE_URL", DEFAULT_API_BASE_URL.to_string());
        let base_domain: String =
            get_env_default("WEBCONFIG_BASE_DOMAIN", DEFAULT_BASE_DOMAIN.to_string());
        let resolve_cache: bool = get_env_default("WEBCONFIG_RESOLVE_CACHE", true);
        let log_json: bool = get_env_default("WEBCONFIG_LOG_JSON", false);

        Self::build(&api_base_url, base_domain, resolve_cache, log_json)
    }

    fn build(
        api_base_url: &str,
        base_domain: String,
        resolve_cache: bool,
        log_json: bool,
    ) -> Result<Self, InfraError> {
        let api_base_url = Url::parse(api_base_url).map_err(|source| InfraError::InvalidUrl {
            var: "WEBCONFIG_API_BASE_URL",
            source,
        })?;

        let base_domain = base_domain.trim().trim_matches('.').to_lowercase();
        if base_domain.is_empty() {
            return Err(InfraError::EmptyValue {
                var: "WEBCONFIG_BASE_DOMAIN",
            });
        }

        Ok(Self {
            api_base_url,
            base_domain,
            resolve_cache,
            log_json,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.base_domain, "apps.example.com");
        assert!(config.resolve_cache);
        assert!(!config.log_json);
    }

    #[test]
    fn test_build_normalizes_base_domain() {
        let config =
            AppConfig::build("https://id.example.org/v2/", " .Apps.Example.Org. ".into(), false, true)
                .unwrap();
        assert_eq!(config.base_domain, "apps.example.org");
        assert_eq!(config.api_base_url.host_str(), Some("id.example.org"));
        assert!(!config.resolve_cache);
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let err = AppConfig::build("not a url", "apps.example.com".into(), true, false).unwrap_err();
        assert!(matches!(err, InfraError::InvalidUrl { var: "WEBCONFIG_API_BASE_URL", .. }));
    }

    #[test]
    fn test_build_rejects_empty_domain() {
        let err = AppConfig::build(DEFAULT_API_BASE_URL, "  ".into(), true, false).unwrap_err();
        assert!(matches!(err, InfraError::EmptyValue { .. }));
    }
}
