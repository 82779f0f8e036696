use serde::{Deserialize, Serialize};

/// Whether the hosted web front end of an application is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebConfigStatus {
    #[default]
    Enabled,
    Disabled,
}

impl WebConfigStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Disabled => "DISABLED",
        }
    }
}

impl std::fmt::Display for WebConfigStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WebConfigStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ENABLED" => Ok(Self::Enabled),
            "DISABLED" => Ok(Self::Disabled),
            _ => Err(format!(
                "Invalid web config status: {}. Must be 'ENABLED' or 'DISABLED'",
                s
            )),
        }
    }
}

/// Status of an API key or application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    #[default]
    Enabled,
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_uppercase() {
        let json = serde_json::to_string(&WebConfigStatus::Disabled).unwrap();
        assert_eq!(json, r#""DISABLED""#);

        let parsed: WebConfigStatus = serde_json::from_str(r#""ENABLED""#).unwrap();
        assert_eq!(parsed, WebConfigStatus::Enabled);
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!(serde_json::from_str::<WebConfigStatus>(r#""PAUSED""#).is_err());
        assert!("paused".parse::<WebConfigStatus>().is_err());
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "disabled".parse::<WebConfigStatus>().unwrap(),
            WebConfigStatus::Disabled
        );
        assert!(WebConfigStatus::Enabled.is_enabled());
        assert!(!WebConfigStatus::Disabled.is_enabled());
    }
}
