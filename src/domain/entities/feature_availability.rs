use serde::Serialize;
use webconfig_types::WebFeatureKind;

/// Effective state of one self-service flow of a web config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureAvailability {
    pub kind: WebFeatureKind,
    /// The flow's own flag.
    pub configured: bool,
    /// Whether the flow takes effect, i.e. it is configured on and the web
    /// config itself is enabled.
    pub active: bool,
}

impl FeatureAvailability {
    pub fn new(kind: WebFeatureKind, configured: bool, web_config_enabled: bool) -> Self {
        Self {
            kind,
            configured,
            active: configured && web_config_enabled,
        }
    }

    /// Configured on but suppressed by a disabled web config.
    pub fn is_suppressed(&self) -> bool {
        self.configured && !self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_dominates_feature_flag() {
        let on = FeatureAvailability::new(WebFeatureKind::Login, true, true);
        assert!(on.active);
        assert!(!on.is_suppressed());

        let suppressed = FeatureAvailability::new(WebFeatureKind::Login, true, false);
        assert!(!suppressed.active);
        assert!(suppressed.is_suppressed());

        let off = FeatureAvailability::new(WebFeatureKind::Register, false, true);
        assert!(!off.active);
        assert!(!off.is_suppressed());
    }
}
