use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::links::{Resource, ResourceRef};

/// The self-service flows that can be toggled on a web config.
///
/// The camelCase name is both the property name on the web config and the
/// last path segment of the sub-config's href.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum WebFeatureKind {
    Oauth2,
    Register,
    VerifyEmail,
    Login,
    Logout,
    ForgotPassword,
    ChangePassword,
    IdSite,
    Callback,
    Me,
}

impl WebFeatureKind {
    /// Whether the flow is switched on for a freshly provisioned application.
    pub fn default_enabled(&self) -> bool {
        match self {
            Self::Oauth2 | Self::Register | Self::Login | Self::Logout | Self::Callback | Self::Me => {
                true
            }
            Self::VerifyEmail | Self::ForgotPassword | Self::ChangePassword | Self::IdSite => false,
        }
    }
}

/// A toggleable sub-config of a web config.
pub trait WebFeature: Resource + Serialize + Clone {
    const KIND: WebFeatureKind;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// The sub-config as the service creates it during provisioning.
    fn default_at(href: impl Into<String>) -> Self;
}

macro_rules! toggle_feature {
    ($(#[$doc:meta])* $name:ident => $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub href: String,
            pub enabled: bool,
        }

        impl Resource for $name {
            fn href(&self) -> &str {
                &self.href
            }
        }

        impl WebFeature for $name {
            const KIND: WebFeatureKind = WebFeatureKind::$kind;

            fn is_enabled(&self) -> bool {
                self.enabled
            }

            fn set_enabled(&mut self, enabled: bool) {
                self.enabled = enabled;
            }

            fn default_at(href: impl Into<String>) -> Self {
                Self {
                    href: href.into(),
                    enabled: WebFeatureKind::$kind.default_enabled(),
                }
            }
        }
    };
}

toggle_feature!(
    /// Self-service registration of new accounts.
    RegisterConfig => Register
);
toggle_feature!(
    /// Verification of newly registered accounts' email addresses.
    VerifyEmailConfig => VerifyEmail
);
toggle_feature!(
    /// Self-service login.
    LoginConfig => Login
);
toggle_feature!(
    /// Logout: deletes the authentication cookies set on login and revokes
    /// the tokens they carried.
    LogoutConfig => Logout
);
toggle_feature!(
    /// Self-service password reset.
    ForgotPasswordConfig => ForgotPassword
);
toggle_feature!(
    /// Completion of a password reset with a new password.
    ChangePasswordConfig => ChangePassword
);
toggle_feature!(
    /// Hosted login pages (ID Site).
    IdSiteConfig => IdSite
);
toggle_feature!(
    /// Callback endpoint for ID Site and social login results.
    CallbackConfig => Callback
);

/// Which linked resources the `me` endpoint expands inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MeExpansion {
    pub api_keys: bool,
    pub applications: bool,
    pub custom_data: bool,
    pub directory: bool,
    pub group_memberships: bool,
    pub groups: bool,
    pub provider_data: bool,
    pub tenant: bool,
}

/// Lets the client application fetch the account of the currently
/// authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeConfig {
    pub href: String,
    pub enabled: bool,
    #[serde(default)]
    pub expand: MeExpansion,
}

impl Resource for MeConfig {
    fn href(&self) -> &str {
        &self.href
    }
}

impl WebFeature for MeConfig {
    const KIND: WebFeatureKind = WebFeatureKind::Me;

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn default_at(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            enabled: WebFeatureKind::Me.default_enabled(),
            expand: MeExpansion::default(),
        }
    }
}

pub type RegisterConfigRef = ResourceRef<RegisterConfig>;
pub type VerifyEmailConfigRef = ResourceRef<VerifyEmailConfig>;
pub type LoginConfigRef = ResourceRef<LoginConfig>;
pub type LogoutConfigRef = ResourceRef<LogoutConfig>;
pub type ForgotPasswordConfigRef = ResourceRef<ForgotPasswordConfig>;
pub type ChangePasswordConfigRef = ResourceRef<ChangePasswordConfig>;
pub type IdSiteConfigRef = ResourceRef<IdSiteConfig>;
pub type CallbackConfigRef = ResourceRef<CallbackConfig>;
pub type MeConfigRef = ResourceRef<MeConfig>;
