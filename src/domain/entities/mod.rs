pub mod feature_availability;
pub mod web_config;
