use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::app_error::{AppError, AppResult};

const MAX_LABEL_LEN: usize = 63;
const GENERATED_SUFFIX_LEN: usize = 10;

/// Check a caller-chosen DNS label: 1-63 characters of lowercase letters,
/// digits and hyphens, not starting or ending with a hyphen.
pub fn validate_dns_label(label: &str) -> AppResult<()> {
    if is_valid_dns_label(label) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "dnsLabel '{}' must be 1-{} lowercase letters, digits or hyphens and may not start or end with a hyphen",
            label, MAX_LABEL_LEN
        )))
    }
}

fn is_valid_dns_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Label used when the tenant has not chosen one.
pub fn generate_dns_label() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("app-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_dns_label() {
        // Valid labels
        assert!(is_valid_dns_label("storefront"));
        assert!(is_valid_dns_label("my-shop"));
        assert!(is_valid_dns_label("shop2"));
        assert!(is_valid_dns_label("2shop"));
        assert!(is_valid_dns_label("a"));
        assert!(is_valid_dns_label(&"a".repeat(63)));

        // Invalid labels
        assert!(!is_valid_dns_label("")); // empty
        assert!(!is_valid_dns_label("Shop")); // uppercase
        assert!(!is_valid_dns_label("-shop")); // leading hyphen
        assert!(!is_valid_dns_label("shop-")); // trailing hyphen
        assert!(!is_valid_dns_label("my_shop")); // underscore
        assert!(!is_valid_dns_label("my.shop")); // dot
        assert!(!is_valid_dns_label("my shop")); // space
        assert!(!is_valid_dns_label(&"a".repeat(64))); // too long
    }

    #[test]
    fn test_validate_reports_invalid_input() {
        assert!(validate_dns_label("storefront").is_ok());
        assert!(matches!(
            validate_dns_label("Store Front"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generated_labels_are_valid() {
        for _ in 0..20 {
            let label = generate_dns_label();
            assert!(is_valid_dns_label(&label), "{label}");
            assert_eq!(label.len(), 4 + GENERATED_SUFFIX_LEN);
        }
    }
}
