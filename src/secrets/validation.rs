//! # Completeness Validation
//!
//! Gate between parsing and publication: every key in the mapping must be
//! present in the bundle, and all absent keys are reported at once.

use crate::error::BootstrapError;
use crate::secrets::bundle::SecretBundle;
use crate::secrets::mapping::SecretMapping;

/// Keys from `mapping` absent in `bundle`, in mapping order
pub fn missing_keys(bundle: &SecretBundle, mapping: &SecretMapping) -> Vec<String> {
    mapping
        .iter()
        .filter(|entry| !bundle.contains_key(&entry.key))
        .map(|entry| entry.key.clone())
        .collect()
}

/// Fail with `IncompleteSecret` listing every missing key
pub fn validate(bundle: &SecretBundle, mapping: &SecretMapping) -> Result<(), BootstrapError> {
    let missing_keys = missing_keys(bundle, mapping);
    if missing_keys.is_empty() {
        Ok(())
    } else {
        Err(BootstrapError::IncompleteSecret { missing_keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::bundle::RawPayload;

    fn bundle(json: &str) -> SecretBundle {
        SecretBundle::parse(&RawPayload::new(json)).unwrap()
    }

    #[test]
    fn test_complete_bundle_passes() {
        let bundle = bundle(
            r#"{"openai_key":"a","github_app_id":"b","github_webhook_secret":"c","github_private_key":"ZA=="}"#,
        );
        assert!(validate(&bundle, &SecretMapping::reference()).is_ok());
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let bundle = bundle(
            r#"{"openai_key":"a","github_app_id":"b","github_webhook_secret":"c","github_private_key":"ZA==","unused":"x"}"#,
        );
        assert!(validate(&bundle, &SecretMapping::reference()).is_ok());
    }

    #[test]
    fn test_reports_all_missing_keys_in_mapping_order() {
        let bundle = bundle(r#"{"github_app_id":"b"}"#);
        match validate(&bundle, &SecretMapping::reference()) {
            Err(BootstrapError::IncompleteSecret { missing_keys }) => {
                assert_eq!(
                    missing_keys,
                    vec![
                        "openai_key".to_string(),
                        "github_webhook_secret".to_string(),
                        "github_private_key".to_string(),
                    ]
                );
            }
            other => panic!("Expected IncompleteSecret, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_string_value_counts_as_present() {
        let bundle = bundle(
            r#"{"openai_key":"","github_app_id":"b","github_webhook_secret":"c","github_private_key":"ZA=="}"#,
        );
        assert!(missing_keys(&bundle, &SecretMapping::reference()).is_empty());
    }
}
