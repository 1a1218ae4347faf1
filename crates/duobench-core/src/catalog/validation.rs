use std::collections::HashSet;

use crate::catalog::model::{EndpointPair, RequestSpec};
use crate::error::DuobenchError;

/// Validate a catalog and return a list of validation errors.
///
/// An empty `Vec` means the catalog is valid. The catalog is fixed for the
/// whole run, so this is checked once before any traffic is generated.
pub fn validate_catalog(pairs: &[EndpointPair]) -> Vec<DuobenchError> {
    let mut errors = Vec::new();

    if pairs.is_empty() {
        errors.push(DuobenchError::Validation(
            "Catalog must contain at least one endpoint pair".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for pair in pairs {
        if pair.name.trim().is_empty() {
            errors.push(DuobenchError::Validation(
                "Endpoint pair name must not be empty".to_string(),
            ));
        }
        if !seen.insert(pair.name.as_str()) {
            errors.push(DuobenchError::Validation(format!(
                "Duplicate endpoint pair name: '{}'",
                pair.name
            )));
        }

        errors.extend(validate_spec(&pair.name, "baseline", &pair.baseline));
        errors.extend(validate_spec(&pair.name, "candidate", &pair.candidate));
    }

    errors
}

fn validate_spec(pair_name: &str, side: &str, spec: &RequestSpec) -> Vec<DuobenchError> {
    let mut errors = Vec::new();

    let url = spec.url.trim();
    if url.is_empty() {
        errors.push(DuobenchError::Validation(format!(
            "Pair '{pair_name}' ({side}): URL must not be empty"
        )));
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(DuobenchError::Validation(format!(
            "Pair '{pair_name}' ({side}): URL must start with http:// or https:// (got: {url})"
        )));
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pair(name: &str, url_a: &str, url_b: &str) -> EndpointPair {
        EndpointPair::new(name, RequestSpec::get(url_a), RequestSpec::get(url_b))
    }

    #[test]
    fn valid_catalog_produces_no_errors() {
        let pairs = vec![
            make_pair("search", "https://a.example.com/s", "https://b.example.com/s"),
            make_pair("detail", "http://a.example.com/d", "http://b.example.com/d"),
        ];
        let errors = validate_catalog(&pairs);
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn empty_catalog_produces_error() {
        let errors = validate_catalog(&[]);
        assert!(!errors.is_empty());
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("at least one endpoint pair")));
    }

    #[test]
    fn duplicate_names_produce_error() {
        let pairs = vec![
            make_pair("search", "https://a.example.com", "https://b.example.com"),
            make_pair("search", "https://a.example.com", "https://b.example.com"),
        ];
        let errors = validate_catalog(&pairs);
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("Duplicate endpoint pair name")));
    }

    #[test]
    fn empty_name_produces_error() {
        let pairs = vec![make_pair("  ", "https://a.example.com", "https://b.example.com")];
        let errors = validate_catalog(&pairs);
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("name must not be empty")));
    }

    #[test]
    fn empty_url_produces_error_naming_the_side() {
        let pairs = vec![make_pair("search", "", "https://b.example.com")];
        let errors = validate_catalog(&pairs);
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("(baseline): URL must not be empty")));
    }

    #[test]
    fn non_http_scheme_produces_error() {
        let pairs = vec![make_pair("search", "https://a.example.com", "ftp://b.example.com")];
        let errors = validate_catalog(&pairs);
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("must start with http://")));
    }

    #[test]
    fn multiple_errors_accumulate() {
        let pairs = vec![
            make_pair("", "", "ftp://b.example.com"),
            make_pair("x", "https://a.example.com", "https://b.example.com"),
            make_pair("x", "https://a.example.com", "https://b.example.com"),
        ];
        let errors = validate_catalog(&pairs);
        assert!(errors.len() >= 4, "Expected >= 4 errors, got: {:?}", errors);
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let config = crate::config::RunConfig::from_lookup(|_| None).expect("defaults");
        let errors = validate_catalog(&crate::catalog::builtin(&config));
        assert!(errors.is_empty(), "builtin catalog invalid: {:?}", errors);
    }
}
