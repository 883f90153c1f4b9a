use std::env;
use std::str::FromStr;

use crate::build::resolver::StepLayout;
use crate::error::RelayError;

pub const DEFAULT_STATUS_CONTEXT: &str = "gcb";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub status_context: String,
    pub server_host: String,
    pub server_port: u16,
    pub step_layout: StepLayout,
}

impl AppConfig {
    pub fn load() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let github_token = non_empty("GITHUB_TOKEN");
        let github_api_url = non_empty("GITHUB_API_URL");

        let status_context =
            non_empty("STATUS_CONTEXT").unwrap_or_else(|| DEFAULT_STATUS_CONTEXT.to_string());

        let server_host = non_empty("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let server_port = parse_or(&non_empty, "PORT", 8080)?;

        let step_layout = StepLayout {
            clone_step_index: parse_or(
                &non_empty,
                "CLONE_STEP_INDEX",
                StepLayout::V1.clone_step_index,
            )?,
            checkout_step_index: parse_or(
                &non_empty,
                "CHECKOUT_STEP_INDEX",
                StepLayout::V1.checkout_step_index,
            )?,
            ..StepLayout::V1
        };

        if step_layout.clone_step_index == step_layout.checkout_step_index {
            return Err(RelayError::ConfigError(format!(
                "CLONE_STEP_INDEX and CHECKOUT_STEP_INDEX must differ (both {})",
                step_layout.clone_step_index
            )));
        }

        Ok(AppConfig {
            github_token,
            github_api_url,
            status_context,
            server_host,
            server_port,
            step_layout,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, RelayError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|e| RelayError::ConfigError(format!("Invalid {}={:?}: {}", key, value, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, RelayError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.github_token, None);
        assert_eq!(config.github_api_url, None);
        assert_eq!(config.status_context, "gcb");
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.step_layout, StepLayout::V1);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GITHUB_TOKEN", "ghp_test"),
            ("GITHUB_API_URL", "https://github.example.com/api/v3"),
            ("STATUS_CONTEXT", "ci/cloudbuild"),
            ("PORT", "3000"),
            ("CLONE_STEP_INDEX", "0"),
            ("CHECKOUT_STEP_INDEX", "1"),
        ])
        .unwrap();

        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(config.status_context, "ci/cloudbuild");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.step_layout.clone_step_index, 0);
        assert_eq!(config.step_layout.checkout_step_index, 1);
        assert_eq!(config.step_layout.url_arg_index, 1);
    }

    #[test]
    fn test_empty_token_is_absent() {
        let config = config_from(&[("GITHUB_TOKEN", "")]).unwrap();
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, RelayError::ConfigError(_)));
    }

    #[test]
    fn test_same_step_indices_rejected() {
        let err = config_from(&[("CLONE_STEP_INDEX", "5")]).unwrap_err();
        assert!(matches!(err, RelayError::ConfigError(_)));
    }
}
