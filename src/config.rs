use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Resolved settings for a single evaluation request.
///
/// The API key is passed in explicitly rather than read from the process
/// environment here, so callers (and tests) decide where it comes from.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub max_tokens: u32,
}

impl EvaluatorConfig {
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            api_base: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        self.api_base = api_base.filter(|base| !base.trim().is_empty());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(
        mut self,
        max_tokens: u32,
    ) -> Result<Self, ConfigError> {
        if max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }
        self.max_tokens = max_tokens;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_config_error() {
        assert!(matches!(
            EvaluatorConfig::new(None),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            EvaluatorConfig::new(Some("   ".to_string())),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::new(Some("sk-test".to_string())).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.max_tokens, 100);
        assert!(config.api_base.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = EvaluatorConfig::new(Some("sk-test".to_string()))
            .unwrap()
            .with_api_base(Some("http://localhost:8080/v1".to_string()))
            .with_model("gpt-4o-mini")
            .with_max_tokens(256)
            .unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_blank_api_base_is_ignored() {
        let config = EvaluatorConfig::new(Some("sk-test".to_string()))
            .unwrap()
            .with_api_base(Some(String::new()));
        assert!(config.api_base.is_none());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let result = EvaluatorConfig::new(Some("sk-test".to_string()))
            .unwrap()
            .with_max_tokens(0);
        assert!(matches!(result, Err(ConfigError::InvalidMaxTokens)));
    }
}
