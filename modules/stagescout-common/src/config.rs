use anyhow::{anyhow, Result};

const MAX_QUERIES_CEILING: usize = 8;

/// Application configuration loaded from environment variables.
/// Every credential is optional at startup: the search key is checked per
/// request, and a missing model key just means heuristic-only extraction.
#[derive(Debug, Clone)]
pub struct Config {
    // Search provider
    pub serpapi_api_key: Option<String>,

    // Model providers
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,

    // Pipeline tuning
    pub max_queries: usize,
    pub max_candidates_per_query: usize,
    pub llm_timeout_secs: u64,
    pub max_concurrent_extractions: usize,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            serpapi_api_key: std::env::var("SERPAPI_API_KEY").ok(),
            llm_provider: std::env::var("LLM_PROVIDER").ok(),
            llm_model: std::env::var("LLM_MODEL").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            max_queries: parse_env("MAX_QUERIES", 2)?.clamp(1, MAX_QUERIES_CEILING),
            max_candidates_per_query: parse_env("MAX_CANDIDATES", 8)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 15)?,
            max_concurrent_extractions: parse_env("MAX_CONCURRENT_EXTRACTIONS", 1)?.max(1),
            web_host: std::env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: parse_env("WEB_PORT", 3000)?,
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let n = v.len().min(5);
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SERPAPI_API_KEY: {}", preview_opt(&self.serpapi_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!(
            "  OPENROUTER_API_KEY: {}",
            preview_opt(&self.openrouter_api_key)
        );
        tracing::info!(
            "  LLM_PROVIDER: {}",
            self.llm_provider.as_deref().unwrap_or("<not set>")
        );
        tracing::info!(
            "  LLM_MODEL: {}",
            self.llm_model.as_deref().unwrap_or("<not set>")
        );
        tracing::info!("  MAX_QUERIES: {}", self.max_queries);
    }
}

impl Default for Config {
    /// Config with no credentials and stock tuning. Useful in tests.
    fn default() -> Self {
        Self {
            serpapi_api_key: None,
            llm_provider: None,
            llm_model: None,
            openai_api_key: None,
            openrouter_api_key: None,
            max_queries: 2,
            max_candidates_per_query: 8,
            llm_timeout_secs: 15,
            max_concurrent_extractions: 1,
            web_host: "0.0.0.0".to_string(),
            web_port: 3000,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow!("{key} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning() {
        let config = Config::default();
        assert_eq!(config.max_queries, 2);
        assert_eq!(config.max_candidates_per_query, 8);
        assert_eq!(config.llm_timeout_secs, 15);
        assert_eq!(config.max_concurrent_extractions, 1);
        assert!(config.serpapi_api_key.is_none());
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("STAGESCOUT_TEST_PARSE_ENV", "not-a-number");
        let result: Result<usize> = parse_env("STAGESCOUT_TEST_PARSE_ENV", 4);
        assert!(result.is_err());
        std::env::remove_var("STAGESCOUT_TEST_PARSE_ENV");
    }

    #[test]
    fn test_parse_env_missing_uses_default() {
        let value: usize = parse_env("STAGESCOUT_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
