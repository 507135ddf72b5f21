//! Runtime configuration, read from the process environment.

use std::env;

use crate::error::LadexError;

/// Which extraction strategy drives a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorMode {
    /// Regex fallback only, no network calls.
    #[default]
    Pattern,
    /// LLM extraction with regex substitution on quota exhaustion.
    RemoteAssisted,
}

impl ExtractorMode {
    fn parse(value: &str) -> Result<Self, LadexError> {
        match value.trim().to_lowercase().as_str() {
            "" | "regex" | "pattern" => Ok(ExtractorMode::Pattern),
            "openai" | "remote" | "remote-assisted" => Ok(ExtractorMode::RemoteAssisted),
            other => Err(LadexError::Config(format!(
                "unknown EXTRACTOR_MODE '{other}' (expected 'regex' or 'openai')"
            ))),
        }
    }
}

/// Connection parameters for the remote extractor.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API credential; required only in remote-assisted mode.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Completion endpoint.
    pub endpoint: String,
    /// Attempt budget for retryable HTTP statuses.
    pub max_attempts: u32,
    /// First backoff delay; doubles per attempt.
    pub base_backoff_secs: f64,
    /// OCR text is truncated to this many characters before sending.
    pub max_input_chars: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            max_attempts: 4,
            base_backoff_secs: 2.0,
            max_input_chars: 6000,
        }
    }
}

/// Top-level configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct LadexConfig {
    /// Extraction strategy selector.
    pub mode: ExtractorMode,
    /// Remote extractor connection parameters.
    pub remote: RemoteConfig,
    /// Pause between consecutive documents, in seconds.
    pub pause_secs: u64,
}

impl LadexConfig {
    /// Read configuration from the environment.
    ///
    /// Recognized variables: `EXTRACTOR_MODE`, `OPENAI_API_KEY`,
    /// `OPENAI_MODEL`, `LADEX_MAX_ATTEMPTS`, `LADEX_BASE_BACKOFF_SECS`,
    /// `LADEX_PAUSE_SECS`.
    pub fn from_env() -> Result<Self, LadexError> {
        let mode = ExtractorMode::parse(&env::var("EXTRACTOR_MODE").unwrap_or_default())?;

        let mut remote = RemoteConfig::default();
        remote.api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if let Ok(model) = env::var("OPENAI_MODEL") {
            let model = model.trim().to_string();
            if !model.is_empty() {
                remote.model = model;
            }
        }
        if let Some(attempts) = parse_env("LADEX_MAX_ATTEMPTS")? {
            remote.max_attempts = attempts;
        }
        if let Some(backoff) = parse_env("LADEX_BASE_BACKOFF_SECS")? {
            remote.base_backoff_secs = backoff;
        }

        let pause_secs = parse_env("LADEX_PAUSE_SECS")?.unwrap_or(5);

        Ok(Self {
            mode,
            remote,
            pause_secs,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, LadexError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LadexError::Config(format!("invalid value for {name}: '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(ExtractorMode::parse("regex").unwrap(), ExtractorMode::Pattern);
        assert_eq!(ExtractorMode::parse("OPENAI").unwrap(), ExtractorMode::RemoteAssisted);
        assert_eq!(ExtractorMode::parse("").unwrap(), ExtractorMode::Pattern);
        assert!(ExtractorMode::parse("turbo").is_err());
    }
}
