// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro-exp-03-25";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_RESPONSE_DUMP_PATH: &str = "gemini_response.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub port: u16,
    pub gemini: GeminiConfig,
    /// Where the raw model output is copied for debugging. `None` disables the copy.
    pub response_dump_path: Option<PathBuf>,
}

/// Settings for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// API root, always ending with `/` so that `Url::join` appends to it.
    pub base_url: Url,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: parse_base_url(DEFAULT_GEMINI_BASE_URL)
                .expect("default Gemini base URL is valid"),
            timeout_secs: 120,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = optional_var("PORT")
            .map(|p| p.parse().expect("PORT must be a valid port number"))
            .unwrap_or(3000);

        let api_key = optional_var("GEMINI_API_KEY");

        let model = optional_var("GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let base_url = parse_base_url(
            &optional_var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        )
        .expect("GEMINI_BASE_URL must be a valid URL");

        let timeout_secs = optional_var("GEMINI_TIMEOUT_SECS")
            .map(|v| v.parse().expect("GEMINI_TIMEOUT_SECS must be a positive integer"))
            .unwrap_or(120);

        let temperature = optional_var("GEMINI_TEMPERATURE")
            .map(|v| v.parse().expect("GEMINI_TEMPERATURE must be a number"));

        let max_output_tokens = optional_var("GEMINI_MAX_OUTPUT_TOKENS")
            .map(|v| v.parse().expect("GEMINI_MAX_OUTPUT_TOKENS must be a positive integer"));

        // Unset means the default path, an explicitly empty value turns the copy off.
        let response_dump_path = match env::var("RESPONSE_DUMP_PATH") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_RESPONSE_DUMP_PATH)),
        };

        Self {
            database_url,
            rust_log,
            port,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
                timeout_secs,
                temperature,
                max_output_tokens,
            },
            response_dump_path,
        }
    }
}

/// Reads a variable, treating blank values as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses the API root and makes sure it ends with a slash.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8080/v1beta").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v1beta/");

        let url = parse_base_url(DEFAULT_GEMINI_BASE_URL).unwrap();
        assert_eq!(url.as_str(), DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = GeminiConfig {
            api_key: Some("super-secret".to_string()),
            ..GeminiConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
