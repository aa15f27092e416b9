use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
    /// Problems found while loading; logged once the subscriber is installed
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Completion endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Full chat-completion URL (env: API_URL)
    pub api_url: String,
    /// Model identifier sent in every request (env: MODEL_NAME)
    pub model_name: String,
    /// Bearer token (env: API_KEY)
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the explicit path, or the first config.toml found
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut config = match explicit_path {
            Some(path) => Self::from_toml(path)?,
            None => match Self::find_config_file() {
                Some(path) => Self::from_toml(&path)?,
                None => Config::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    ///
    /// Supported keys:
    /// - API_URL / MODEL_NAME / API_KEY: completion endpoint settings
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 5000)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,spring_blessing=debug")
    /// - APP_LLM_TIMEOUT: Completion timeout (accepts "30", "30s", "1m")
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("API_URL") {
            self.llm.api_url = url;
        }

        if let Some(model) = lookup("MODEL_NAME") {
            self.llm.model_name = model;
        }

        if let Some(key) = lookup("API_KEY") {
            self.llm.api_key = key;
        }

        if let Some(host) = lookup("APP_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("APP_SERVER_PORT") {
            match port.parse() {
                Ok(val) => self.server.port = val,
                Err(e) => self.load_warnings.push(format!(
                    "Invalid APP_SERVER_PORT '{}': {} (keep {})",
                    port, e, self.server.port
                )),
            }
        }

        if let Some(level) = lookup("APP_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(timeout) = lookup("APP_LLM_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => self.llm.timeout_secs = val,
                Err(e) => self.load_warnings.push(format!(
                    "Invalid APP_LLM_TIMEOUT '{}': {} (keep {})",
                    timeout, e, self.llm.timeout_secs
                )),
            }
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be > 0");
        }

        Ok(())
    }

    /// Emit startup warnings: load problems and missing completion settings.
    ///
    /// Missing values never block startup; requests will fail at call time instead.
    pub fn warn_missing_llm_settings(&self) {
        for warning in &self.load_warnings {
            tracing::warn!("⚠️  {}", warning);
        }

        let missing = self.llm.missing_fields();
        if missing.is_empty() {
            tracing::info!(
                "Completion endpoint: {} (model: {}, key: {})",
                self.llm.api_url,
                self.llm.model_name,
                mask_api_key(&self.llm.api_key)
            );
            return;
        }

        tracing::warn!("⚠️  Environment variables not set: {}", missing.join(", "));
        tracing::warn!("⚠️  API_URL: {}", display_or_none(&self.llm.api_url));
        tracing::warn!("⚠️  MODEL_NAME: {}", display_or_none(&self.llm.model_name));
        tracing::warn!("⚠️  API_KEY: {}", mask_api_key(&self.llm.api_key));
    }

    fn find_config_file() -> Option<PathBuf> {
        ["conf/config.toml", "config.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    fn from_toml(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl LlmConfig {
    /// Names of the required settings that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("API_URL", &self.api_url),
            ("MODEL_NAME", &self.model_name),
            ("API_KEY", &self.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            model_name: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
            temperature: 0.8,
            max_tokens: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,spring_blessing=debug".to_string(), file: None }
    }
}

/// Mask an API key for logs: keep 4 chars on each side, or hide short keys entirely
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        "None".to_string()
    } else if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() { "None" } else { value }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.trim().parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => {
            n.checked_mul(60).ok_or_else(|| "value too large".to_string())
        },
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts either a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '1m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.max_tokens, 500);
        assert!((config.llm.temperature - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.llm.missing_fields(), vec!["API_URL", "MODEL_NAME", "API_KEY"]);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("API_URL", "https://llm.example.com/v1/chat/completions"),
            ("MODEL_NAME", "qwen-plus"),
            ("API_KEY", "sk-test"),
            ("APP_SERVER_PORT", "8081"),
            ("APP_LLM_TIMEOUT", "1m"),
        ]));

        assert_eq!(config.llm.api_url, "https://llm.example.com/v1/chat/completions");
        assert_eq!(config.llm.model_name, "qwen-plus");
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.llm.timeout_secs, 60);
        assert!(config.llm.missing_fields().is_empty());
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("APP_SERVER_PORT", "not-a-port"),
            ("APP_LLM_TIMEOUT", "5 fortnights"),
        ]));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.llm.timeout_secs, 30);

        assert_eq!(config.load_warnings.len(), 2);
        assert!(config.load_warnings[0].starts_with("Invalid APP_SERVER_PORT 'not-a-port'"));
        assert_eq!(
            config.load_warnings[1],
            "Invalid APP_LLM_TIMEOUT '5 fortnights': unsupported unit:  fortnights (keep 30)"
        );
    }

    #[test]
    fn test_valid_overrides_leave_no_warnings() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[("APP_SERVER_PORT", "8080"), ("APP_LLM_TIMEOUT", "10s")]));
        assert!(config.load_warnings.is_empty());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[llm]
model_name = "deepseek-v3"
timeout_secs = "45s"
"#
        )
        .unwrap();

        let config = Config::from_toml(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model_name, "deepseek-v3");
        assert_eq!(config.llm.timeout_secs, 45);
        assert_eq!(config.llm.max_tokens, 500);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key(""), "None");
        assert_eq!(mask_api_key("short"), "****");
        let masked = mask_api_key("sk-1234567890abcdef");
        assert_eq!(masked, "sk-1...cdef");
        assert!(!masked.contains("1234567890"));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_to_secs("30").unwrap(), 30);
        assert_eq!(parse_duration_to_secs("45s").unwrap(), 45);
        assert_eq!(parse_duration_to_secs("2m").unwrap(), 120);
        assert!(parse_duration_to_secs("h").is_err());
        assert!(parse_duration_to_secs("3h").is_err());
        assert_eq!(
            parse_duration_to_secs(&format!("{}m", u64::MAX)).unwrap_err(),
            "value too large"
        );
    }
}
