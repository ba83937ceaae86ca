use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Listening address is not configurable; the server always accepts
/// connections on every interface.
pub const LISTEN_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub openai: OpenAIConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// Completion API credential. `None` keeps the server running but every
    /// `/ask` call answers with a missing-credential error.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Upper bound for one completion call in seconds (default: 60)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
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
    /// 1. Load from `explicit_path`, or the first config.toml found
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    pub fn load(explicit_path: Option<&str>) -> Result<Self, anyhow::Error> {
        let config_path = explicit_path.map(str::to_string).or_else(Self::find_config_file);

        let mut config = if let Some(config_path) = config_path {
            tracing::info!("Loading configuration from {}", config_path);
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - PORT: Server port (default: 5001)
    /// - OPENAI_API_KEY: Completion API credential
    /// - OPENAI_BASE_URL: Completion API base URL (default: https://api.openai.com/v1)
    /// - APP_OPENAI_TIMEOUT_SECS: Completion call timeout (accepts "60", "60s", "2m")
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,jazykovy_ai=debug")
    /// - APP_LOG_FILE: Log file path; daily rolling
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.openai.api_key = Some(key);
            tracing::info!("Override openai.api_key from env");
        }

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            self.openai.base_url = base_url;
            tracing::info!("Override openai.base_url from env: {}", self.openai.base_url);
        }

        if let Ok(timeout) = std::env::var("APP_OPENAI_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.openai.timeout_secs = val;
                    tracing::info!(
                        "Override openai.timeout_secs from env: {}",
                        self.openai.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_OPENAI_TIMEOUT_SECS '{}': {} (keep {})",
                    timeout,
                    e,
                    self.openai.timeout_secs
                ),
            }
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(file) = std::env::var("APP_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    /// A blank key from any source counts as no key.
    fn normalize(&mut self) {
        self.openai.api_key = self.openai.api_key.take().filter(|k| !k.trim().is_empty());
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.openai.timeout_secs == 0 {
            anyhow::bail!("openai.timeout_secs must be > 0");
        }

        if self.openai.base_url.trim().is_empty() {
            anyhow::bail!("openai.base_url cannot be empty");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths = ["conf/config.toml", "config.toml"];

        possible_paths
            .iter()
            .find(|path| Path::new(path).exists())
            .map(|path| path.to_string())
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl OpenAIConfig {
    /// Usable credential; blank keys are treated as missing.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// The key must never end up in logs.
impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5001 }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,jazykovy_ai=debug".to_string(), file: None }
    }
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
    let secs = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(n),
        "m" | "min" | "mins" | "minute" | "minutes" => n.checked_mul(60),
        "h" | "hr" | "hour" | "hours" => n.checked_mul(60 * 60),
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    secs.ok_or_else(|| format!("duration too large: {}", input))
}

// Accepts numeric or human-friendly string values
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '5m', '1h'")
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

    #[test]
    fn test_parse_duration_to_secs() {
        assert_eq!(parse_duration_to_secs("45"), Ok(45));
        assert_eq!(parse_duration_to_secs("30s"), Ok(30));
        assert_eq!(parse_duration_to_secs("2m"), Ok(120));
        assert_eq!(parse_duration_to_secs("1h"), Ok(3600));
        assert!(parse_duration_to_secs("abc").is_err());
        assert!(parse_duration_to_secs("10w").is_err());
        assert!(parse_duration_to_secs("99999999999999999h").is_err());
        assert!(parse_duration_to_secs("18446744073709551615m").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5001);
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai.timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_human_durations() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8088

            [openai]
            base_url = "http://localhost:9999/v1"
            timeout_secs = "2m"

            [logging]
            level = "debug"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.openai.base_url, "http://localhost:9999/v1");
        assert_eq!(config.openai.timeout_secs, 120);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config: Config = toml::from_str("[openai]\napi_key = \"  \"").expect("valid toml");
        assert_eq!(config.openai.api_key.as_deref(), Some("  "));
        assert!(config.openai.credential().is_none());

        config.normalize();
        assert!(config.openai.api_key.is_none());

        let config: Config = toml::from_str("[openai]\napi_key = \"sk-live\"").expect("valid toml");
        assert_eq!(config.openai.credential(), Some("sk-live"));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.openai.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = OpenAIConfig { api_key: Some("sk-secret".to_string()), ..Default::default() };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("***"));
    }
}
