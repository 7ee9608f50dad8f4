use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["almox.toml", "config/almox.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub inventory: InventoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub typing_delay_ms: u64,
    pub max_input_chars: usize,
    pub greeting_enabled: bool,
    pub rules_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct InventoryConfig {
    pub seed_path: Option<PathBuf>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub typing_delay_ms: Option<u64>,
    pub rules_path: Option<PathBuf>,
    pub inventory_seed_path: Option<PathBuf>,
    pub inventory_as_of: Option<NaiveDate>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig {
                typing_delay_ms: 1_500,
                max_input_chars: 2_000,
                greeting_enabled: true,
                rules_path: None,
            },
            inventory: InventoryConfig { seed_path: None, as_of: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATHS[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(assistant) = patch.assistant {
            if let Some(typing_delay_ms) = assistant.typing_delay_ms {
                self.assistant.typing_delay_ms = typing_delay_ms;
            }
            if let Some(max_input_chars) = assistant.max_input_chars {
                self.assistant.max_input_chars = max_input_chars;
            }
            if let Some(greeting_enabled) = assistant.greeting_enabled {
                self.assistant.greeting_enabled = greeting_enabled;
            }
            if let Some(rules_path) = assistant.rules_path {
                self.assistant.rules_path = Some(rules_path);
            }
        }

        if let Some(inventory) = patch.inventory {
            if let Some(seed_path) = inventory.seed_path {
                self.inventory.seed_path = Some(seed_path);
            }
            if let Some(as_of) = inventory.as_of {
                self.inventory.as_of = Some(as_of);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ALMOX_ASSISTANT_TYPING_DELAY_MS") {
            self.assistant.typing_delay_ms = parse_u64("ALMOX_ASSISTANT_TYPING_DELAY_MS", &value)?;
        }
        if let Some(value) = read_env("ALMOX_ASSISTANT_MAX_INPUT_CHARS") {
            self.assistant.max_input_chars =
                parse_usize("ALMOX_ASSISTANT_MAX_INPUT_CHARS", &value)?;
        }
        if let Some(value) = read_env("ALMOX_ASSISTANT_GREETING_ENABLED") {
            self.assistant.greeting_enabled =
                parse_bool("ALMOX_ASSISTANT_GREETING_ENABLED", &value)?;
        }
        if let Some(value) = read_env("ALMOX_ASSISTANT_RULES_PATH") {
            self.assistant.rules_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("ALMOX_INVENTORY_SEED_PATH") {
            self.inventory.seed_path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("ALMOX_INVENTORY_AS_OF") {
            self.inventory.as_of = Some(parse_date("ALMOX_INVENTORY_AS_OF", &value)?);
        }

        let log_level = read_env("ALMOX_LOGGING_LEVEL").or_else(|| read_env("ALMOX_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("ALMOX_LOGGING_FORMAT").or_else(|| read_env("ALMOX_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(typing_delay_ms) = overrides.typing_delay_ms {
            self.assistant.typing_delay_ms = typing_delay_ms;
        }
        if let Some(rules_path) = overrides.rules_path {
            self.assistant.rules_path = Some(rules_path);
        }
        if let Some(seed_path) = overrides.inventory_seed_path {
            self.inventory.seed_path = Some(seed_path);
        }
        if let Some(as_of) = overrides.inventory_as_of {
            self.inventory.as_of = Some(as_of);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_assistant(&self.assistant)?;
        validate_inventory(&self.inventory)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `load` would read: the explicit path when it exists, else
/// the first default found.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_PATHS.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_assistant(assistant: &AssistantConfig) -> Result<(), ConfigError> {
    if assistant.typing_delay_ms > 10_000 {
        return Err(ConfigError::Validation(
            "assistant.typing_delay_ms must be in range 0..=10000".to_string(),
        ));
    }

    if assistant.max_input_chars == 0 {
        return Err(ConfigError::Validation(
            "assistant.max_input_chars must be greater than zero".to_string(),
        ));
    }

    if let Some(path) = &assistant.rules_path {
        if !path.exists() {
            return Err(ConfigError::Validation(format!(
                "assistant.rules_path `{}` does not exist",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_inventory(inventory: &InventoryConfig) -> Result<(), ConfigError> {
    if let Some(path) = &inventory.seed_path {
        if !path.exists() {
            return Err(ConfigError::Validation(format!(
                "inventory.seed_path `{}` does not exist",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    assistant: Option<AssistantPatch>,
    inventory: Option<InventoryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct AssistantPatch {
    typing_delay_ms: Option<u64>,
    max_input_chars: Option<usize>,
    greeting_enabled: Option<bool>,
    rules_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryPatch {
    seed_path: Option<PathBuf>,
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const ALMOX_VARS: &[&str] = &[
        "ALMOX_ASSISTANT_TYPING_DELAY_MS",
        "ALMOX_ASSISTANT_MAX_INPUT_CHARS",
        "ALMOX_ASSISTANT_GREETING_ENABLED",
        "ALMOX_ASSISTANT_RULES_PATH",
        "ALMOX_INVENTORY_SEED_PATH",
        "ALMOX_INVENTORY_AS_OF",
        "ALMOX_LOGGING_LEVEL",
        "ALMOX_LOG_LEVEL",
        "ALMOX_LOGGING_FORMAT",
        "ALMOX_LOG_FORMAT",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_are_valid_without_any_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let config = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.assistant.typing_delay_ms == 1_500, "default delay should be 1500ms")?;
        ensure(config.assistant.greeting_enabled, "greeting should be enabled by default")?;
        ensure(config.inventory.seed_path.is_none(), "seed path should default to demo data")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);
        env::set_var("TEST_ALMOX_DELAY", "250");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("almox.toml");
            fs::write(
                &path,
                r#"
[assistant]
typing_delay_ms = ${TEST_ALMOX_DELAY}
greeting_enabled = false

[inventory]
as_of = "2024-06-20"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.assistant.typing_delay_ms == 250, "delay should come from env var")?;
            ensure(!config.assistant.greeting_enabled, "greeting should be disabled by file")?;
            ensure(
                config.inventory.as_of == NaiveDate::from_ymd_opt(2024, 6, 20),
                "as_of date should be parsed from file",
            )
        })();

        clear_vars(&["TEST_ALMOX_DELAY"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);
        env::set_var("ALMOX_LOG_LEVEL", "warn");
        env::set_var("ALMOX_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(ALMOX_VARS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);
        env::set_var("ALMOX_ASSISTANT_TYPING_DELAY_MS", "900");
        env::set_var("ALMOX_ASSISTANT_MAX_INPUT_CHARS", "500");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("almox.toml");
            fs::write(
                &path,
                r#"
[assistant]
typing_delay_ms = 100
max_input_chars = 100

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    typing_delay_ms: Some(0),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.assistant.typing_delay_ms == 0, "override delay should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.assistant.max_input_chars == 500,
                "env max_input_chars should win over file and defaults",
            )
        })();

        clear_vars(ALMOX_VARS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);
        env::set_var("ALMOX_ASSISTANT_TYPING_DELAY_MS", "60000");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("typing_delay_ms")
            );
            ensure(has_message, "validation failure should mention typing_delay_ms")
        })();

        clear_vars(ALMOX_VARS);
        result
    }

    #[test]
    fn malformed_env_override_is_reported_with_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);
        env::set_var("ALMOX_INVENTORY_AS_OF", "20/06/2024");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "ALMOX_INVENTORY_AS_OF", "error should name the offending variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected invalid env override".to_string()),
        };

        clear_vars(ALMOX_VARS);
        result
    }

    #[test]
    fn missing_seed_file_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(ALMOX_VARS);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                inventory_seed_path: Some(dir.path().join("missing.toml")),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(
            matches!(
                result,
                Err(ConfigError::Validation(ref message)) if message.contains("inventory.seed_path")
            ),
            "missing seed file should fail validation",
        )
    }
}
