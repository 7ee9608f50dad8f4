use std::env;
use std::fs;
use std::path::Path;

use almox_core::config::{resolve_config_path, AppConfig, LoadOptions, LogFormat};
use serde::Serialize;
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = vec![
        ConfigField {
            key: "assistant.typing_delay_ms",
            value: config.assistant.typing_delay_ms.to_string(),
            source: source("assistant.typing_delay_ms", &["ALMOX_ASSISTANT_TYPING_DELAY_MS"]),
        },
        ConfigField {
            key: "assistant.max_input_chars",
            value: config.assistant.max_input_chars.to_string(),
            source: source("assistant.max_input_chars", &["ALMOX_ASSISTANT_MAX_INPUT_CHARS"]),
        },
        ConfigField {
            key: "assistant.greeting_enabled",
            value: config.assistant.greeting_enabled.to_string(),
            source: source("assistant.greeting_enabled", &["ALMOX_ASSISTANT_GREETING_ENABLED"]),
        },
        ConfigField {
            key: "assistant.rules_path",
            value: display_path(config.assistant.rules_path.as_deref(), "<built-in>"),
            source: source("assistant.rules_path", &["ALMOX_ASSISTANT_RULES_PATH"]),
        },
        ConfigField {
            key: "inventory.seed_path",
            value: display_path(config.inventory.seed_path.as_deref(), "<demo>"),
            source: source("inventory.seed_path", &["ALMOX_INVENTORY_SEED_PATH"]),
        },
        ConfigField {
            key: "inventory.as_of",
            value: config
                .inventory
                .as_of
                .map(|date| date.to_string())
                .unwrap_or_else(|| "<today>".to_string()),
            source: source("inventory.as_of", &["ALMOX_INVENTORY_AS_OF"]),
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["ALMOX_LOGGING_LEVEL", "ALMOX_LOG_LEVEL"]),
        },
        ConfigField {
            key: "logging.format",
            value: format_name(config.logging.format).to_string(),
            source: source("logging.format", &["ALMOX_LOGGING_FORMAT", "ALMOX_LOG_FORMAT"]),
        },
    ];

    CommandResult::success_with_details(
        "config",
        "effective config (source precedence: env > file > default)",
        Some(fields),
    )
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(**key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn display_path(path: Option<&Path>, unset: &str) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| unset.to_string())
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}
