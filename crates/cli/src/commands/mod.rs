pub mod ask;
pub mod chat;
pub mod config;
pub mod rules;
pub mod stats;

use almox_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use serde_json::Value;

use crate::bootstrap::{bootstrap, Application};

pub const EXIT_INPUT_REJECTED: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_APPLICATION: u8 = 3;
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_details(command, message, None::<Value>)
    }

    pub fn success_with_details(
        command: &str,
        message: impl Into<String>,
        details: Option<impl Serialize>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            details: details.and_then(|details| serde_json::to_value(details).ok()),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            details: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Loads config and bootstraps, or returns the failure payload for `command`.
pub(crate) fn load_application(
    command: &str,
    options: LoadOptions,
) -> Result<Application, CommandResult> {
    let config = AppConfig::load(options).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
    })?;

    bootstrap(config).map_err(|error| {
        CommandResult::failure(
            command,
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            EXIT_APPLICATION,
        )
    })
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
