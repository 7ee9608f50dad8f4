use almox_agent::guardrails::InputDecision;
use almox_core::config::LoadOptions;
use almox_core::inventory::ContextProvider;
use serde::Serialize;
use tracing::info;

use crate::commands::{load_application, CommandResult, EXIT_INPUT_REJECTED};

#[derive(Debug, Serialize)]
struct AskDetails {
    rule_id: Option<String>,
}

pub fn run(options: LoadOptions, text: &str) -> CommandResult {
    let app = match load_application("ask", options) {
        Ok(app) => app,
        Err(failure) => return failure,
    };

    if let InputDecision::Reject { reason_code, user_message } =
        app.session_options().input_policy.evaluate(text)
    {
        return CommandResult::failure(
            "ask",
            "input_rejected",
            format!("{user_message} ({reason_code})"),
            EXIT_INPUT_REJECTED,
        );
    }

    let context = app.provider.snapshot();
    let resolution = app.resolver.resolve_detailed(text, &context);
    info!(
        event_name = "assistant.reply.resolved",
        rule_id = resolution.rule_id.as_deref().unwrap_or("fallback"),
        "one-shot question resolved"
    );

    CommandResult::success_with_details(
        "ask",
        resolution.text,
        Some(AskDetails { rule_id: resolution.rule_id }),
    )
}
