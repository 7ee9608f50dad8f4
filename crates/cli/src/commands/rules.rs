use almox_core::config::LoadOptions;
use serde::Serialize;

use crate::commands::{load_application, CommandResult};

#[derive(Debug, Serialize)]
struct RuleSummary {
    position: usize,
    id: String,
    mode: &'static str,
    triggers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RulesDetails {
    source: String,
    rules: Vec<RuleSummary>,
    fallback: String,
    greeting: Option<String>,
}

pub fn run(options: LoadOptions) -> CommandResult {
    let app = match load_application("rules", options) {
        Ok(app) => app,
        Err(failure) => return failure,
    };

    let rule_set = app.resolver.rules();
    let rules = rule_set
        .rules()
        .iter()
        .enumerate()
        .map(|(index, rule)| RuleSummary {
            position: index + 1,
            id: rule.id.clone(),
            mode: rule.mode.as_str(),
            triggers: rule.triggers.clone(),
        })
        .collect::<Vec<_>>();

    let message =
        format!("{} rules in evaluation order (source: {})", rules.len(), app.rules_source);
    CommandResult::success_with_details(
        "rules",
        message,
        Some(RulesDetails {
            source: app.rules_source.clone(),
            rules,
            fallback: rule_set.fallback().to_string(),
            greeting: rule_set.greeting().map(str::to_string),
        }),
    )
}
