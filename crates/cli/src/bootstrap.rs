use std::sync::Arc;

use almox_agent::conversation::ResponseResolver;
use almox_agent::rules::RuleSet;
use almox_agent::runtime::{ChatSession, SessionOptions};
use almox_core::config::AppConfig;
use almox_core::errors::ApplicationError;
use almox_core::fixtures;
use almox_core::inventory::{ContextProvider, Inventory, InventoryProvider};
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub rules_source: String,
    pub resolver: Arc<ResponseResolver>,
    pub provider: Arc<InventoryProvider>,
}

impl Application {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::from_config(&self.config.assistant, self.resolver.rules())
    }

    /// Must be called inside a tokio runtime.
    pub fn new_session(&self) -> ChatSession {
        let provider: Arc<dyn ContextProvider> = self.provider.clone();
        ChatSession::new(Arc::clone(&self.resolver), provider, self.session_options())
    }
}

pub fn bootstrap(config: AppConfig) -> Result<Application, ApplicationError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let (inventory, inventory_source, as_of) = match config.inventory.seed_path.as_deref() {
        Some(path) => (Inventory::load(path)?, path.display().to_string(), config.inventory.as_of),
        // The demo dataset is pinned to its reference date so its counts stay stable.
        None => (
            fixtures::demo_inventory()?,
            "demo".to_string(),
            Some(config.inventory.as_of.unwrap_or_else(fixtures::demo_reference_date)),
        ),
    };
    let provider = InventoryProvider::new(inventory, as_of);
    info!(
        event_name = "inventory.loaded",
        source = %inventory_source,
        equipment = provider.inventory().equipment().len(),
        loans = provider.inventory().loans().len(),
        as_of = %provider.evaluation_date(),
        "inventory loaded"
    );

    let (rules, rules_source) = match config.assistant.rules_path.as_deref() {
        Some(path) => (RuleSet::load(path)?, path.display().to_string()),
        None => (RuleSet::default(), "built-in".to_string()),
    };
    info!(
        event_name = "system.bootstrap.rules_loaded",
        source = %rules_source,
        rule_count = rules.rules().len(),
        "response rules loaded"
    );

    Ok(Application {
        config,
        rules_source,
        resolver: Arc::new(ResponseResolver::new(rules)),
        provider: Arc::new(provider),
    })
}
