use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::equipment::EquipmentId;
use crate::domain::loan::LoanId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate equipment id `{0:?}`")]
    DuplicateEquipment(EquipmentId),
    #[error("loan `{loan:?}` references unknown equipment `{equipment:?}`")]
    UnknownEquipment { loan: LoanId, equipment: EquipmentId },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("could not load inventory from `{path}`: {message}")]
    InventoryLoad { path: PathBuf, message: String },
    #[error("could not load rules from `{path}`: {message}")]
    RulesLoad { path: PathBuf, message: String },
}

impl ApplicationError {
    /// Stable machine-readable class used in CLI payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Configuration(_) => "config_validation",
            Self::InventoryLoad { .. } => "inventory_load",
            Self::RulesLoad { .. } => "rules_load",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) => {
                "The inventory data is inconsistent. Check equipment and loan records."
            }
            Self::Configuration(_) => {
                "The configuration is invalid. Run `almox config` to inspect it."
            }
            Self::InventoryLoad { .. } => "The inventory file could not be read.",
            Self::RulesLoad { .. } => "The rules file could not be read.",
        }
    }
}
