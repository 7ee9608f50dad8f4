//! Equipment and loan records, and the count snapshot the assistant reads.
//!
//! The records were module-level mock tables in the demo UI. Here they are
//! explicit data handed in at startup, either from [`crate::fixtures`] or
//! from a TOML file, so every consumer can be tested against its own dataset.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::equipment::{Equipment, EquipmentCategory, EquipmentId};
use crate::domain::loan::{Loan, LoanStatus};
use crate::errors::{ApplicationError, DomainError};

/// Read-only snapshot of counts interpolated into assistant replies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryContext {
    pub total: u32,
    pub available: u32,
    pub on_loan: u32,
    pub overdue: u32,
    pub notebooks_available: u32,
    pub mice_available: u32,
    pub keyboards_available: u32,
}

impl InventoryContext {
    /// Every name a reply template may reference as `{{name}}`.
    pub const VARIABLES: [&'static str; 7] = [
        "total",
        "available",
        "on_loan",
        "overdue",
        "notebooks_available",
        "mice_available",
        "keyboards_available",
    ];

    pub fn value_of(&self, name: &str) -> Option<u32> {
        match name {
            "total" => Some(self.total),
            "available" => Some(self.available),
            "on_loan" => Some(self.on_loan),
            "overdue" => Some(self.overdue),
            "notebooks_available" => Some(self.notebooks_available),
            "mice_available" => Some(self.mice_available),
            "keyboards_available" => Some(self.keyboards_available),
            _ => None,
        }
    }

    pub fn variables(&self) -> Vec<(&'static str, u32)> {
        Self::VARIABLES
            .iter()
            .filter_map(|name| self.value_of(name).map(|value| (*name, value)))
            .collect()
    }
}

/// Supplies the snapshot at resolution time.
pub trait ContextProvider: Send + Sync {
    fn snapshot(&self) -> InventoryContext;
}

/// Fixed snapshot, mostly for tests and one-shot resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticContext(pub InventoryContext);

impl ContextProvider for StaticContext {
    fn snapshot(&self) -> InventoryContext {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    equipment: Vec<Equipment>,
    #[serde(default)]
    loans: Vec<Loan>,
}

impl Inventory {
    pub fn new(equipment: Vec<Equipment>, loans: Vec<Loan>) -> Result<Self, DomainError> {
        let inventory = Self { equipment, loans };
        inventory.validate()?;
        Ok(inventory)
    }

    pub fn load(path: &Path) -> Result<Self, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|error| ApplicationError::InventoryLoad {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        let inventory: Inventory =
            toml::from_str(&raw).map_err(|error| ApplicationError::InventoryLoad {
                path: path.to_path_buf(),
                message: error.to_string(),
            })?;
        inventory.validate()?;

        debug!(
            event_name = "inventory.file_parsed",
            path = %path.display(),
            equipment_count = inventory.equipment.len(),
            loan_count = inventory.loans.len(),
            "inventory file parsed"
        );
        Ok(inventory)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = BTreeSet::new();
        for item in &self.equipment {
            if item.id.0.trim().is_empty() {
                return Err(DomainError::InvariantViolation(
                    "equipment id must not be empty".to_string(),
                ));
            }
            if !seen.insert(&item.id) {
                return Err(DomainError::DuplicateEquipment(item.id.clone()));
            }
        }

        for loan in &self.loans {
            if !seen.contains(&loan.equipment_id) {
                return Err(DomainError::UnknownEquipment {
                    loan: loan.id.clone(),
                    equipment: loan.equipment_id.clone(),
                });
            }
            if loan.expected_return_date < loan.loan_date {
                return Err(DomainError::InvariantViolation(format!(
                    "loan {:?} is due before it was issued",
                    loan.id
                )));
            }
        }

        Ok(())
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn find_equipment(&self, id: &EquipmentId) -> Option<&Equipment> {
        self.equipment.iter().find(|item| &item.id == id)
    }

    /// Loans past due on `as_of`, most overdue first.
    pub fn overdue_loans(&self, as_of: NaiveDate) -> Vec<&Loan> {
        let mut overdue = self
            .loans
            .iter()
            .filter(|loan| loan.status(as_of) == LoanStatus::Overdue)
            .collect::<Vec<_>>();
        overdue.sort_by_key(|loan| std::cmp::Reverse(loan.days_overdue(as_of)));
        overdue
    }

    pub fn context_as_of(&self, as_of: NaiveDate) -> InventoryContext {
        let available_in = |category: EquipmentCategory| {
            count(
                self.equipment
                    .iter()
                    .filter(|item| item.category == category && item.is_available()),
            )
        };

        InventoryContext {
            total: count(self.equipment.iter()),
            available: count(self.equipment.iter().filter(|item| item.is_available())),
            on_loan: count(self.loans.iter().filter(|loan| loan.is_active())),
            overdue: count(self.overdue_loans(as_of).into_iter()),
            notebooks_available: available_in(EquipmentCategory::Notebook),
            mice_available: available_in(EquipmentCategory::Mouse),
            keyboards_available: available_in(EquipmentCategory::Keyboard),
        }
    }
}

fn count<I: Iterator>(items: I) -> u32 {
    u32::try_from(items.count()).unwrap_or(u32::MAX)
}

/// Computes the snapshot from live records, pinned to a date when configured.
#[derive(Clone, Debug)]
pub struct InventoryProvider {
    inventory: Inventory,
    as_of: Option<NaiveDate>,
}

impl InventoryProvider {
    pub fn new(inventory: Inventory, as_of: Option<NaiveDate>) -> Self {
        Self { inventory, as_of }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl ContextProvider for InventoryProvider {
    fn snapshot(&self) -> InventoryContext {
        self.inventory.context_as_of(self.evaluation_date())
    }
}
