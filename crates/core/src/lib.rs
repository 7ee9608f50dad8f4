pub mod config;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod inventory;

pub use domain::chat::{Author, ChatMessage, MessageId};
pub use domain::equipment::{Equipment, EquipmentCategory, EquipmentId, EquipmentStatus};
pub use domain::loan::{Loan, LoanId, LoanStatus};
pub use errors::{ApplicationError, DomainError};
pub use inventory::{ContextProvider, Inventory, InventoryContext, InventoryProvider, StaticContext};
