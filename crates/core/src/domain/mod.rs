pub mod chat;
pub mod equipment;
pub mod loan;
