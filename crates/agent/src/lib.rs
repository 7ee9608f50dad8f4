//! Assistant Runtime - keyword-triggered help-desk replies for the loan inventory
//!
//! This crate provides the chat side of almox:
//! - Matches free-text questions against an ordered rule table
//! - Fills reply templates with live inventory counts
//! - Validates input before it reaches the resolver
//! - Runs chat sessions with a cancellable typing delay
//!
//! # Architecture
//!
//! A message flows through:
//! 1. **Input Policy** (`guardrails`) - reject blank or oversized input
//! 2. **Rule Matching** (`rules`, `conversation`) - first matching rule wins, else fallback
//! 3. **Delivery** (`runtime`) - the reply lands in the `transcript` after the delay
//!
//! # Key Types
//!
//! - `ResponseResolver` - Pure text to reply mapping
//! - `RuleSet` - Ordered trigger table, built in or loaded from TOML
//! - `ChatSession` - One conversation with at most one pending reply
//!
//! The resolver never invents numbers. Every count in a reply comes from the
//! `InventoryContext` handed to it.

pub mod conversation;
pub mod guardrails;
pub mod rules;
pub mod runtime;
pub mod transcript;

pub use conversation::{Resolution, ResponseResolver};
pub use guardrails::{InputDecision, InputPolicy};
pub use rules::{MatchMode, Rule, RuleSet, RuleSetError};
pub use runtime::{ChatSession, SessionOptions, SubmitError};
pub use transcript::Transcript;
