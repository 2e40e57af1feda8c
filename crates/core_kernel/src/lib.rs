//! Core Kernel - Foundational types for the shared-household ledger
//!
//! This crate provides the building blocks used by the ledger domain and
//! its adapters:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port error and health-check abstractions

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, MAX_AMOUNT};
pub use identifiers::{RoomId, MemberId, ExpenseId, SettlementId, ActivityId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
