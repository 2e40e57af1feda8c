//! Household Ledger Domain
//!
//! Tracks what members of a shared room have paid for and reconciles it into
//! per-member balances.
//!
//! # Pooled Settlement Model
//!
//! - **Expense**: money a member put in on behalf of the room
//! - **Per head**: room total divided by the number of current members
//! - **Settlement**: a payment by a member who owes money; it is not addressed
//!   to anyone and is redistributed to every creditor in proportion to what
//!   they are owed
//!
//! # Examples
//!
//! ```rust
//! use domain_ledger::{compute_balances, Expense, Member, Room, RoomSnapshot, Settlement};
//! use core_kernel::{Currency, MemberId, Money};
//! use rust_decimal_macros::dec;
//!
//! let a = Member::new(MemberId::new(), "A");
//! let b = Member::new(MemberId::new(), "B");
//! let c = Member::new(MemberId::new(), "C");
//! let room = Room::new("Flat", a.clone(), Currency::INR)
//!     .with_member(b.clone())
//!     .with_member(c.clone());
//!
//! let rent = Expense::new(room.id, a.id, "Rent", Money::new(dec!(300), Currency::INR)).unwrap();
//! let paid = Settlement::new(room.id, b.id, Money::new(dec!(100), Currency::INR)).unwrap();
//!
//! let sheet = compute_balances(&RoomSnapshot::new(&room, vec![rent], vec![paid])).unwrap();
//! assert_eq!(sheet.balance_for(a.id).unwrap().amount(), dec!(-100));
//! assert_eq!(sheet.balance_for(b.id).unwrap().amount(), dec!(0));
//! assert_eq!(sheet.balance_for(c.id).unwrap().amount(), dec!(100));
//! ```

pub mod activity;
pub mod config;
pub mod error;
pub mod expense;
pub mod ports;
pub mod reconciliation;
pub mod room;
pub mod service;
pub mod settle;
pub mod settlement;
pub mod snapshot;

pub use activity::{ActivityCategory, ActivityEvent};
pub use config::{LedgerConfig, DEFAULT_CHART_THRESHOLD, DEFAULT_SETTLE_TOLERANCE};
pub use error::LedgerError;
pub use expense::Expense;
pub use ports::{ActivitySink, ClearedLedger, LedgerStore, RoomDirectory};
pub use ports::memory::{InMemoryLedger, InMemoryRooms, RecordingActivitySink};
pub use reconciliation::{compute_balances, BalanceSheet, MemberBalance};
pub use room::{Member, Room};
pub use service::{LedgerService, SplitSummary};
pub use settle::{amount_owed, prepare_settlement};
pub use settlement::Settlement;
pub use snapshot::RoomSnapshot;
