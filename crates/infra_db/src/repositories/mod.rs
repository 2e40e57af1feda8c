//! Repository implementations
//!
//! Repositories own the SQL and speak in row types; conversion to domain
//! types happens in the adapters.
//!
//! Queries are checked at runtime (`sqlx::query_as` with `FromRow`) so the
//! crate builds without a live database.

pub mod activity;
pub mod ledger;
pub mod rooms;

pub use activity::{ActivityRepository, ActivityRow};
pub use ledger::{ExpenseRow, LedgerRepository, SettlementRow};
pub use rooms::{RoomMemberRow, RoomRepository, RoomRow, RoomWithMembers};
