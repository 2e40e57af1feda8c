//! Domain Adapters
//!
//! Port implementations that connect the ledger domain to PostgreSQL.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLedgerAdapter;
//! use domain_ledger::RoomDirectory;
//!
//! let adapter = PostgresLedgerAdapter::new(pool);
//! let room = adapter.room_for_member(member_id).await?;
//! ```

pub mod ledger;

pub use ledger::PostgresLedgerAdapter;
