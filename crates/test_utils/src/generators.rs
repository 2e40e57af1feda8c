//! Property-Based Test Generators
//!
//! Proptest strategies that produce valid ledger inputs.

use core_kernel::{Currency, Money};
use domain_ledger::RoomSnapshot;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::RoomSnapshotBuilder;

/// Strategy for generating expense amounts in minor units (0 to 1,00,000.00)
pub fn expense_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..10_000_000i64
}

/// Strategy for generating settlement amounts in minor units (never zero)
pub fn settlement_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

/// Strategy for generating INR expense amounts
pub fn inr_expense_strategy() -> impl Strategy<Value = Money> {
    expense_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for a room's members and expense history, without settlements
pub fn expense_only_snapshot_strategy() -> impl Strategy<Value = RoomSnapshot> {
    (1usize..6).prop_flat_map(|members| {
        proptest::collection::vec((0..members, expense_minor_strategy()), 0..12).prop_map(
            move |expenses| {
                let names: Vec<String> = (0..members).map(|i| format!("Member {}", i)).collect();
                let builder = names
                    .iter()
                    .fold(RoomSnapshotBuilder::new(), |b, name| b.with_member(name));
                expenses
                    .into_iter()
                    .fold(builder, |b, (payer, minor)| {
                        b.with_expense(payer, Decimal::new(minor, 2))
                    })
                    .build()
            },
        )
    })
}

/// Strategy for a room with expenses and settlements
pub fn snapshot_strategy() -> impl Strategy<Value = RoomSnapshot> {
    (1usize..6).prop_flat_map(|members| {
        (
            proptest::collection::vec((0..members, expense_minor_strategy()), 0..12),
            proptest::collection::vec((0..members, settlement_minor_strategy()), 0..4),
        )
            .prop_map(move |(expenses, settlements)| {
                let names: Vec<String> = (0..members).map(|i| format!("Member {}", i)).collect();
                let builder = names
                    .iter()
                    .fold(RoomSnapshotBuilder::new(), |b, name| b.with_member(name));
                let builder = expenses.into_iter().fold(builder, |b, (payer, minor)| {
                    b.with_expense(payer, Decimal::new(minor, 2))
                });
                settlements
                    .into_iter()
                    .fold(builder, |b, (payer, minor)| {
                        b.with_settlement(payer, Decimal::new(minor, 2))
                    })
                    .build()
            })
    })
}
