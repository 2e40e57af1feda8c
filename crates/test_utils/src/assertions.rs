//! Custom Test Assertions
//!
//! Assertion helpers for ledger types that give more meaningful failure
//! messages than standard assertions.

use core_kernel::{MemberId, Money};
use domain_ledger::BalanceSheet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tolerance for comparing exact decimal results that went through a division
pub const LEDGER_EPSILON: Decimal = dec!(0.000000001);

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts what a member owes (negative: is owed)
pub fn assert_owes(sheet: &BalanceSheet, member_id: MemberId, expected: Decimal) {
    let owes = sheet
        .balance_for(member_id)
        .unwrap_or_else(|| panic!("{} is not in the balance sheet", member_id));
    let diff = (owes.amount() - expected).abs();
    assert!(
        diff <= LEDGER_EPSILON,
        "{} owes {}, expected {}",
        member_id,
        owes.amount(),
        expected
    );
}

/// Asserts that the contributions add up to the expense total
///
/// Holds whenever no settlements were made, and whenever at least one
/// member paid more than their fair share.
pub fn assert_ledger_conserved(sheet: &BalanceSheet) {
    let diff = (sheet.ledger_sum().amount() - sheet.total.amount()).abs();
    assert!(
        diff <= LEDGER_EPSILON,
        "Contributions sum to {}, total is {}",
        sheet.ledger_sum().amount(),
        sheet.total.amount()
    );
}

/// Asserts the degenerate all-zero sheet
pub fn assert_sheet_empty(sheet: &BalanceSheet) {
    assert_money_zero(&sheet.total);
    assert_money_zero(&sheet.per_head);
    assert_money_zero(&sheet.total_settled);
    for balance in sheet.balances() {
        assert_money_zero(&balance.owes);
    }
}
