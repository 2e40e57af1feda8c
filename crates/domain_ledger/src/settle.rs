//! Settle-up calculation
//!
//! The amount a member pays to settle is measured against their own direct
//! payments only (expenses they paid plus settlements they already made). The
//! pool redistribution in [`crate::reconciliation`] never applies to the
//! member doing the settling: a member who owes money is not a creditor.

use rust_decimal::Decimal;

use core_kernel::{MemberId, Money};

use crate::error::LedgerError;
use crate::reconciliation::checked_sum;
use crate::settlement::Settlement;
use crate::snapshot::RoomSnapshot;

/// `per_head - (own expenses + own settlements)` for `member_id`
///
/// Zero for an empty room.
///
/// # Errors
///
/// `LedgerError::AmountOverflow` if the history sums past what a `Decimal`
/// can hold
pub fn amount_owed(snapshot: &RoomSnapshot, member_id: MemberId) -> Result<Money, LedgerError> {
    if snapshot.members.is_empty() {
        return Ok(Money::zero(snapshot.currency));
    }

    let total = checked_sum(snapshot.expenses.iter().map(|e| e.amount.amount()))?;
    let per_head = total / Decimal::from(snapshot.member_count());

    let paid = checked_sum(
        snapshot
            .expenses
            .iter()
            .filter(|e| e.paid_by == member_id)
            .map(|e| e.amount.amount()),
    )?;
    let settled = checked_sum(
        snapshot
            .settlements
            .iter()
            .filter(|s| s.paid_by == member_id)
            .map(|s| s.amount.amount()),
    )?;

    let owed = paid
        .checked_add(settled)
        .and_then(|direct| per_head.checked_sub(direct))
        .ok_or(LedgerError::AmountOverflow)?;
    Ok(Money::new(owed, snapshot.currency))
}

/// Builds the settlement that clears `member_id`'s debt
///
/// Nothing is persisted here; the caller appends the returned settlement.
///
/// # Errors
///
/// - `LedgerError::NotInRoom` if the member is not part of the snapshot
/// - `LedgerError::NoOutstandingBalance` if the owed amount is `<= tolerance`
/// - `LedgerError::AmountOverflow` if the history cannot be summed
pub fn prepare_settlement(
    snapshot: &RoomSnapshot,
    member_id: MemberId,
    tolerance: Decimal,
) -> Result<Settlement, LedgerError> {
    if !snapshot.has_member(member_id) {
        return Err(LedgerError::NotInRoom(member_id.to_string()));
    }

    let owed = amount_owed(snapshot, member_id)?;
    if owed.amount() <= tolerance {
        return Err(LedgerError::NoOutstandingBalance {
            owed: owed.amount(),
        });
    }

    Settlement::new(snapshot.room_id, member_id, owed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::Expense;
    use crate::room::Member;
    use crate::config::DEFAULT_SETTLE_TOLERANCE;
    use core_kernel::{Currency, RoomId};
    use rust_decimal_macros::dec;

    fn pair(payer_amount: Decimal) -> (RoomSnapshot, Member, Member) {
        let a = Member::new(MemberId::new(), "A");
        let b = Member::new(MemberId::new(), "B");
        let mut snapshot = RoomSnapshot::empty(RoomId::new(), Currency::INR);
        snapshot.members = vec![a.clone(), b.clone()];
        snapshot.expenses.push(
            Expense::new(snapshot.room_id, a.id, "Bread", Money::new(payer_amount, Currency::INR))
                .unwrap(),
        );
        (snapshot, a, b)
    }

    #[test]
    fn test_owed_exactly_at_tolerance_is_rejected() {
        let (snapshot, _, b) = pair(dec!(0.02));
        assert_eq!(amount_owed(&snapshot, b.id).unwrap().amount(), dec!(0.01));

        let result = prepare_settlement(&snapshot, b.id, DEFAULT_SETTLE_TOLERANCE);
        assert!(matches!(result, Err(LedgerError::NoOutstandingBalance { .. })));
    }

    #[test]
    fn test_owed_just_above_tolerance_settles() {
        let (snapshot, _, b) = pair(dec!(0.04));
        let settlement = prepare_settlement(&snapshot, b.id, DEFAULT_SETTLE_TOLERANCE).unwrap();

        assert_eq!(settlement.amount.amount(), dec!(0.02));
        assert_eq!(settlement.paid_by, b.id);
        assert_eq!(settlement.room_id, snapshot.room_id);
    }

    #[test]
    fn test_creditor_has_nothing_to_settle() {
        let (snapshot, a, _) = pair(dec!(100));
        let result = prepare_settlement(&snapshot, a.id, DEFAULT_SETTLE_TOLERANCE);
        assert!(matches!(
            result,
            Err(LedgerError::NoOutstandingBalance { owed }) if owed == dec!(-50)
        ));
    }

    #[test]
    fn test_stranger_cannot_settle() {
        let (snapshot, _, _) = pair(dec!(100));
        let result = prepare_settlement(&snapshot, MemberId::new(), DEFAULT_SETTLE_TOLERANCE);
        assert!(matches!(result, Err(LedgerError::NotInRoom(_))));
    }

    #[test]
    fn test_empty_room_owes_nothing() {
        let snapshot = RoomSnapshot::empty(RoomId::new(), Currency::INR);
        assert!(amount_owed(&snapshot, MemberId::new()).unwrap().is_zero());
    }

    #[test]
    fn test_history_past_decimal_range_is_an_error() {
        let (mut snapshot, a, b) = pair(dec!(1));
        let mut second = snapshot.expenses[0].clone();
        snapshot.expenses[0].amount = Money::new(dec!(50000000000000000000000000000), Currency::INR);
        second.amount = snapshot.expenses[0].amount;
        snapshot.expenses.push(second);

        assert!(matches!(amount_owed(&snapshot, b.id), Err(LedgerError::AmountOverflow)));
        assert!(matches!(
            prepare_settlement(&snapshot, a.id, DEFAULT_SETTLE_TOLERANCE),
            Err(LedgerError::AmountOverflow)
        ));
    }
}
