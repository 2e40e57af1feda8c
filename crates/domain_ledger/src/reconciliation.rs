//! Settlement reconciliation
//!
//! Computes every member's effective contribution toward the room total from
//! the raw expense and settlement history.
//!
//! # Algorithm
//!
//! 1. Each member's base contribution is the sum of the expenses they paid.
//!    `per_head = total / member_count` (zero for an empty room).
//! 2. Members whose base exceeds `per_head` are creditors; the excess is their
//!    credit and `total_debt` is the sum of all credits.
//! 3. The settlement pool (`total_settled`) is paid out to creditors in
//!    proportion to their credit: each creditor's contribution drops by
//!    `credit / total_debt * total_settled`. With no creditors nothing is
//!    paid out.
//! 4. Every settlement is added to its payer's contribution.
//!
//! Settlements are never matched to a specific creditor. Replacing the pool
//! with pairwise debts would change the balances members see.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Currency, MemberId, Money};

use crate::error::LedgerError;
use crate::room::Member;
use crate::snapshot::RoomSnapshot;

/// Result of reconciling one room snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Sum of all expenses in the room
    pub total: Money,
    /// Fair share per current member
    pub per_head: Money,
    /// Sum of all settlements in the room
    pub total_settled: Money,
    /// Effective contribution per current member
    pub contributions: BTreeMap<MemberId, Money>,
    /// Members the sheet was computed for
    pub members: Vec<Member>,
}

/// A member's signed position against the fair share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    /// Positive: the member owes the room. Zero or negative: settled or owed.
    pub owes: Money,
}

/// Reconciles a room's expense and settlement history
///
/// Pure: the same snapshot always yields the same sheet, and nothing is
/// retained between calls.
///
/// # Errors
///
/// `LedgerError::AmountOverflow` if the history sums past what a `Decimal`
/// can hold. Every intermediate is checked, including the balances the
/// sheet later derives, so reading a returned sheet never overflows.
pub fn compute_balances(snapshot: &RoomSnapshot) -> Result<BalanceSheet, LedgerError> {
    let currency = snapshot.currency;

    if snapshot.members.is_empty() {
        return Ok(BalanceSheet::empty(currency));
    }

    let total = checked_sum(snapshot.expenses.iter().map(|e| e.amount.amount()))?;
    let per_head = total / Decimal::from(snapshot.member_count());

    // Only current members accumulate; departed payers still count in `total`.
    let mut contributions: BTreeMap<MemberId, Decimal> = snapshot
        .members
        .iter()
        .map(|m| (m.id, Decimal::ZERO))
        .collect();

    for expense in &snapshot.expenses {
        if let Some(contribution) = contributions.get_mut(&expense.paid_by) {
            *contribution = checked_add(*contribution, expense.amount.amount())?;
        }
    }

    let creditors: Vec<(MemberId, Decimal)> = contributions
        .iter()
        .filter_map(|(member_id, contribution)| {
            let credit = *contribution - per_head;
            (credit > Decimal::ZERO).then_some((*member_id, credit))
        })
        .collect();
    let total_debt = checked_sum(creditors.iter().map(|(_, credit)| *credit))?;

    let total_settled = checked_sum(snapshot.settlements.iter().map(|s| s.amount.amount()))?;

    if total_debt > Decimal::ZERO {
        for (member_id, credit) in &creditors {
            let received = (*credit / total_debt)
                .checked_mul(total_settled)
                .ok_or(LedgerError::AmountOverflow)?;
            if let Some(contribution) = contributions.get_mut(member_id) {
                *contribution = contribution
                    .checked_sub(received)
                    .ok_or(LedgerError::AmountOverflow)?;
            }
        }
    }

    for settlement in &snapshot.settlements {
        if let Some(contribution) = contributions.get_mut(&settlement.paid_by) {
            *contribution = checked_add(*contribution, settlement.amount.amount())?;
        }
    }

    // `ledger_sum` and `balance_for` rely on these fitting.
    checked_sum(contributions.values().copied())?;
    for contribution in contributions.values() {
        per_head
            .checked_sub(*contribution)
            .ok_or(LedgerError::AmountOverflow)?;
    }

    Ok(BalanceSheet {
        total: Money::new(total, currency),
        per_head: Money::new(per_head, currency),
        total_settled: Money::new(total_settled, currency),
        contributions: contributions
            .into_iter()
            .map(|(member_id, amount)| (member_id, Money::new(amount, currency)))
            .collect(),
        members: snapshot.members.clone(),
    })
}

pub(crate) fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::AmountOverflow)
}

pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, LedgerError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, checked_add)
}

impl BalanceSheet {
    /// The degenerate result for a room without members
    pub fn empty(currency: Currency) -> Self {
        Self {
            total: Money::zero(currency),
            per_head: Money::zero(currency),
            total_settled: Money::zero(currency),
            contributions: BTreeMap::new(),
            members: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.total.currency()
    }

    /// True when the sheet covers no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Effective contribution of a current member
    pub fn contribution(&self, member_id: MemberId) -> Option<Money> {
        self.contributions.get(&member_id).copied()
    }

    /// Amount a member still owes: `per_head - contribution`
    ///
    /// Positive means the member owes the room; zero or negative means they
    /// are settled or are owed money. `None` for non-members.
    pub fn balance_for(&self, member_id: MemberId) -> Option<Money> {
        self.contribution(member_id)
            .map(|c| Money::new(self.per_head.amount() - c.amount(), self.currency()))
    }

    /// Every member's balance in member order
    pub fn balances(&self) -> Vec<MemberBalance> {
        self.members
            .iter()
            .map(|member| MemberBalance {
                member_id: member.id,
                name: member.name.clone(),
                owes: self
                    .balance_for(member.id)
                    .unwrap_or_else(|| Money::zero(self.currency())),
            })
            .collect()
    }

    /// Contributions keyed by display name, keeping only those above `threshold`
    ///
    /// Members sharing a display name collapse into one entry; the last one in
    /// member order wins.
    pub fn chart_data(&self, threshold: Decimal) -> BTreeMap<String, Money> {
        self.members
            .iter()
            .filter_map(|member| {
                let contribution = self.contribution(member.id)?;
                (contribution.amount() > threshold).then(|| (member.name.clone(), contribution))
            })
            .collect()
    }

    /// Sum of every member's effective contribution
    pub fn ledger_sum(&self) -> Money {
        let sum: Decimal = self.contributions.values().map(|c| c.amount()).sum();
        Money::new(sum, self.currency())
    }
}
