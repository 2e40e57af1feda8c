//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common ledger entities. Names and amounts are
//! fixed so failures are easy to read; identifiers are fresh per call.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{Currency, MemberId, Money};
use domain_ledger::Member;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Any rupee amount
    pub fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    /// A month's rent
    pub fn inr_rent() -> Money {
        Money::new(dec!(15000.00), Currency::INR)
    }

    /// A grocery run
    pub fn inr_groceries() -> Money {
        Money::new(dec!(450.00), Currency::INR)
    }

    /// Creates a zero amount
    pub fn inr_zero() -> Money {
        Money::zero(Currency::INR)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for household members
pub struct MemberFixtures;

impl MemberFixtures {
    /// Room owner in the default household
    pub fn asha() -> Member {
        Member::new(MemberId::new(), "Asha")
    }

    pub fn ravi() -> Member {
        Member::new(MemberId::new(), "Ravi")
    }

    pub fn meera() -> Member {
        Member::new(MemberId::new(), "Meera")
    }

    /// Someone who belongs to no room
    pub fn stranger() -> Member {
        Member::new(MemberId::new(), "Stranger")
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Start of the household's first month (Jan 1, 2024)
    pub fn month_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// `minutes` after `month_start`, for deterministic ordering
    pub fn minutes_in(minutes: i64) -> DateTime<Utc> {
        Self::month_start() + Duration::minutes(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_fixtures() {
        assert_eq!(MoneyFixtures::inr_rent().currency(), Currency::INR);
        assert!(MoneyFixtures::inr_zero().is_zero());
        assert_eq!(MoneyFixtures::usd_100().currency(), Currency::USD);
    }

    #[test]
    fn test_members_are_distinct() {
        assert_ne!(MemberFixtures::asha().id, MemberFixtures::asha().id);
    }

    #[test]
    fn test_minutes_are_ordered() {
        assert!(TemporalFixtures::minutes_in(1) > TemporalFixtures::minutes_in(0));
    }
}
