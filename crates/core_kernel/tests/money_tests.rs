//! Unit tests for the Money module
//!
//! Tests cover money creation, ingestion from client floats, arithmetic,
//! currency handling, and display formatting.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::INR);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::INR);
    }

    #[test]
    fn test_new_does_not_round() {
        let m = Money::new(dec!(100.123456789), Currency::INR);
        assert_eq!(m.amount(), dec!(100.123456789));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_default_currency_is_rupee() {
        assert_eq!(Currency::default(), Currency::INR);
    }
}

mod ingestion {
    use super::*;

    #[test]
    fn test_nan_is_rejected() {
        let err = Money::from_f64(f64::NAN, Currency::INR).unwrap_err();
        assert!(matches!(err, MoneyError::InvalidAmount(_)));
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn test_whole_amount_is_exact() {
        let m = Money::from_f64(300.0, Currency::INR).unwrap();
        assert_eq!(m.amount(), dec!(300));
    }

    #[test]
    fn test_negative_values_pass_conversion() {
        // Sign rules are enforced by the ledger entities, not by Money itself.
        let m = Money::from_f64(-5.0, Currency::INR).unwrap();
        assert!(m.is_negative());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_and_sub() {
        let a = Money::new(dec!(100.00), Currency::INR);
        let b = Money::new(dec!(40.25), Currency::INR);

        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(140.25));
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(59.75));
    }

    #[test]
    fn test_checked_sub_mismatch() {
        let a = Money::new(dec!(1), Currency::INR);
        let b = Money::new(dec!(1), Currency::GBP);
        assert_eq!(
            a.checked_sub(&b),
            Err(MoneyError::CurrencyMismatch("INR".to_string(), "GBP".to_string()))
        );
    }

    #[test]
    fn test_divide_three_ways_keeps_precision() {
        let total = Money::new(dec!(100), Currency::INR);
        let share = total.divide(Decimal::from(3)).unwrap();

        let recombined = share.amount() * Decimal::from(3);
        assert!((recombined - dec!(100)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_abs() {
        let m = Money::new(dec!(-12.5), Currency::INR);
        assert_eq!(m.abs().amount(), dec!(12.5));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_rupee_display() {
        assert_eq!(Money::new(dec!(1200), Currency::INR).to_string(), "₹1200.00");
    }

    #[test]
    fn test_display_rounds_half_cents_up() {
        assert_eq!(Money::new(dec!(10.125), Currency::USD).to_string(), "$10.13");
        assert_eq!(Money::new(dec!(10.135), Currency::USD).to_string(), "$10.14");
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::INR.to_string(), "INR");
        assert_eq!(Currency::SGD.symbol(), "S$");
    }
}
