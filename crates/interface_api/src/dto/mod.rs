//! Request and response bodies

pub mod expenses;

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use core_kernel::Money;

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rounds to the currency's minor unit for the wire
///
/// Amounts are kept exact internally; this is the only place they are
/// rounded on the way out.
pub(crate) fn display_amount(money: Money) -> f64 {
    money
        .round_to_currency()
        .amount()
        .to_f64()
        .unwrap_or_default()
}
