use crate::error::AppError;
use crate::market::format::format_usd;
use serde::{Deserialize, Serialize};

pub const DAILY_INTEREST_RATE: f64 = 0.00308;
pub const DEFAULT_TERM_DAYS: u32 = 7;
pub const MIN_TERM_DAYS: u32 = 1;
pub const MAX_TERM_DAYS: u32 = 365;

/// Borrow form input. The principal stays as typed text.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoanQuoteArgs {
    pub principal: String,
    pub term_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanQuote {
    pub principal: f64,
    pub term_days: u32,
    pub daily_rate: f64,
    pub daily_rate_formatted: String,
    pub total_interest: f64,
    pub total_interest_formatted: String,
}

impl LoanQuoteArgs {
    pub fn normalize(self) -> Result<(f64, u32), AppError> {
        let term_days = self.term_days.unwrap_or(DEFAULT_TERM_DAYS);
        if !(MIN_TERM_DAYS..=MAX_TERM_DAYS).contains(&term_days) {
            return Err(AppError::InvalidArgument(format!(
                "termDays must be between {MIN_TERM_DAYS} and {MAX_TERM_DAYS}"
            )));
        }

        // Unparsable or non-positive input quotes as a zero principal.
        let principal = self
            .principal
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(0.0);
        Ok((principal, term_days))
    }
}

pub fn quote_loan(args: LoanQuoteArgs) -> Result<LoanQuote, AppError> {
    let (principal, term_days) = args.normalize()?;
    let total_interest = principal * DAILY_INTEREST_RATE * f64::from(term_days);

    Ok(LoanQuote {
        principal,
        term_days,
        daily_rate: DAILY_INTEREST_RATE,
        daily_rate_formatted: format!("{:.3}%", DAILY_INTEREST_RATE * 100.0),
        total_interest,
        total_interest_formatted: format_usd(total_interest, 2),
    })
}
