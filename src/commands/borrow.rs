use crate::error::AppError;
use crate::lending::{quote_loan, LoanQuote, LoanQuoteArgs};

pub fn loan_quote(args: Option<LoanQuoteArgs>) -> Result<LoanQuote, AppError> {
    quote_loan(args.unwrap_or_default())
}
