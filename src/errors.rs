use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::PaymentStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreditError {
    #[error("invalid principal: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid term: {term_months} months")]
    InvalidTerm {
        term_months: Decimal,
    },

    #[error("invalid start date: {value}")]
    InvalidStartDate {
        value: String,
    },

    #[error("schedule would be empty: term {term_months} months at {periods_per_month} periods/month")]
    ZeroInstallments {
        term_months: Decimal,
        periods_per_month: u32,
    },

    #[error("business-day adjustment did not converge from {date} within {cap} steps")]
    DateAdjustmentNonConvergence {
        date: NaiveDate,
        cap: u32,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("invalid void transition: payment {id} is {status:?}")]
    InvalidVoidTransition {
        id: Uuid,
        status: PaymentStatus,
    },
}

pub type Result<T> = std::result::Result<T, CreditError>;
