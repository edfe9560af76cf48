pub mod generator;

pub use generator::ScheduleGenerator;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::HolidayCalendar;
use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};
use crate::types::PaymentFrequency;

/// loan terms consumed by schedule generation.
///
/// immutable once a schedule is materialized; changing the term or frequency
/// means regenerating the schedule from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// flat monthly rate (e.g. 5% per declared month of term)
    pub monthly_rate: Rate,
    /// declared term in months, may be fractional
    pub term_months: Decimal,
    pub frequency: PaymentFrequency,
    pub start_date: NaiveDate,
    pub holidays: HolidayCalendar,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        monthly_rate: Rate,
        term_months: Decimal,
        frequency: PaymentFrequency,
        start_date: NaiveDate,
        holidays: HolidayCalendar,
    ) -> Self {
        Self {
            principal,
            monthly_rate,
            term_months,
            frequency,
            start_date,
            holidays,
        }
    }

    /// same as [LoanTerms::new] but parsing the start date from `YYYY-MM-DD`
    pub fn with_start_str(
        principal: Money,
        monthly_rate: Rate,
        term_months: Decimal,
        frequency: PaymentFrequency,
        start_date: &str,
        holidays: HolidayCalendar,
    ) -> Result<Self> {
        let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").map_err(|_| {
            CreditError::InvalidStartDate {
                value: start_date.to_string(),
            }
        })?;
        Ok(Self::new(
            principal,
            monthly_rate,
            term_months,
            frequency,
            start,
            holidays,
        ))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(CreditError::InvalidPrincipal {
                amount: self.principal,
            });
        }
        if self.monthly_rate.is_negative() {
            return Err(CreditError::InvalidInterestRate {
                rate: self.monthly_rate,
            });
        }
        if self.term_months <= Decimal::ZERO {
            return Err(CreditError::InvalidTerm {
                term_months: self.term_months,
            });
        }
        Ok(())
    }
}

/// one scheduled payment obligation within a credit's fixed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based, contiguous
    pub number: u32,
    /// always a valid collection day for the schedule's frequency
    pub due_date: NaiveDate,
    pub amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// balance remaining after this installment, floored at zero
    pub balance: Money,
}

/// materialized flat-rate amortization plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: Decimal,
    pub frequency: PaymentFrequency,
    pub start_date: NaiveDate,
    pub number_of_installments: u32,
    pub total_interest: Money,
    pub total_payment: Money,
    pub periodic_payment: Money,
    pub installments: Vec<Installment>,
}

impl Schedule {
    /// total obligation of the credit (principal + flat interest)
    pub fn total_amount(&self) -> Money {
        self.total_payment
    }

    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }

    pub fn installment_due_on(&self, date: NaiveDate) -> Option<&Installment> {
        self.installments.iter().find(|i| i.due_date == date)
    }
}
