use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::calendar::{BusinessDayAdjuster, HolidayCalendar};
use crate::decimal::Money;
use crate::errors::{CreditError, Result};
use crate::types::PaymentFrequency;

use super::{Installment, LoanTerms, Schedule};

/// builds the fixed flat-rate amortization plan for a credit.
///
/// pure function of the terms: regenerating from identical terms yields an
/// identical schedule, and no partial schedule is ever returned.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    pub fn generate(terms: &LoanTerms) -> Result<Schedule> {
        terms.validate()?;

        let periods_per_month = terms.frequency.periods_per_month();
        let count = (terms.term_months * Decimal::from(periods_per_month)).round();
        let number_of_installments = count.to_u32().unwrap_or(0);
        if number_of_installments == 0 {
            return Err(CreditError::ZeroInstallments {
                term_months: terms.term_months,
                periods_per_month,
            });
        }
        let n = Decimal::from(number_of_installments);

        // flat interest over the full declared term, never recalculated
        // against the shorter effective schedule length
        let total_interest = Money::from_decimal(
            terms.principal.as_decimal() * terms.monthly_rate.as_decimal() * terms.term_months,
        );
        let total_payment = terms.principal + total_interest;
        let periodic_payment = total_payment / n;
        let principal_portion = terms.principal / n;
        let interest_portion = total_interest / n;

        let due_dates = place_dates(terms, number_of_installments)?;

        let installments = due_dates
            .into_iter()
            .enumerate()
            .map(|(idx, due_date)| {
                let number = idx as u32 + 1;
                // unfloored arithmetic series; only the stored balance is floored
                let balance = total_payment - periodic_payment * Decimal::from(number);
                Installment {
                    number,
                    due_date,
                    amount: periodic_payment,
                    principal_portion,
                    interest_portion,
                    balance: balance.max(Money::ZERO),
                }
            })
            .collect();

        Ok(Schedule {
            principal: terms.principal,
            monthly_rate: terms.monthly_rate,
            term_months: terms.term_months,
            frequency: terms.frequency,
            start_date: terms.start_date,
            number_of_installments,
            total_interest,
            total_payment,
            periodic_payment,
            installments,
        })
    }
}

fn place_dates(terms: &LoanTerms, count: u32) -> Result<Vec<NaiveDate>> {
    match terms.frequency {
        PaymentFrequency::Daily => place_daily(terms.start_date, count, &terms.holidays),
        PaymentFrequency::Weekly | PaymentFrequency::Biweekly => place_stepped(
            terms.start_date,
            count,
            terms.frequency,
            &terms.holidays,
        ),
        PaymentFrequency::SemiMonthly => {
            place_semi_monthly(terms.start_date, count, &terms.holidays)
        }
    }
}

/// daily placement: each theoretical date is the previous adjusted date plus
/// one day. days inserted by the adjuster beyond that +1 accumulate as
/// extension days, and the final installment is pushed forward by that many
/// extra adjusted steps, so the maturity date slides past skipped weekends
/// and holidays while the count of paying days stays fixed.
fn place_daily(start: NaiveDate, count: u32, holidays: &HolidayCalendar) -> Result<Vec<NaiveDate>> {
    let (mut dates, extension_days, _) = (0..count).try_fold(
        (Vec::with_capacity(count as usize), 0i64, start),
        |(mut dates, extension, prev), _| {
            let theoretical = prev + Duration::days(1);
            let adjusted =
                BusinessDayAdjuster::adjust(theoretical, PaymentFrequency::Daily, holidays)?;
            let extension = extension + (adjusted - theoretical).num_days();
            dates.push(adjusted);
            Ok::<_, CreditError>((dates, extension, adjusted))
        },
    )?;

    if extension_days > 0 {
        if let Some(last) = dates.last_mut() {
            let mut date = *last;
            for _ in 0..extension_days {
                date = BusinessDayAdjuster::adjust(
                    date + Duration::days(1),
                    PaymentFrequency::Daily,
                    holidays,
                )?;
            }
            *last = date;
        }
    }

    Ok(dates)
}

/// weekly/biweekly placement: the theoretical cursor advances by the fixed
/// step from the unadjusted date; each emitted date is adjusted independently
/// so a single holiday does not shift the whole remaining schedule.
fn place_stepped(
    start: NaiveDate,
    count: u32,
    frequency: PaymentFrequency,
    holidays: &HolidayCalendar,
) -> Result<Vec<NaiveDate>> {
    let step = frequency.step_days().unwrap_or(7);
    let mut dates = Vec::with_capacity(count as usize);
    let mut theoretical = start;
    for _ in 0..count {
        theoretical += Duration::days(step);
        dates.push(BusinessDayAdjuster::adjust(theoretical, frequency, holidays)?);
    }
    Ok(dates)
}

/// semi-monthly placement, anchored to the start date's day-of-month.
///
/// start day d <= 15 anchors on (d, d+15): first installment on the high
/// anchor in the start month. start day d > 15 anchors on (d-15, d): first
/// installment on the low anchor one month ahead. anchor days past the end
/// of a target month clamp to its last day.
fn place_semi_monthly(
    start: NaiveDate,
    count: u32,
    holidays: &HolidayCalendar,
) -> Result<Vec<NaiveDate>> {
    let start_day = start.day();
    let (low, high) = if start_day > 15 {
        (start_day - 15, start_day)
    } else {
        (start_day, start_day + 15)
    };

    let mut dates = Vec::with_capacity(count as usize);
    for i in 1..=count {
        let (months_ahead, day) = if start_day > 15 {
            ((i + 1) / 2, if i % 2 == 1 { low } else { high })
        } else {
            (i / 2, if i % 2 == 1 { high } else { low })
        };
        let theoretical = anchored_date(start, months_ahead, day)?;
        dates.push(BusinessDayAdjuster::adjust(
            theoretical,
            PaymentFrequency::SemiMonthly,
            holidays,
        )?);
    }
    Ok(dates)
}

/// day-of-month in the month `months_ahead` after `start`, clamped to the
/// target month's length
fn anchored_date(start: NaiveDate, months_ahead: u32, day: u32) -> Result<NaiveDate> {
    let zero_based = start.month0() + months_ahead;
    let year = start.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let clamped = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped).ok_or_else(|| CreditError::InvalidDate {
        message: format!("{year}-{month:02}-{clamped:02}"),
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
