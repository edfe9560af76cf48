use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessClock;
use crate::credit::Credit;
use crate::decimal::{Money, BALANCE_EPSILON};
use crate::types::{PaymentId, PaymentStatus};

/// standing of one installment after reconciling the payment stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStanding {
    /// fully covered by cumulative payments
    Paid,
    /// unpaid and past due
    Late,
    /// unpaid, not yet due
    Pending,
}

/// per-installment detail line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub standing: InstallmentStanding,
    /// for Paid: clearing-payment date vs due date; for Late: as-of vs due
    pub late_days: i64,
    /// business-zone date of the payment that first cleared this installment
    pub cleared_on: Option<NaiveDate>,
}

/// per-payment detail line, with the receipt split into principal and
/// interest by the credit's overall principal:interest ratio (a deliberate
/// simplification, not amortization-true per installment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub id: PaymentId,
    pub date: NaiveDate,
    pub amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// running total of counted payments up to and including this one
    pub cumulative: Money,
    pub status: PaymentStatus,
}

/// aggregate totals for the statement footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub total_amount: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
    pub paid_count: u32,
    pub late_count: u32,
    pub pending_count: u32,
    pub max_late_days: i64,
}

/// full per-installment and per-payment breakdown of a credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullStatement {
    pub as_of: NaiveDate,
    pub lines: Vec<StatementLine>,
    pub payments: Vec<PaymentLine>,
    pub totals: StatementTotals,
}

/// builds [FullStatement]s for detailed statements and delay analytics.
///
/// reuses the same cumulative-consumption reconciliation as the status
/// engine, but at per-installment granularity.
pub struct StatementBuilder {
    clock: BusinessClock,
}

impl StatementBuilder {
    pub fn new(clock: BusinessClock) -> Self {
        Self { clock }
    }

    pub fn statement(&self, credit: &Credit) -> FullStatement {
        self.statement_as_of(credit, self.clock.today())
    }

    pub fn statement_as_of(&self, credit: &Credit, as_of: NaiveDate) -> FullStatement {
        let total_amount = credit.total_amount();
        let principal_ratio = if total_amount.is_zero() {
            Decimal::ZERO
        } else {
            credit.schedule.principal.as_decimal() / total_amount.as_decimal()
        };

        let mut payments = Vec::new();
        let mut cumulative = Money::ZERO;
        for payment in credit.counted_payments() {
            cumulative += payment.amount;
            let principal_component = payment.amount * principal_ratio;
            payments.push(PaymentLine {
                id: payment.id,
                date: self.clock.business_date(payment.received_at),
                amount: payment.amount,
                principal_component,
                interest_component: payment.amount - principal_component,
                cumulative,
                status: payment.status,
            });
        }

        let lines = self.reconcile_installments(credit, &payments, as_of);

        let totals = StatementTotals {
            total_amount,
            total_paid: cumulative,
            remaining_balance: (total_amount - cumulative).max(Money::ZERO),
            paid_count: count_standing(&lines, InstallmentStanding::Paid),
            late_count: count_standing(&lines, InstallmentStanding::Late),
            pending_count: count_standing(&lines, InstallmentStanding::Pending),
            max_late_days: lines.iter().map(|l| l.late_days).max().unwrap_or(0),
        };

        FullStatement {
            as_of,
            lines,
            payments,
            totals,
        }
    }

    /// walk installments in order, consuming the cumulative payment stream;
    /// an installment is cleared by the first payment whose running total
    /// covers the cumulative due amount
    fn reconcile_installments(
        &self,
        credit: &Credit,
        payments: &[PaymentLine],
        as_of: NaiveDate,
    ) -> Vec<StatementLine> {
        let mut cumulative_due = Money::ZERO;
        credit
            .schedule
            .installments
            .iter()
            .map(|installment| {
                cumulative_due += installment.amount;
                let clearing = payments
                    .iter()
                    .find(|p| p.cumulative + BALANCE_EPSILON > cumulative_due);

                let (standing, late_days, cleared_on) = match clearing {
                    Some(payment) => (
                        InstallmentStanding::Paid,
                        (payment.date - installment.due_date).num_days().max(0),
                        Some(payment.date),
                    ),
                    None if installment.due_date < as_of => (
                        InstallmentStanding::Late,
                        (as_of - installment.due_date).num_days(),
                        None,
                    ),
                    None => (InstallmentStanding::Pending, 0, None),
                };

                StatementLine {
                    number: installment.number,
                    due_date: installment.due_date,
                    amount: installment.amount,
                    standing,
                    late_days,
                    cleared_on,
                }
            })
            .collect()
    }
}

fn count_standing(lines: &[StatementLine], standing: InstallmentStanding) -> u32 {
    lines.iter().filter(|l| l.standing == standing).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidayCalendar;
    use crate::decimal::Rate;
    use crate::schedule::{LoanTerms, ScheduleGenerator};
    use crate::status::StatusEngine;
    use crate::types::PaymentFrequency;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// 1000 at 5%/month over 1 month, weekly: 262.50 due on Jun 10, 17, 24
    /// and Jul 1 2024
    fn weekly_credit() -> Credit {
        let terms = LoanTerms::new(
            Money::from_major(1000),
            Rate::from_percentage(5),
            dec!(1),
            PaymentFrequency::Weekly,
            d(2024, 6, 3),
            HolidayCalendar::new(),
        );
        Credit::new(ScheduleGenerator::generate(&terms).unwrap())
    }

    fn builder() -> StatementBuilder {
        StatementBuilder::new(BusinessClock::frozen(ts("2024-06-25T18:00:00Z")))
    }

    #[test]
    fn test_standings_and_late_days() {
        let mut credit = weekly_credit();
        // installment 1 cleared one day late, installment 2 on time
        credit
            .register_payment(Money::from_decimal(dec!(262.50)), ts("2024-06-11T18:00:00Z"))
            .unwrap();
        credit
            .register_payment(Money::from_decimal(dec!(262.50)), ts("2024-06-17T18:00:00Z"))
            .unwrap();

        let statement = builder().statement_as_of(&credit, d(2024, 6, 25));

        assert_eq!(statement.lines[0].standing, InstallmentStanding::Paid);
        assert_eq!(statement.lines[0].late_days, 1);
        assert_eq!(statement.lines[0].cleared_on, Some(d(2024, 6, 11)));

        assert_eq!(statement.lines[1].standing, InstallmentStanding::Paid);
        assert_eq!(statement.lines[1].late_days, 0);

        assert_eq!(statement.lines[2].standing, InstallmentStanding::Late);
        assert_eq!(statement.lines[2].late_days, 1); // due Jun 24, as-of Jun 25
        assert_eq!(statement.lines[2].cleared_on, None);

        assert_eq!(statement.lines[3].standing, InstallmentStanding::Pending);
        assert_eq!(statement.lines[3].late_days, 0);

        assert_eq!(statement.totals.paid_count, 2);
        assert_eq!(statement.totals.late_count, 1);
        assert_eq!(statement.totals.pending_count, 1);
        assert_eq!(statement.totals.max_late_days, 1);
        assert_eq!(
            statement.totals.remaining_balance,
            Money::from_decimal(dec!(525.00))
        );
    }

    #[test]
    fn test_payment_split_follows_overall_ratio() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_decimal(dec!(262.50)), ts("2024-06-10T18:00:00Z"))
            .unwrap();

        let statement = builder().statement_as_of(&credit, d(2024, 6, 10));
        let line = &statement.payments[0];
        // ratio 1000:50 over a 1050 total
        assert_eq!(line.principal_component, Money::from_decimal(dec!(250.00)));
        assert_eq!(line.interest_component, Money::from_decimal(dec!(12.50)));
        assert_eq!(line.cumulative, Money::from_decimal(dec!(262.50)));
    }

    #[test]
    fn test_one_large_payment_clears_several_installments() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_major(800), ts("2024-06-12T18:00:00Z"))
            .unwrap();

        let statement = builder().statement_as_of(&credit, d(2024, 6, 25));
        // 800 covers installments 1-3 (cumulative 787.50), all cleared by the
        // same Jun 12 payment
        for line in &statement.lines[..3] {
            assert_eq!(line.standing, InstallmentStanding::Paid, "{}", line.number);
            assert_eq!(line.cleared_on, Some(d(2024, 6, 12)));
        }
        assert_eq!(statement.lines[0].late_days, 2); // due Jun 10, cleared Jun 12
        assert_eq!(statement.lines[1].late_days, 0); // due Jun 17, cleared early
        assert_eq!(statement.lines[3].standing, InstallmentStanding::Pending);
    }

    #[test]
    fn test_voided_payments_are_excluded() {
        let mut credit = weekly_credit();
        let id = credit
            .register_payment(Money::from_decimal(dec!(262.50)), ts("2024-06-10T18:00:00Z"))
            .unwrap();
        credit.request_void(id).unwrap();
        credit.approve_void(id).unwrap();

        let statement = builder().statement_as_of(&credit, d(2024, 6, 25));
        assert!(statement.payments.is_empty());
        assert_eq!(statement.lines[0].standing, InstallmentStanding::Late);
        assert_eq!(statement.totals.total_paid, Money::ZERO);
    }

    #[test]
    fn test_late_line_implies_overdue_snapshot() {
        let credit = weekly_credit();
        let as_of = d(2024, 6, 25);
        let statement = builder().statement_as_of(&credit, as_of);
        assert!(statement
            .lines
            .iter()
            .any(|l| l.standing == InstallmentStanding::Late));

        let engine = StatusEngine::new(BusinessClock::frozen(ts("2024-06-25T18:00:00Z")));
        let snap = engine.snapshot_as_of(&credit, as_of);
        assert!(snap.overdue_amount > Money::ZERO);
    }

    #[test]
    fn test_statement_serializes_to_json() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_major(300), ts("2024-06-10T18:00:00Z"))
            .unwrap();
        let statement = builder().statement_as_of(&credit, d(2024, 6, 25));
        let json = serde_json::to_string(&statement).unwrap();
        let back: FullStatement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, statement);
    }
}
