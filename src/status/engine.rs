use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessClock;
use crate::credit::Credit;
use crate::decimal::{Money, BALANCE_EPSILON};
use crate::types::{CreditState, RiskCategory};

/// live aging figures for one credit, derived on every read.
///
/// never persisted or cached; always recomputed from the schedule and the
/// payment history so it cannot drift from the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditStatusSnapshot {
    pub as_of: NaiveDate,
    pub remaining_balance: Money,
    /// sum of unpaid obligations due strictly before `as_of`
    pub overdue_amount: Money,
    /// today's installment net of surplus carried from past overpayment
    pub due_today_amount: Money,
    /// whole days since the earliest installment not yet covered by
    /// cumulative payments; zero when nothing is overdue
    pub late_days: i64,
    pub paid_today: Money,
    pub is_expired: bool,
    pub is_due_today: bool,
    pub risk_category: RiskCategory,
    pub last_payment_date: Option<NaiveDate>,
}

impl CreditStatusSnapshot {
    fn zero(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            remaining_balance: Money::ZERO,
            overdue_amount: Money::ZERO,
            due_today_amount: Money::ZERO,
            late_days: 0,
            paid_today: Money::ZERO,
            is_expired: false,
            is_due_today: false,
            risk_category: RiskCategory::A,
            last_payment_date: None,
        }
    }
}

/// computes [CreditStatusSnapshot]s against an injected business clock.
///
/// pure with respect to its inputs; concurrent calls never interact. data
/// inconsistencies (a void exceeding the balance, negative intermediate
/// amounts) are clamped to zero rather than raised, since this runs on every
/// page render.
pub struct StatusEngine {
    clock: BusinessClock,
}

impl StatusEngine {
    pub fn new(clock: BusinessClock) -> Self {
        Self { clock }
    }

    /// snapshot as of the business clock's current date
    pub fn snapshot(&self, credit: &Credit) -> CreditStatusSnapshot {
        self.snapshot_as_of(credit, self.clock.today())
    }

    pub fn snapshot_as_of(&self, credit: &Credit, as_of: NaiveDate) -> CreditStatusSnapshot {
        match credit.state {
            CreditState::Pending | CreditState::Rejected | CreditState::Cancelled => {
                CreditStatusSnapshot::zero(as_of)
            }
            CreditState::Paid => CreditStatusSnapshot {
                last_payment_date: credit.last_payment_date(&self.clock),
                ..CreditStatusSnapshot::zero(as_of)
            },
            CreditState::Active => self.active_snapshot(credit, as_of),
        }
    }

    fn active_snapshot(&self, credit: &Credit, as_of: NaiveDate) -> CreditStatusSnapshot {
        let total_amount = credit.total_amount();
        let payments = credit.counted_payments();
        let total_paid = credit.total_paid();
        let remaining_balance = (total_amount - total_paid).max(Money::ZERO);

        let last_payment_date = credit.last_payment_date(&self.clock);
        let paid_today = payments
            .iter()
            .filter(|p| self.clock.business_date(p.received_at) == as_of)
            .fold(Money::ZERO, |acc, p| acc + p.amount);
        let is_due_today = credit.schedule.installment_due_on(as_of).is_some();
        let is_expired = credit
            .schedule
            .final_due_date()
            .map(|final_due| as_of > final_due)
            .unwrap_or(false);

        if remaining_balance < BALANCE_EPSILON {
            // fully paid within tolerance, regardless of recorded state
            return CreditStatusSnapshot {
                paid_today,
                is_due_today,
                is_expired,
                last_payment_date,
                ..CreditStatusSnapshot::zero(as_of)
            };
        }

        let amount_due_before = credit
            .schedule
            .installments
            .iter()
            .filter(|i| i.due_date < as_of)
            .fold(Money::ZERO, |acc, i| acc + i.amount);
        let paid_before = payments
            .iter()
            .filter(|p| self.clock.business_date(p.received_at) < as_of)
            .fold(Money::ZERO, |acc, p| acc + p.amount);

        let surplus = (paid_before - amount_due_before).max(Money::ZERO);
        let overdue_amount = (amount_due_before - paid_before).max(Money::ZERO);

        // surplus from past overpayment silently covers today's installment
        // before anything is reported as due
        let due_today_amount = credit
            .schedule
            .installment_due_on(as_of)
            .map(|i| (i.amount - surplus).max(Money::ZERO))
            .unwrap_or(Money::ZERO);

        let late_days = if overdue_amount > BALANCE_EPSILON {
            self.late_days(credit, total_paid, as_of)
        } else {
            0
        };

        CreditStatusSnapshot {
            as_of,
            remaining_balance,
            overdue_amount,
            due_today_amount,
            late_days,
            paid_today,
            is_expired,
            is_due_today,
            risk_category: RiskCategory::from_late_days(late_days),
            last_payment_date,
        }
    }

    /// days since the first installment whose cumulative due amount exceeds
    /// everything paid so far
    fn late_days(&self, credit: &Credit, total_paid: Money, as_of: NaiveDate) -> i64 {
        let mut cumulative_due = Money::ZERO;
        for installment in &credit.schedule.installments {
            cumulative_due += installment.amount;
            if cumulative_due > total_paid + BALANCE_EPSILON {
                return (as_of - installment.due_date).num_days().max(0);
            }
        }
        0
    }
}
