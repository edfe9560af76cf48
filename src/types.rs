use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a credit
pub type CreditId = Uuid;

/// unique identifier for a registered payment
pub type PaymentId = Uuid;

/// payment frequency with its per-frequency rule table.
///
/// all frequency-dependent behavior (installments per month, which weekend
/// days are payable, how calendar steps advance) lives here so the rules can
/// be audited in one place instead of scattered string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentFrequency {
    /// one installment per banking day, 20 per month
    Daily,
    /// every 7 calendar days
    Weekly,
    /// every 14 calendar days
    Biweekly,
    /// twice a month on two anchor days of the month
    SemiMonthly,
}

impl PaymentFrequency {
    /// installments counted per declared month of term
    pub fn periods_per_month(&self) -> u32 {
        match self {
            PaymentFrequency::Daily => 20,
            PaymentFrequency::Weekly => 4,
            PaymentFrequency::Biweekly => 2,
            PaymentFrequency::SemiMonthly => 2,
        }
    }

    /// whether Saturday is a valid collection day for this frequency.
    ///
    /// note: a Friday holiday still displaces Weekly/Biweekly/SemiMonthly
    /// installments onto Saturday even when this returns false for Biweekly;
    /// see [crate::calendar::BusinessDayAdjuster].
    pub fn allows_saturday(&self) -> bool {
        match self {
            PaymentFrequency::Daily => false,
            PaymentFrequency::Weekly => true,
            PaymentFrequency::Biweekly => false,
            PaymentFrequency::SemiMonthly => true,
        }
    }

    /// calendar-day step between theoretical installment dates.
    ///
    /// `None` for SemiMonthly, which is anchored to days of the month rather
    /// than advanced by a fixed step.
    pub fn step_days(&self) -> Option<i64> {
        match self {
            PaymentFrequency::Daily => Some(1),
            PaymentFrequency::Weekly => Some(7),
            PaymentFrequency::Biweekly => Some(14),
            PaymentFrequency::SemiMonthly => None,
        }
    }
}

/// credit lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditState {
    /// requested, not yet approved or disbursed
    Pending,
    /// disbursed and collecting
    Active,
    /// balance cleared within tolerance
    Paid,
    /// request denied
    Rejected,
    /// cancelled (e.g. deceased client)
    Cancelled,
}

/// registered payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// counts toward the balance
    Valid,
    /// void requested by a field agent, still counts until approved
    VoidPending,
    /// void approved, excluded entirely
    Void,
}

impl PaymentStatus {
    pub fn counts_toward_balance(&self) -> bool {
        !matches!(self, PaymentStatus::Void)
    }
}

/// regulatory provision category, derived solely from days late
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    A,
    B,
    C,
    D,
    E,
}

impl RiskCategory {
    /// fixed day-range bucket table: 0-15 A, 16-30 B, 31-60 C, 61-90 D, >90 E
    pub fn from_late_days(days: i64) -> Self {
        match days {
            d if d <= 15 => RiskCategory::A,
            d if d <= 30 => RiskCategory::B,
            d if d <= 60 => RiskCategory::C,
            d if d <= 90 => RiskCategory::D,
            _ => RiskCategory::E,
        }
    }
}
