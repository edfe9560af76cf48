use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::BusinessClock;
use crate::decimal::Money;
use crate::errors::{CreditError, Result};
use crate::schedule::Schedule;
use crate::types::{CreditId, CreditState, PaymentId, PaymentStatus};

/// an actual cash receipt applied against a credit's balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredPayment {
    pub id: PaymentId,
    pub received_at: DateTime<Utc>,
    pub amount: Money,
    pub status: PaymentStatus,
}

/// a disbursed credit: the materialized plan plus its payment history.
///
/// state derivation is the only mutation here; status and statement figures
/// are always recomputed from scratch by the engines in [crate::status].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: CreditId,
    pub state: CreditState,
    pub schedule: Schedule,
    pub payments: Vec<RegisteredPayment>,
}

impl Credit {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: CreditState::Active,
            schedule,
            payments: Vec::new(),
        }
    }

    pub fn with_state(schedule: Schedule, state: CreditState) -> Self {
        Self {
            state,
            ..Self::new(schedule)
        }
    }

    /// total obligation (principal + flat interest)
    pub fn total_amount(&self) -> Money {
        self.schedule.total_amount()
    }

    /// payments that count toward the balance (everything not yet voided),
    /// sorted by receipt time; equal timestamps keep insertion order
    pub fn counted_payments(&self) -> Vec<&RegisteredPayment> {
        let mut payments: Vec<&RegisteredPayment> = self
            .payments
            .iter()
            .filter(|p| p.status.counts_toward_balance())
            .collect();
        payments.sort_by_key(|p| p.received_at);
        payments
    }

    pub fn total_paid(&self) -> Money {
        self.counted_payments()
            .iter()
            .fold(Money::ZERO, |acc, p| acc + p.amount)
    }

    /// balance still owed, clamped at zero
    pub fn remaining_balance(&self) -> Money {
        (self.total_amount() - self.total_paid()).max(Money::ZERO)
    }

    /// business-zone date of the most recent counted payment
    pub fn last_payment_date(&self, clock: &BusinessClock) -> Option<NaiveDate> {
        self.counted_payments()
            .last()
            .map(|p| clock.business_date(p.received_at))
    }

    /// register a cash receipt; flips the credit to Paid when the balance
    /// clears within tolerance
    pub fn register_payment(&mut self, amount: Money, received_at: DateTime<Utc>) -> Result<PaymentId> {
        if !amount.is_positive() {
            return Err(CreditError::InvalidPaymentAmount { amount });
        }
        let id = Uuid::new_v4();
        self.payments.push(RegisteredPayment {
            id,
            received_at,
            amount,
            status: PaymentStatus::Valid,
        });
        self.refresh_state();
        Ok(id)
    }

    /// field agent requests a void: Valid -> VoidPending. the payment keeps
    /// counting toward the balance until the void is approved.
    pub fn request_void(&mut self, id: PaymentId) -> Result<()> {
        self.transition_payment(id, PaymentStatus::Valid, PaymentStatus::VoidPending)
    }

    /// supervisor approves the void: VoidPending -> Void. a credit that had
    /// been completed by this payment reverts to Active.
    pub fn approve_void(&mut self, id: PaymentId) -> Result<()> {
        self.transition_payment(id, PaymentStatus::VoidPending, PaymentStatus::Void)?;
        self.refresh_state();
        Ok(())
    }

    /// supervisor rejects the void: VoidPending -> Valid
    pub fn reject_void(&mut self, id: PaymentId) -> Result<()> {
        self.transition_payment(id, PaymentStatus::VoidPending, PaymentStatus::Valid)
    }

    fn transition_payment(
        &mut self,
        id: PaymentId,
        expected: PaymentStatus,
        next: PaymentStatus,
    ) -> Result<()> {
        let payment = self
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CreditError::PaymentNotFound { id })?;

        if payment.status != expected {
            return Err(CreditError::InvalidVoidTransition {
                id,
                status: payment.status,
            });
        }
        payment.status = next;
        Ok(())
    }

    /// re-derive Active/Paid from the balance. other lifecycle states
    /// (Pending, Rejected, Cancelled) are managed by the surrounding system
    /// and never touched here.
    fn refresh_state(&mut self) {
        match self.state {
            CreditState::Active if self.remaining_balance().approx_zero() => {
                self.state = CreditState::Paid;
            }
            CreditState::Paid if !self.remaining_balance().approx_zero() => {
                self.state = CreditState::Active;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidayCalendar;
    use crate::decimal::Rate;
    use crate::schedule::{LoanTerms, ScheduleGenerator};
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn weekly_credit() -> Credit {
        let terms = LoanTerms::new(
            Money::from_major(1000),
            Rate::from_percentage(5),
            dec!(1),
            PaymentFrequency::Weekly,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            HolidayCalendar::new(),
        );
        Credit::new(ScheduleGenerator::generate(&terms).unwrap())
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_full_payment_marks_credit_paid() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_major(1050), ts("2024-06-10T15:00:00Z"))
            .unwrap();
        assert_eq!(credit.state, CreditState::Paid);
        assert_eq!(credit.remaining_balance(), Money::ZERO);
    }

    #[test]
    fn test_void_approval_unpays_credit() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_decimal(dec!(787.50)), ts("2024-06-10T15:00:00Z"))
            .unwrap();
        let last = credit
            .register_payment(Money::from_decimal(dec!(262.50)), ts("2024-07-01T15:00:00Z"))
            .unwrap();
        assert_eq!(credit.state, CreditState::Paid);

        credit.request_void(last).unwrap();
        // pending voids still count
        assert_eq!(credit.remaining_balance(), Money::ZERO);

        credit.approve_void(last).unwrap();
        assert_eq!(credit.state, CreditState::Active);
        assert_eq!(credit.remaining_balance(), Money::from_decimal(dec!(262.50)));
    }

    #[test]
    fn test_void_rejection_restores_valid() {
        let mut credit = weekly_credit();
        let id = credit
            .register_payment(Money::from_major(100), ts("2024-06-10T15:00:00Z"))
            .unwrap();
        credit.request_void(id).unwrap();
        credit.reject_void(id).unwrap();
        assert_eq!(credit.payments[0].status, PaymentStatus::Valid);
        assert_eq!(credit.total_paid(), Money::from_major(100));
    }

    #[test]
    fn test_void_transitions_are_guarded() {
        let mut credit = weekly_credit();
        let id = credit
            .register_payment(Money::from_major(100), ts("2024-06-10T15:00:00Z"))
            .unwrap();

        // approving without a pending request is rejected
        assert!(matches!(
            credit.approve_void(id),
            Err(CreditError::InvalidVoidTransition { .. })
        ));
        assert!(matches!(
            credit.request_void(Uuid::new_v4()),
            Err(CreditError::PaymentNotFound { .. })
        ));

        credit.request_void(id).unwrap();
        assert!(matches!(
            credit.request_void(id),
            Err(CreditError::InvalidVoidTransition { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_payment() {
        let mut credit = weekly_credit();
        assert!(matches!(
            credit.register_payment(Money::ZERO, ts("2024-06-10T15:00:00Z")),
            Err(CreditError::InvalidPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_counted_payments_sorted_by_receipt_time() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_major(20), ts("2024-06-17T15:00:00Z"))
            .unwrap();
        credit
            .register_payment(Money::from_major(10), ts("2024-06-10T15:00:00Z"))
            .unwrap();
        let amounts: Vec<_> = credit.counted_payments().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![Money::from_major(10), Money::from_major(20)]);
    }

    #[test]
    fn test_overpayment_balance_clamped() {
        let mut credit = weekly_credit();
        credit
            .register_payment(Money::from_major(2000), ts("2024-06-10T15:00:00Z"))
            .unwrap();
        assert_eq!(credit.remaining_balance(), Money::ZERO);
    }
}
