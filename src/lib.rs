pub mod calendar;
pub mod credit;
pub mod decimal;
pub mod errors;
pub mod schedule;
pub mod status;
pub mod types;

// re-export key types
pub use calendar::{
    BusinessClock, BusinessDayAdjuster, HolidayCalendar, BUSINESS_UTC_OFFSET_HOURS,
    MAX_ADJUSTMENT_STEPS,
};
pub use credit::{Credit, RegisteredPayment};
pub use decimal::{Money, Rate, BALANCE_EPSILON};
pub use errors::{CreditError, Result};
pub use schedule::{Installment, LoanTerms, Schedule, ScheduleGenerator};
pub use status::{
    CreditStatusSnapshot, FullStatement, InstallmentStanding, PaymentLine, StatementBuilder,
    StatementLine, StatementTotals, StatusEngine,
};
pub use types::{
    CreditId, CreditState, PaymentFrequency, PaymentId, PaymentStatus, RiskCategory,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
