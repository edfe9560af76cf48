pub mod engine;
pub mod statement;

pub use engine::{CreditStatusSnapshot, StatusEngine};
pub use statement::{
    FullStatement, InstallmentStanding, PaymentLine, StatementBuilder, StatementLine,
    StatementTotals,
};
