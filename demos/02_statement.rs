/// full statement - per-installment standings and per-payment splits,
/// printed and dumped as JSON
use chrono::NaiveDate;
use microcredit_core::{
    BusinessClock, Credit, HolidayCalendar, LoanTerms, Money, PaymentFrequency, Rate,
    ScheduleGenerator, StatementBuilder,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terms = LoanTerms::new(
        Money::from_major(1_000),
        Rate::from_percentage(5),
        dec!(1),
        PaymentFrequency::Weekly,
        NaiveDate::from_ymd_opt(2024, 6, 3).ok_or("bad date")?,
        HolidayCalendar::new(),
    );
    let mut credit = Credit::new(ScheduleGenerator::generate(&terms)?);

    // one on-time payment, one late, then a void
    credit.register_payment(Money::from_decimal(dec!(262.50)), "2024-06-10T16:00:00Z".parse()?)?;
    credit.register_payment(Money::from_decimal(dec!(262.50)), "2024-06-19T16:00:00Z".parse()?)?;
    let voided = credit.register_payment(Money::from_major(100), "2024-06-20T16:00:00Z".parse()?)?;
    credit.request_void(voided)?;
    credit.approve_void(voided)?;

    let builder = StatementBuilder::new(BusinessClock::frozen("2024-06-26T16:00:00Z".parse()?));
    let statement = builder.statement(&credit);

    for line in &statement.lines {
        println!(
            "#{} due {}  {:?}  late {}d",
            line.number, line.due_date, line.standing, line.late_days
        );
    }
    for payment in &statement.payments {
        println!(
            "paid {} on {} (principal {} / interest {})",
            payment.amount, payment.date, payment.principal_component, payment.interest_component
        );
    }

    println!("{}", serde_json::to_string_pretty(&statement)?);

    Ok(())
}
