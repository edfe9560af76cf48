/// quick start - generate a schedule and check a credit's status
use chrono::NaiveDate;
use microcredit_core::{
    BusinessClock, Credit, HolidayCalendar, LoanTerms, Money, PaymentFrequency, Rate,
    ScheduleGenerator, StatusEngine,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // C$1,000 at 5% per month over 1 month, collected weekly
    let terms = LoanTerms::new(
        Money::from_major(1_000),
        Rate::from_percentage(5),
        dec!(1),
        PaymentFrequency::Weekly,
        NaiveDate::from_ymd_opt(2024, 6, 3).ok_or("bad date")?,
        HolidayCalendar::new(),
    );

    let schedule = ScheduleGenerator::generate(&terms)?;
    println!(
        "{} installments of {} (total {})",
        schedule.number_of_installments, schedule.periodic_payment, schedule.total_payment
    );
    for inst in &schedule.installments {
        println!("  #{} due {} balance {}", inst.number, inst.due_date, inst.balance);
    }

    // register a payment and look at the live aging figures
    let mut credit = Credit::new(schedule);
    credit.register_payment(Money::from_major(300), "2024-06-10T15:00:00Z".parse()?)?;

    let engine = StatusEngine::new(BusinessClock::frozen("2024-06-18T15:00:00Z".parse()?));
    let snapshot = engine.snapshot(&credit);
    println!(
        "as of {}: balance {} overdue {} due today {} risk {:?}",
        snapshot.as_of,
        snapshot.remaining_balance,
        snapshot.overdue_amount,
        snapshot.due_today_amount,
        snapshot.risk_category,
    );

    Ok(())
}
