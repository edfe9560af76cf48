/// aging walkthrough - how a credit with no payments slides through the
/// A-E provision categories as the as-of date advances
use chrono::{Duration, NaiveDate};
use microcredit_core::{
    BusinessClock, Credit, HolidayCalendar, LoanTerms, Money, PaymentFrequency, Rate,
    ScheduleGenerator, StatusEngine,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terms = LoanTerms::new(
        Money::from_major(5_000),
        Rate::from_percentage(4),
        dec!(2),
        PaymentFrequency::Biweekly,
        NaiveDate::from_ymd_opt(2024, 6, 3).ok_or("bad date")?,
        HolidayCalendar::new(),
    );
    let credit = Credit::new(ScheduleGenerator::generate(&terms)?);
    let engine = StatusEngine::new(BusinessClock::frozen("2024-06-03T12:00:00Z".parse()?));

    let first_due = credit.schedule.installments[0].due_date;
    for weeks in [0i64, 2, 4, 8, 12, 16] {
        let as_of = first_due + Duration::weeks(weeks);
        let snap = engine.snapshot_as_of(&credit, as_of);
        println!(
            "{}  late {:>3}d  overdue {:>9}  category {:?}  expired {}",
            as_of, snap.late_days, snap.overdue_amount, snap.risk_category, snap.is_expired
        );
    }

    Ok(())
}
