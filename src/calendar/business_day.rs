use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::calendar::holidays::HolidayCalendar;
use crate::errors::{CreditError, Result};
use crate::types::PaymentFrequency;

/// iteration cap for the adjustment loop. exceeding it means the holiday
/// calendar is pathological (e.g. months of consecutive holidays) and the
/// caller gets an error instead of a possibly-wrong date.
pub const MAX_ADJUSTMENT_STEPS: u32 = 30;

/// moves a theoretical installment date to the next valid collection day.
///
/// rules, re-applied until none fires:
/// 1. Sunday is never payable; move to Monday.
/// 2. Saturday is payable only for frequencies whose rule table allows it
///    (Weekly, SemiMonthly); Daily and Biweekly move to Monday.
/// 3. holidays: Daily slides one day at a time. other frequencies use
///    Saturday as an overflow slot when the holiday falls on Friday, even
///    for Biweekly whose normal Saturdays are excluded by rule 2. this
///    contradiction is deliberate; historical schedules depend on it.
pub struct BusinessDayAdjuster;

impl BusinessDayAdjuster {
    pub fn adjust(
        date: NaiveDate,
        frequency: PaymentFrequency,
        holidays: &HolidayCalendar,
    ) -> Result<NaiveDate> {
        let start = date;
        let mut date = date;

        for _ in 0..MAX_ADJUSTMENT_STEPS {
            match date.weekday() {
                Weekday::Sun => {
                    date += Duration::days(1);
                    continue;
                }
                Weekday::Sat if !frequency.allows_saturday() => {
                    date += Duration::days(2);
                    continue;
                }
                _ => {}
            }

            if !holidays.contains(&date) {
                return Ok(date);
            }

            if frequency == PaymentFrequency::Daily {
                date += Duration::days(1);
                continue;
            }

            match date.weekday() {
                Weekday::Fri => {
                    // Saturday overflow slot, valid here even for Biweekly
                    date += Duration::days(1);
                    if holidays.contains(&date) {
                        date += Duration::days(2);
                        continue;
                    }
                    return Ok(date);
                }
                Weekday::Sat => {
                    date += Duration::days(2);
                }
                _ => {
                    date += Duration::days(1);
                }
            }
        }

        Err(CreditError::DateAdjustmentNonConvergence {
            date: start,
            cap: MAX_ADJUSTMENT_STEPS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn no_holidays() -> HolidayCalendar {
        HolidayCalendar::new()
    }

    #[test]
    fn test_sunday_moves_to_monday_for_all_frequencies() {
        let sunday = d(2024, 6, 9);
        for freq in [
            PaymentFrequency::Daily,
            PaymentFrequency::Weekly,
            PaymentFrequency::Biweekly,
            PaymentFrequency::SemiMonthly,
        ] {
            let adjusted = BusinessDayAdjuster::adjust(sunday, freq, &no_holidays()).unwrap();
            assert_eq!(adjusted, d(2024, 6, 10), "{freq:?}");
        }
    }

    #[test]
    fn test_saturday_excluded_for_daily_and_biweekly() {
        let saturday = d(2024, 6, 8);
        for freq in [PaymentFrequency::Daily, PaymentFrequency::Biweekly] {
            let adjusted = BusinessDayAdjuster::adjust(saturday, freq, &no_holidays()).unwrap();
            assert_eq!(adjusted, d(2024, 6, 10), "{freq:?}");
        }
    }

    #[test]
    fn test_saturday_kept_for_weekly_and_semimonthly() {
        let saturday = d(2024, 6, 8);
        for freq in [PaymentFrequency::Weekly, PaymentFrequency::SemiMonthly] {
            let adjusted = BusinessDayAdjuster::adjust(saturday, freq, &no_holidays()).unwrap();
            assert_eq!(adjusted, saturday, "{freq:?}");
        }
    }

    #[test]
    fn test_daily_holiday_slides_past_weekend() {
        // Friday holiday: Daily slides to Saturday, which rule 2 pushes to Monday
        let friday = d(2024, 6, 14);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 14)]);
        let adjusted =
            BusinessDayAdjuster::adjust(friday, PaymentFrequency::Daily, &holidays).unwrap();
        assert_eq!(adjusted, d(2024, 6, 17));
    }

    #[test]
    fn test_friday_holiday_overflows_to_saturday() {
        let friday = d(2024, 6, 14);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 14)]);
        let adjusted =
            BusinessDayAdjuster::adjust(friday, PaymentFrequency::Weekly, &holidays).unwrap();
        assert_eq!(adjusted, d(2024, 6, 15));
        assert_eq!(adjusted.weekday(), Weekday::Sat);
    }

    #[test]
    fn test_biweekly_friday_holiday_lands_on_saturday_anyway() {
        // documented quirk: Biweekly normally never pays Saturday, but the
        // Friday-holiday displacement still uses Saturday as the overflow slot
        let friday = d(2024, 6, 14);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 14)]);
        let adjusted =
            BusinessDayAdjuster::adjust(friday, PaymentFrequency::Biweekly, &holidays).unwrap();
        assert_eq!(adjusted, d(2024, 6, 15));
        assert_eq!(adjusted.weekday(), Weekday::Sat);
    }

    #[test]
    fn test_friday_and_saturday_both_holidays_move_to_monday() {
        let friday = d(2024, 6, 14);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 14), (2024, 6, 15)]);
        let adjusted =
            BusinessDayAdjuster::adjust(friday, PaymentFrequency::Biweekly, &holidays).unwrap();
        assert_eq!(adjusted, d(2024, 6, 17));
    }

    #[test]
    fn test_saturday_holiday_moves_to_monday() {
        let saturday = d(2024, 6, 8);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 8)]);
        let adjusted =
            BusinessDayAdjuster::adjust(saturday, PaymentFrequency::Weekly, &holidays).unwrap();
        assert_eq!(adjusted, d(2024, 6, 10));
    }

    #[test]
    fn test_midweek_holiday_moves_one_day() {
        let wednesday = d(2024, 6, 12);
        let holidays = HolidayCalendar::from_ymd([(2024, 6, 12)]);
        let adjusted =
            BusinessDayAdjuster::adjust(wednesday, PaymentFrequency::SemiMonthly, &holidays)
                .unwrap();
        assert_eq!(adjusted, d(2024, 6, 13));
    }

    #[test]
    fn test_pathological_calendar_does_not_loop_forever() {
        // every day for ~3 months is a holiday; the loop must give up
        let start = d(2024, 6, 3);
        let holidays: HolidayCalendar = (0i64..90)
            .map(|i| start + Duration::days(i))
            .collect();
        let err = BusinessDayAdjuster::adjust(start, PaymentFrequency::Daily, &holidays)
            .unwrap_err();
        assert_eq!(
            err,
            CreditError::DateAdjustmentNonConvergence {
                date: start,
                cap: MAX_ADJUSTMENT_STEPS,
            }
        );
    }
}
