pub mod business_day;
pub mod clock;
pub mod holidays;

pub use business_day::{BusinessDayAdjuster, MAX_ADJUSTMENT_STEPS};
pub use clock::{BusinessClock, BUSINESS_UTC_OFFSET_HOURS};
pub use holidays::HolidayCalendar;
