use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};

/// the single operating timezone of the business, as a UTC offset in hours.
/// every "today" and every payment-date comparison in the crate goes through
/// a clock carrying this offset (or an explicitly injected one); mixing
/// viewer-local and UTC dates is how off-by-one-day aging bugs happen.
pub const BUSINESS_UTC_OFFSET_HOURS: i32 = -6;

/// time source pinned to the business timezone.
///
/// wraps a [SafeTimeProvider] so tests can freeze or advance "now", and
/// converts every timestamp to a calendar date in the configured offset.
pub struct BusinessClock {
    time: SafeTimeProvider,
    offset: FixedOffset,
}

impl BusinessClock {
    pub fn new(time: SafeTimeProvider, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// system clock at the canonical business offset
    pub fn system() -> Self {
        Self::new(SafeTimeProvider::new(TimeSource::System), default_offset())
    }

    /// frozen test clock at the canonical business offset
    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self::new(SafeTimeProvider::new(TimeSource::Test(at)), default_offset())
    }

    /// current calendar date in the business timezone
    pub fn today(&self) -> NaiveDate {
        self.business_date(self.time.now())
    }

    /// calendar date of a timestamp in the business timezone
    pub fn business_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn provider(&self) -> &SafeTimeProvider {
        &self.time
    }
}

fn default_offset() -> FixedOffset {
    // offset constant is within chrono's valid range
    FixedOffset::east_opt(BUSINESS_UTC_OFFSET_HOURS * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}
