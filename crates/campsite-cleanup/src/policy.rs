use chrono::{DateTime, Duration, NaiveDate, Utc};

use campsite_types::BookingRecord;

/// Ten years, counted in days as the site always has.
pub const DEFAULT_RETENTION_DAYS: u32 = 10 * 365;

/// Decides which bookings have outlived the retention window.
///
/// The relevant date of a booking is its check-out date, or its creation
/// time when it has no stay. A booking is eligible once that date lies
/// strictly before `now - window`; a booking exactly on the cutoff is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: Duration,
}

impl RetentionPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn days(days: u32) -> Self {
        Self::new(Duration::days(i64::from(days)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// `now - window`, clamped to the earliest representable instant when
    /// the window reaches past it. Nothing is older than that.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Calendar date checkout dates are compared against.
    pub fn cutoff_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.cutoff(now).date_naive()
    }

    pub fn is_eligible(&self, now: DateTime<Utc>, record: &BookingRecord) -> bool {
        match record.stay {
            Some(stay) => stay.check_out() < self.cutoff_date(now),
            None => record.created_at < self.cutoff(now),
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::days(DEFAULT_RETENTION_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campsite_types::{BookingStatus, ContactDetails, Equipment, SiteType, StayDates};
    use chrono::TimeZone;

    const EPOCH: (i32, u32, u32) = (2026, 1, 1);

    /// Day `n` counted from an arbitrary epoch, at noon.
    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(EPOCH.0, EPOCH.1, EPOCH.2, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn record(check_out_day: Option<i64>, created_day: i64) -> BookingRecord {
        BookingRecord {
            id: uuid::Uuid::new_v4(),
            contact: ContactDetails::blank(),
            stay: check_out_day.map(|d| {
                let out = day(d).date_naive();
                StayDates::new(out - Duration::days(3), out).unwrap()
            }),
            site_type: SiteType::Tent,
            equipment: Equipment::default(),
            adults: 1,
            children_over_8: 0,
            children_under_8: 0,
            pets: 0,
            extra_vehicles: 0,
            extra_tents: 0,
            electricity: false,
            deposit_paid: false,
            status: BookingStatus::Confirmed,
            created_at: day(created_day),
            updated_at: day(created_day),
        }
    }

    #[test]
    fn thirty_day_window_example() {
        let policy = RetentionPolicy::days(30);
        let now = day(100);
        assert!(policy.is_eligible(now, &record(Some(65), 0)));
        assert!(!policy.is_eligible(now, &record(Some(75), 0)));
    }

    #[test]
    fn checkout_on_the_cutoff_is_kept() {
        let policy = RetentionPolicy::days(30);
        let now = day(100);
        assert!(!policy.is_eligible(now, &record(Some(70), 0)));
        assert!(policy.is_eligible(now, &record(Some(69), 0)));
    }

    #[test]
    fn creation_time_applies_without_a_stay() {
        let policy = RetentionPolicy::days(30);
        let now = day(100);
        assert!(policy.is_eligible(now, &record(None, 69)));
        assert!(!policy.is_eligible(now, &record(None, 70)));
        assert!(!policy.is_eligible(now, &record(None, 99)));
    }

    #[test]
    fn checkout_wins_over_creation_time() {
        // Booked long ago for a stay that only just ended.
        let policy = RetentionPolicy::days(30);
        let now = day(100);
        assert!(!policy.is_eligible(now, &record(Some(90), -500)));
    }

    #[test]
    fn window_longer_than_the_calendar_keeps_everything() {
        let policy = RetentionPolicy::days(200_000_000);
        let now = day(100);
        assert_eq!(policy.cutoff(now), DateTime::<Utc>::MIN_UTC);
        assert!(!policy.is_eligible(now, &record(Some(-100_000), -100_000)));
        assert!(!policy.is_eligible(now, &record(None, -100_000)));

        let widest = RetentionPolicy::days(u32::MAX);
        assert!(!widest.is_eligible(now, &record(Some(-1), -5)));
    }

    #[test]
    fn default_window_is_ten_years() {
        assert_eq!(RetentionPolicy::default().window(), Duration::days(3650));
    }
}
