use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use campsite_db::BookingRow;
use campsite_types::{
    BookingRecord, BookingStatus, ContactDetails, Equipment, SiteType, StayDates,
};

/// Day `n` after 2026-01-01, at noon UTC.
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
}

/// A three-night booking checking out on day `check_out`, created a month
/// before arrival.
pub fn booking(check_out: i64) -> BookingRecord {
    let out = day(check_out).date_naive();
    BookingRecord {
        id: Uuid::new_v4(),
        contact: ContactDetails {
            last_name: "Lefèvre".into(),
            first_name: "Claire".into(),
            email: "claire.lefevre@example.fr".into(),
            phone: "06 98 76 54 32".into(),
            address: "12 chemin du Lac".into(),
            postal_code: "53000".into(),
            city: "Laval".into(),
            message: "Nous venons avec notre chien.".into(),
        },
        stay: Some(StayDates::new(out - Duration::days(3), out).unwrap()),
        site_type: SiteType::CampingCar,
        equipment: Equipment::default(),
        adults: 2,
        children_over_8: 0,
        children_under_8: 0,
        pets: 1,
        extra_vehicles: 0,
        extra_tents: 0,
        electricity: true,
        deposit_paid: true,
        status: BookingStatus::Confirmed,
        created_at: day(check_out - 33),
        updated_at: day(check_out - 33),
    }
}

pub fn row(record: &BookingRecord) -> BookingRow {
    BookingRow::from_record(record)
}
