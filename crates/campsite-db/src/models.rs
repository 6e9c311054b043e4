//! Database row types. These map directly to SQLite rows; decoding into
//! `campsite-types` records is where stored data meets the invariants.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use anyhow::anyhow;
use campsite_types::{BookingRecord, ContactDetails, Equipment, Season, SiteCategory, StayDates, Tariff};

use crate::error::InvalidRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub message: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub site_type: String,
    pub tent_length: Option<String>,
    pub tent_width: Option<String>,
    pub vehicle_length: Option<String>,
    pub cable_length: Option<String>,
    pub adults: i64,
    pub children_over_8: i64,
    pub children_under_8: i64,
    pub pets: i64,
    pub extra_vehicles: i64,
    pub extra_tents: i64,
    pub electricity: bool,
    pub deposit_paid: bool,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct AdminRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub(crate) struct TariffRow {
    pub category: String,
    pub season: String,
    pub one_person_with_electricity: Option<String>,
    pub two_persons_with_electricity: Option<String>,
    pub one_person_without_electricity: Option<String>,
    pub two_persons_without_electricity: Option<String>,
}

pub(crate) const TARIFF_COLUMNS: &str = "category, season, \
     one_person_with_electricity, two_persons_with_electricity, \
     one_person_without_electricity, two_persons_without_electricity";

impl TariffRow {
    pub(crate) fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            category: row.get(0)?,
            season: row.get(1)?,
            one_person_with_electricity: row.get(2)?,
            two_persons_with_electricity: row.get(3)?,
            one_person_without_electricity: row.get(4)?,
            two_persons_without_electricity: row.get(5)?,
        })
    }

    pub(crate) fn into_tariff(self) -> anyhow::Result<Tariff> {
        let category: SiteCategory = self.category.parse()?;
        let season: Season = self.season.parse()?;
        let amount = |value: Option<String>| {
            value
                .map(|v| parse_decimal(&v).map_err(|e| anyhow!("corrupt {}/{} tariff: {}", category, season, e)))
                .transpose()
        };
        Ok(Tariff {
            category,
            season,
            one_person_with_electricity: amount(self.one_person_with_electricity)?,
            two_persons_with_electricity: amount(self.two_persons_with_electricity)?,
            one_person_without_electricity: amount(self.one_person_without_electricity)?,
            two_persons_without_electricity: amount(self.two_persons_without_electricity)?,
        })
    }
}

pub(crate) const BOOKING_COLUMNS: &str = "id, last_name, first_name, email, phone, address, \
     postal_code, city, message, check_in, check_out, site_type, \
     tent_length, tent_width, vehicle_length, cable_length, \
     adults, children_over_8, children_under_8, pets, extra_vehicles, extra_tents, \
     electricity, deposit_paid, status, created_at, updated_at";

impl BookingRow {
    pub(crate) fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            last_name: row.get(1)?,
            first_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            address: row.get(5)?,
            postal_code: row.get(6)?,
            city: row.get(7)?,
            message: row.get(8)?,
            check_in: row.get(9)?,
            check_out: row.get(10)?,
            site_type: row.get(11)?,
            tent_length: row.get(12)?,
            tent_width: row.get(13)?,
            vehicle_length: row.get(14)?,
            cable_length: row.get(15)?,
            adults: row.get(16)?,
            children_over_8: row.get(17)?,
            children_under_8: row.get(18)?,
            pets: row.get(19)?,
            extra_vehicles: row.get(20)?,
            extra_tents: row.get(21)?,
            electricity: row.get(22)?,
            deposit_paid: row.get(23)?,
            status: row.get(24)?,
            created_at: row.get(25)?,
            updated_at: row.get(26)?,
        })
    }

    pub fn from_record(record: &BookingRecord) -> Self {
        let contact = &record.contact;
        let equipment = &record.equipment;
        Self {
            id: record.id.to_string(),
            last_name: contact.last_name.clone(),
            first_name: contact.first_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            postal_code: contact.postal_code.clone(),
            city: contact.city.clone(),
            message: contact.message.clone(),
            check_in: record.stay.map(|s| format_date(s.check_in())),
            check_out: record.stay.map(|s| format_date(s.check_out())),
            site_type: record.site_type.as_str().to_string(),
            tent_length: equipment.tent_length.map(|d| d.to_string()),
            tent_width: equipment.tent_width.map(|d| d.to_string()),
            vehicle_length: equipment.vehicle_length.map(|d| d.to_string()),
            cable_length: equipment.cable_length.map(|d| d.to_string()),
            adults: i64::from(record.adults),
            children_over_8: i64::from(record.children_over_8),
            children_under_8: i64::from(record.children_under_8),
            pets: i64::from(record.pets),
            extra_vehicles: i64::from(record.extra_vehicles),
            extra_tents: i64::from(record.extra_tents),
            electricity: record.electricity,
            deposit_paid: record.deposit_paid,
            status: record.status.as_str().to_string(),
            created_at: format_timestamp(record.created_at),
            updated_at: format_timestamp(record.updated_at),
        }
    }

    /// Decode into a domain record, checking every invariant the store
    /// cannot enforce on its own.
    pub fn into_record(self) -> Result<BookingRecord, InvalidRecord> {
        let invalid = |reason: String| InvalidRecord::new(&self.id, reason);

        let id: Uuid = self
            .id
            .parse()
            .map_err(|e| invalid(format!("bad id: {}", e)))?;

        let stay = match (&self.check_in, &self.check_out) {
            (None, None) => None,
            (Some(check_in), Some(check_out)) => {
                let check_in = parse_date(check_in).map_err(invalid)?;
                let check_out = parse_date(check_out).map_err(invalid)?;
                Some(StayDates::new(check_in, check_out).map_err(|e| invalid(e.to_string()))?)
            }
            (Some(_), None) => return Err(invalid("missing check-out date".into())),
            (None, Some(_)) => return Err(invalid("missing check-in date".into())),
        };

        let site_type = self
            .site_type
            .parse()
            .map_err(|e: campsite_types::ModelError| invalid(e.to_string()))?;
        let status = self
            .status
            .parse()
            .map_err(|e: campsite_types::ModelError| invalid(e.to_string()))?;
        let created_at = parse_timestamp(&self.created_at).map_err(invalid)?;
        let updated_at = parse_timestamp(&self.updated_at).map_err(invalid)?;

        let length = |name: &str, value: &Option<String>| -> Result<Option<Decimal>, InvalidRecord> {
            value
                .as_deref()
                .map(|v| parse_decimal(v).map_err(|e| invalid(format!("{}: {}", name, e))))
                .transpose()
        };
        let equipment = Equipment {
            tent_length: length("tent_length", &self.tent_length)?,
            tent_width: length("tent_width", &self.tent_width)?,
            vehicle_length: length("vehicle_length", &self.vehicle_length)?,
            cable_length: length("cable_length", &self.cable_length)?,
        };

        let count = |name: &str, value: i64| {
            u32::try_from(value).map_err(|_| invalid(format!("negative {}: {}", name, value)))
        };

        Ok(BookingRecord {
            id,
            contact: ContactDetails {
                last_name: self.last_name.clone(),
                first_name: self.first_name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                address: self.address.clone(),
                postal_code: self.postal_code.clone(),
                city: self.city.clone(),
                message: self.message.clone(),
            },
            stay,
            site_type,
            equipment,
            adults: count("adults", self.adults)?,
            children_over_8: count("children_over_8", self.children_over_8)?,
            children_under_8: count("children_under_8", self.children_under_8)?,
            pets: count("pets", self.pets)?,
            extra_vehicles: count("extra_vehicles", self.extra_vehicles)?,
            extra_tents: count("extra_tents", self.extra_tents)?,
            electricity: self.electricity,
            deposit_paid: self.deposit_paid,
            status,
            created_at,
            updated_at,
        })
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("bad date '{}': {}", s, e))
}

pub(crate) fn parse_decimal(s: &str) -> Result<Decimal, String> {
    s.parse::<Decimal>()
        .map_err(|e| format!("bad amount '{}': {}", s, e))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') has no timezone. Treat it as UTC.
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| format!("bad timestamp '{}': {}", s, e))
}
