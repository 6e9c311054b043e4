use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("unknown booking status '{0}'")]
    UnknownStatus(String),
    #[error("unknown site type '{0}'")]
    UnknownSiteType(String),
    #[error("unknown site category '{0}'")]
    UnknownCategory(String),
    #[error("unknown season '{0}'")]
    UnknownSeason(String),
    #[error("check-out {check_out} must be after check-in {check_in}")]
    InvertedStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Pitch type requested by the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    Tent,
    CarTent,
    Caravan,
    Fourgon,
    Van,
    CampingCar,
}

impl SiteType {
    pub const ALL: [SiteType; 6] = [
        SiteType::Tent,
        SiteType::CarTent,
        SiteType::Caravan,
        SiteType::Fourgon,
        SiteType::Van,
        SiteType::CampingCar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::Tent => "tent",
            SiteType::CarTent => "car_tent",
            SiteType::Caravan => "caravan",
            SiteType::Fourgon => "fourgon",
            SiteType::Van => "van",
            SiteType::CampingCar => "camping_car",
        }
    }

    /// Tents are measured by their footprint, everything else by its length.
    pub fn is_tent(&self) -> bool {
        self.category() == SiteCategory::Tent
    }

    /// Capacity bucket this site type draws from.
    pub fn category(&self) -> SiteCategory {
        match self {
            SiteType::Tent | SiteType::CarTent => SiteCategory::Tent,
            SiteType::Caravan | SiteType::Fourgon | SiteType::Van => SiteCategory::Caravan,
            SiteType::CampingCar => SiteCategory::CampingCar,
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SiteType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownSiteType(s.to_string()))
    }
}

/// Capacity categories. Several site types share one pool of pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteCategory {
    Tent,
    Caravan,
    CampingCar,
}

impl SiteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteCategory::Tent => "tent",
            SiteCategory::Caravan => "caravan",
            SiteCategory::CampingCar => "camping_car",
        }
    }

    pub fn site_types(&self) -> Vec<SiteType> {
        SiteType::ALL
            .into_iter()
            .filter(|t| t.category() == *self)
            .collect()
    }
}

impl fmt::Display for SiteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tent" => Ok(SiteCategory::Tent),
            "caravan" => Ok(SiteCategory::Caravan),
            "camping_car" => Ok(SiteCategory::CampingCar),
            other => Err(ModelError::UnknownCategory(other.to_string())),
        }
    }
}

/// Arrival and departure dates. Departure is always strictly after arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ModelError> {
        if check_out <= check_in {
            return Err(ModelError::InvertedStay {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Everything the guest told us about themselves, the free-text message
/// included. Anonymization blanks all of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub message: String,
}

impl ContactDetails {
    /// The anonymized state: every field empty.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::blank()
    }
}

/// Equipment measurements in metres. Which ones are required depends on
/// the site type and on whether electricity was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub tent_length: Option<Decimal>,
    pub tent_width: Option<Decimal>,
    pub vehicle_length: Option<Decimal>,
    pub cable_length: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub contact: ContactDetails,
    pub stay: Option<StayDates>,
    pub site_type: SiteType,
    pub equipment: Equipment,
    pub adults: u32,
    pub children_over_8: u32,
    pub children_under_8: u32,
    pub pets: u32,
    pub extra_vehicles: u32,
    pub extra_tents: u32,
    pub electricity: bool,
    pub deposit_paid: bool,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub category: SiteCategory,
    pub max_places: u32,
}
