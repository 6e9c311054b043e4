//! Seasonal tariffs and the price of a stay.
//!
//! A stay is priced per night: a base price covering one or two adults,
//! plus per-night supplements for extra adults, children, pets, extra
//! vehicles and extra tents. The deposit is 15% of the total.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BookingRecord, ModelError, SiteCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Low,
    Mid,
    High,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Low, Season::Mid, Season::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Low => "low",
            Season::Mid => "mid",
            Season::High => "high",
        }
    }

    /// Season a stay arriving on `date` is charged at. Low season runs from
    /// 27 September to 26 April, high season from 5 July to 30 August.
    pub fn of(date: NaiveDate) -> Season {
        let day = (date.month(), date.day());
        if day >= (9, 27) || day <= (4, 26) {
            Season::Low
        } else if (7, 5) <= day && day <= (8, 30) {
            Season::High
        } else {
            Season::Mid
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str() == s)
            .ok_or_else(|| ModelError::UnknownSeason(s.to_string()))
    }
}

/// Nightly base prices of one category in one season.
///
/// Camping cars always pay the two-person price; other pitches pay the
/// one-person price for a single adult. Missing prices count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub category: SiteCategory,
    pub season: Season,
    pub one_person_with_electricity: Option<Decimal>,
    pub two_persons_with_electricity: Option<Decimal>,
    pub one_person_without_electricity: Option<Decimal>,
    pub two_persons_without_electricity: Option<Decimal>,
}

impl Tariff {
    /// Base price per night and how many adults it covers.
    pub fn base(&self, adults: u32, electricity: bool) -> (Decimal, u32) {
        let two_persons = self.category == SiteCategory::CampingCar || adults >= 2;
        let price = match (two_persons, electricity) {
            (true, true) => self.two_persons_with_electricity,
            (true, false) => self.two_persons_without_electricity,
            (false, true) => self.one_person_with_electricity,
            (false, false) => self.one_person_without_electricity,
        };
        (price.unwrap_or_default(), if two_persons { 2 } else { 1 })
    }
}

/// Per-night supplements shared by every tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplements {
    pub extra_adult: Decimal,
    pub child_over_8: Decimal,
    pub child_under_8: Decimal,
    pub pet: Decimal,
    pub extra_vehicle: Option<Decimal>,
    pub extra_tent: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub season: Season,
    pub nights: i64,
    pub total: Decimal,
    pub deposit: Decimal,
    /// Left to pay on arrival.
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("booking has no stay dates")]
    NoStay,
    #[error("tariff is for {tariff_category}/{tariff_season}, booking needs {category}/{season}")]
    TariffMismatch {
        category: SiteCategory,
        season: Season,
        tariff_category: SiteCategory,
        tariff_season: Season,
    },
    #[error("price does not fit in a decimal")]
    Overflow,
}

/// Season a booking is charged at, from its arrival date.
pub fn season_of(record: &BookingRecord) -> Option<Season> {
    record.stay.map(|stay| Season::of(stay.check_in()))
}

/// Price `record` with the tariff of its category and season.
pub fn quote(
    record: &BookingRecord,
    tariff: &Tariff,
    supplements: &Supplements,
) -> Result<Quote, PricingError> {
    let stay = record.stay.ok_or(PricingError::NoStay)?;
    let category = record.site_type.category();
    let season = Season::of(stay.check_in());
    if tariff.category != category || tariff.season != season {
        return Err(PricingError::TariffMismatch {
            category,
            season,
            tariff_category: tariff.category,
            tariff_season: tariff.season,
        });
    }

    let (base, included) = tariff.base(record.adults, record.electricity);
    let lines = [
        (1, base),
        (record.adults.saturating_sub(included), supplements.extra_adult),
        (record.children_over_8, supplements.child_over_8),
        (record.children_under_8, supplements.child_under_8),
        (record.pets, supplements.pet),
        (record.extra_vehicles, supplements.extra_vehicle.unwrap_or_default()),
        (record.extra_tents, supplements.extra_tent.unwrap_or_default()),
    ];
    let per_night = lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (count, price)| {
            price.checked_mul(Decimal::from(count))?.checked_add(acc)
        })
        .ok_or(PricingError::Overflow)?;

    let nights = stay.nights().max(1);
    let total = per_night
        .checked_mul(Decimal::from(nights))
        .ok_or(PricingError::Overflow)?
        .round_dp(2);
    let deposit = deposit_for(total)?;

    Ok(Quote {
        season,
        nights,
        total,
        deposit,
        balance: total - deposit,
    })
}

/// 15% of `total`, rounded to the cent.
pub fn deposit_for(total: Decimal) -> Result<Decimal, PricingError> {
    total
        .checked_mul(Decimal::new(15, 2))
        .map(|d| d.round_dp(2))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, ContactDetails, Equipment, SiteType, StayDates};
    use chrono::{TimeZone, Utc};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn euros(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn booking(site_type: SiteType, check_in: NaiveDate, nights: i64) -> BookingRecord {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        BookingRecord {
            id: uuid::Uuid::new_v4(),
            contact: ContactDetails::blank(),
            stay: Some(StayDates::new(check_in, check_in + chrono::Duration::days(nights)).unwrap()),
            site_type,
            equipment: Equipment::default(),
            adults: 2,
            children_over_8: 0,
            children_under_8: 0,
            pets: 0,
            extra_vehicles: 0,
            extra_tents: 0,
            electricity: true,
            deposit_paid: false,
            status: BookingStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    fn tariff(category: SiteCategory, season: Season) -> Tariff {
        Tariff {
            category,
            season,
            one_person_with_electricity: Some(euros(2000)),
            two_persons_with_electricity: Some(euros(3000)),
            one_person_without_electricity: Some(euros(1500)),
            two_persons_without_electricity: Some(euros(2500)),
        }
    }

    #[test]
    fn seasons_follow_the_calendar() {
        assert_eq!(Season::of(date(4, 26)), Season::Low);
        assert_eq!(Season::of(date(4, 27)), Season::Mid);
        assert_eq!(Season::of(date(7, 4)), Season::Mid);
        assert_eq!(Season::of(date(7, 5)), Season::High);
        assert_eq!(Season::of(date(8, 30)), Season::High);
        assert_eq!(Season::of(date(8, 31)), Season::Mid);
        assert_eq!(Season::of(date(9, 26)), Season::Mid);
        assert_eq!(Season::of(date(9, 27)), Season::Low);
        assert_eq!(Season::of(date(12, 31)), Season::Low);
        assert_eq!(Season::of(date(1, 1)), Season::Low);
    }

    #[test]
    fn two_adults_with_electricity_in_low_season() {
        let record = booking(SiteType::Tent, date(4, 20), 2);
        let quote = quote(&record, &tariff(SiteCategory::Tent, Season::Low), &Supplements::default())
            .unwrap();
        assert_eq!(quote.nights, 2);
        assert_eq!(quote.total, euros(6000));
        assert_eq!(quote.deposit, euros(900));
        assert_eq!(quote.balance, euros(5100));
    }

    #[test]
    fn single_adult_pays_the_one_person_price() {
        let mut record = booking(SiteType::Caravan, date(6, 1), 3);
        record.adults = 1;
        record.electricity = false;
        let quote = quote(&record, &tariff(SiteCategory::Caravan, Season::Mid), &Supplements::default())
            .unwrap();
        assert_eq!(quote.total, euros(4500));
    }

    #[test]
    fn camping_cars_always_pay_for_two() {
        let mut record = booking(SiteType::CampingCar, date(7, 10), 1);
        record.adults = 1;
        let quote = quote(
            &record,
            &tariff(SiteCategory::CampingCar, Season::High),
            &Supplements::default(),
        )
        .unwrap();
        assert_eq!(quote.total, euros(3000));
    }

    #[test]
    fn supplements_are_charged_per_night() {
        let mut record = booking(SiteType::Van, date(6, 10), 2);
        record.adults = 3;
        record.children_over_8 = 1;
        record.children_under_8 = 2;
        record.pets = 1;
        record.extra_vehicles = 1;
        record.extra_tents = 1;
        let supplements = Supplements {
            extra_adult: euros(600),
            child_over_8: euros(400),
            child_under_8: euros(250),
            pet: euros(150),
            extra_vehicle: Some(euros(300)),
            extra_tent: None,
        };

        let quote = quote(&record, &tariff(SiteCategory::Caravan, Season::Mid), &supplements).unwrap();

        // 30 + 6 + 4 + 2 * 2.5 + 1.5 + 3 + 0 = 49.50 a night
        assert_eq!(quote.total, euros(9900));
        assert_eq!(quote.deposit, euros(1485));
    }

    #[test]
    fn deposit_rounds_to_the_cent() {
        assert_eq!(deposit_for(euros(3333)).unwrap(), euros(500));
        assert_eq!(deposit_for(euros(1)).unwrap(), euros(0));
    }

    #[test]
    fn wrong_tariff_is_refused() {
        let record = booking(SiteType::Tent, date(7, 10), 2);
        assert!(matches!(
            quote(&record, &tariff(SiteCategory::Tent, Season::Low), &Supplements::default()),
            Err(PricingError::TariffMismatch { .. })
        ));

        let mut dateless = record.clone();
        dateless.stay = None;
        assert_eq!(
            quote(&dateless, &tariff(SiteCategory::Tent, Season::High), &Supplements::default()),
            Err(PricingError::NoStay)
        );
    }

    #[test]
    fn absurd_counts_do_not_panic() {
        let mut record = booking(SiteType::Tent, date(7, 10), 2);
        record.pets = u32::MAX;
        let supplements = Supplements {
            pet: Decimal::MAX,
            ..Supplements::default()
        };
        assert_eq!(
            quote(&record, &tariff(SiteCategory::Tent, Season::High), &supplements),
            Err(PricingError::Overflow)
        );
    }
}
