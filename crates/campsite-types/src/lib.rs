//! Shared campsite booking types.
//!
//! `models` holds the domain records every crate agrees on, `pricing` the
//! tariff arithmetic, and `api` the JSON request and response shapes of the
//! HTTP surface.
pub mod api;
pub mod models;
pub mod pricing;

pub use models::{
    BookingRecord, BookingStatus, Capacity, ContactDetails, Equipment, ModelError, SiteCategory,
    SiteType, StayDates,
};
pub use pricing::{PricingError, Quote, Season, Supplements, Tariff};
