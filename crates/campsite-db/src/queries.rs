use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, params};

use campsite_types::{
    BookingRecord, BookingStatus, Capacity, ContactDetails, Season, SiteCategory, SiteType,
    Supplements, Tariff,
};

use crate::Database;
use crate::models::{
    AdminRow, BOOKING_COLUMNS, BookingRow, TARIFF_COLUMNS, TariffRow, format_date,
    format_timestamp, parse_decimal,
};

/// Result of an atomic capacity check plus insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    Created,
    /// Every pitch of the category is taken for at least one night.
    Full { max_places: u32 },
    /// No capacity has been configured for the category.
    NoCapacity,
}

impl Database {
    // -- Bookings --

    pub fn insert_booking(&self, record: &BookingRecord) -> Result<()> {
        self.with_conn(|conn| insert_booking_row(conn, &BookingRow::from_record(record)))
    }

    /// Insert `record` unless the overlapping bookings of its category
    /// already fill the configured capacity. Check and insert run under the
    /// same connection lock.
    pub fn reserve_booking(&self, record: &BookingRecord) -> Result<ReserveOutcome> {
        let Some(stay) = record.stay else {
            anyhow::bail!("booking {} has no stay dates", record.id);
        };
        let category = record.site_type.category();

        self.with_conn(|conn| {
            let Some(max_places) = query_capacity(conn, category)? else {
                return Ok(ReserveOutcome::NoCapacity);
            };

            let taken = count_overlapping(
                conn,
                &category.site_types(),
                stay.check_in(),
                stay.check_out(),
                None,
            )?;
            if taken >= max_places {
                return Ok(ReserveOutcome::Full { max_places });
            }

            insert_booking_row(conn, &BookingRow::from_record(record))?;
            Ok(ReserveOutcome::Created)
        })
    }

    pub fn get_booking(&self, id: &str) -> Result<Option<BookingRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM bookings WHERE id = ?1", BOOKING_COLUMNS),
                    [id],
                    BookingRow::from_sql,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Newest first, optionally restricted to one status.
    pub fn list_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<BookingRow>> {
        self.with_conn(|conn| {
            let rows = match status {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM bookings WHERE status = ?1 ORDER BY created_at DESC",
                        BOOKING_COLUMNS
                    ))?;
                    stmt.query_map([status.as_str()], BookingRow::from_sql)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM bookings ORDER BY created_at DESC",
                        BOOKING_COLUMNS
                    ))?;
                    stmt.query_map([], BookingRow::from_sql)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    /// Rows that may have passed a retention cutoff: checkout before
    /// `cutoff`, no checkout stored, or a stored date that is not a clean
    /// `YYYY-MM-DD` (so cleanup gets to report it).
    pub fn list_bookings_before(&self, cutoff: NaiveDate) -> Result<Vec<BookingRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM bookings
                 WHERE check_out IS NULL
                    OR check_out < ?1
                    OR date(check_out) IS NOT check_out
                    OR (check_in IS NOT NULL AND date(check_in) IS NOT check_in)
                 ORDER BY created_at",
                BOOKING_COLUMNS
            ))?;
            let rows = stmt
                .query_map([format_date(cutoff)], BookingRow::from_sql)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Persist the mutable fields of an existing booking. `id` and
    /// `created_at` are never written. Returns false if the id is unknown.
    pub fn update_booking(&self, record: &BookingRecord) -> Result<bool> {
        let row = BookingRow::from_record(record);
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE bookings SET
                    last_name = ?1, first_name = ?2, email = ?3, phone = ?4,
                    address = ?5, postal_code = ?6, city = ?7, message = ?8,
                    check_in = ?9, check_out = ?10, site_type = ?11,
                    tent_length = ?12, tent_width = ?13, vehicle_length = ?14, cable_length = ?15,
                    adults = ?16, children_over_8 = ?17, children_under_8 = ?18, pets = ?19,
                    extra_vehicles = ?20, extra_tents = ?21,
                    electricity = ?22, deposit_paid = ?23, status = ?24, updated_at = ?25
                 WHERE id = ?26",
                params![
                    row.last_name,
                    row.first_name,
                    row.email,
                    row.phone,
                    row.address,
                    row.postal_code,
                    row.city,
                    row.message,
                    row.check_in,
                    row.check_out,
                    row.site_type,
                    row.tent_length,
                    row.tent_width,
                    row.vehicle_length,
                    row.cable_length,
                    row.adults,
                    row.children_over_8,
                    row.children_under_8,
                    row.pets,
                    row.extra_vehicles,
                    row.extra_tents,
                    row.electricity,
                    row.deposit_paid,
                    row.status,
                    row.updated_at,
                    row.id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Overwrite the contact fields. Returns false when the id is unknown or
    /// the stored values already equal `contact`.
    pub fn set_contact(&self, id: &str, contact: &ContactDetails) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE bookings SET
                    last_name = ?1, first_name = ?2, email = ?3, phone = ?4,
                    address = ?5, postal_code = ?6, city = ?7, message = ?8
                 WHERE id = ?9
                   AND NOT (last_name = ?1 AND first_name = ?2 AND email = ?3
                            AND phone = ?4 AND address = ?5 AND postal_code = ?6
                            AND city = ?7 AND message = ?8)",
                params![
                    contact.last_name,
                    contact.first_name,
                    contact.email,
                    contact.phone,
                    contact.address,
                    contact.postal_code,
                    contact.city,
                    contact.message,
                    id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_booking(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM bookings WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    /// Non-cancelled bookings of `site_types` sharing at least one night with
    /// `[check_in, check_out)`, optionally ignoring one booking.
    pub fn count_overlapping(
        &self,
        site_types: &[SiteType],
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<u32> {
        self.with_conn(|conn| count_overlapping(conn, site_types, check_in, check_out, exclude_id))
    }

    // -- Capacities --

    pub fn set_capacity(&self, category: SiteCategory, max_places: u32) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO capacities (category, max_places) VALUES (?1, ?2)
                 ON CONFLICT(category) DO UPDATE SET max_places = excluded.max_places",
                params![category.as_str(), max_places],
            )?;
            Ok(())
        })
    }

    pub fn get_capacity(&self, category: SiteCategory) -> Result<Option<u32>> {
        self.with_conn(|conn| query_capacity(conn, category))
    }

    pub fn list_capacities(&self) -> Result<Vec<Capacity>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT category, max_places FROM capacities ORDER BY category")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(category, max_places)| -> Result<Capacity> {
                    Ok(Capacity {
                        category: category.parse()?,
                        max_places,
                    })
                })
                .collect()
        })
    }

    // -- Pricing --

    pub fn set_tariff(&self, tariff: &Tariff) -> Result<()> {
        let amount = |d: Option<Decimal>| d.map(|d| d.to_string());
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tariffs (category, season,
                    one_person_with_electricity, two_persons_with_electricity,
                    one_person_without_electricity, two_persons_without_electricity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(category, season) DO UPDATE SET
                    one_person_with_electricity = excluded.one_person_with_electricity,
                    two_persons_with_electricity = excluded.two_persons_with_electricity,
                    one_person_without_electricity = excluded.one_person_without_electricity,
                    two_persons_without_electricity = excluded.two_persons_without_electricity",
                params![
                    tariff.category.as_str(),
                    tariff.season.as_str(),
                    amount(tariff.one_person_with_electricity),
                    amount(tariff.two_persons_with_electricity),
                    amount(tariff.one_person_without_electricity),
                    amount(tariff.two_persons_without_electricity),
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_tariff(&self, category: SiteCategory, season: Season) -> Result<Option<Tariff>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM tariffs WHERE category = ?1 AND season = ?2", TARIFF_COLUMNS),
                    [category.as_str(), season.as_str()],
                    TariffRow::from_sql,
                )
                .optional()?;
            row.map(TariffRow::into_tariff).transpose()
        })
    }

    pub fn list_tariffs(&self) -> Result<Vec<Tariff>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM tariffs ORDER BY category, season",
                TARIFF_COLUMNS
            ))?;
            let rows = stmt
                .query_map([], TariffRow::from_sql)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(TariffRow::into_tariff).collect()
        })
    }

    pub fn delete_tariff(&self, category: SiteCategory, season: Season) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM tariffs WHERE category = ?1 AND season = ?2",
                [category.as_str(), season.as_str()],
            )?;
            Ok(changed > 0)
        })
    }

    /// Current supplements; all zero until an administrator sets them.
    pub fn get_supplements(&self) -> Result<Supplements> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT extra_adult, child_over_8, child_under_8, pet, extra_vehicle, extra_tent
                     FROM supplements WHERE id = 1",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, Option<String>>(4)?,
                            row.get::<_, Option<String>>(5)?,
                        ))
                    },
                )
                .optional()?;

            let Some((extra_adult, over_8, under_8, pet, vehicle, tent)) = row else {
                return Ok(Supplements::default());
            };
            Ok(Supplements {
                extra_adult: stored_amount(&extra_adult)?,
                child_over_8: stored_amount(&over_8)?,
                child_under_8: stored_amount(&under_8)?,
                pet: stored_amount(&pet)?,
                extra_vehicle: vehicle.as_deref().map(stored_amount).transpose()?,
                extra_tent: tent.as_deref().map(stored_amount).transpose()?,
            })
        })
    }

    pub fn set_supplements(&self, supplements: &Supplements) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO supplements
                    (id, extra_adult, child_over_8, child_under_8, pet, extra_vehicle, extra_tent)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    extra_adult = excluded.extra_adult,
                    child_over_8 = excluded.child_over_8,
                    child_under_8 = excluded.child_under_8,
                    pet = excluded.pet,
                    extra_vehicle = excluded.extra_vehicle,
                    extra_tent = excluded.extra_tent",
                params![
                    supplements.extra_adult.to_string(),
                    supplements.child_over_8.to_string(),
                    supplements.child_under_8.to_string(),
                    supplements.pet.to_string(),
                    supplements.extra_vehicle.map(|d| d.to_string()),
                    supplements.extra_tent.map(|d| d.to_string()),
                ],
            )?;
            Ok(())
        })
    }

    // -- Admin users --

    pub fn create_admin(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO admin_users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, format_timestamp(created_at)),
            )?;
            Ok(())
        })
    }

    pub fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, created_at FROM admin_users WHERE username = ?1",
                    [username],
                    |row| {
                        Ok(AdminRow {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            password: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }
}

fn insert_booking_row(conn: &Connection, row: &BookingRow) -> Result<()> {
    let placeholders: Vec<String> = (1..=27).map(|i| format!("?{}", i)).collect();
    conn.execute(
        &format!(
            "INSERT INTO bookings ({}) VALUES ({})",
            BOOKING_COLUMNS,
            placeholders.join(", ")
        ),
        params![
            row.id,
            row.last_name,
            row.first_name,
            row.email,
            row.phone,
            row.address,
            row.postal_code,
            row.city,
            row.message,
            row.check_in,
            row.check_out,
            row.site_type,
            row.tent_length,
            row.tent_width,
            row.vehicle_length,
            row.cable_length,
            row.adults,
            row.children_over_8,
            row.children_under_8,
            row.pets,
            row.extra_vehicles,
            row.extra_tents,
            row.electricity,
            row.deposit_paid,
            row.status,
            row.created_at,
            row.updated_at,
        ],
    )?;
    Ok(())
}

fn query_capacity(conn: &Connection, category: SiteCategory) -> Result<Option<u32>> {
    let max = conn
        .query_row(
            "SELECT max_places FROM capacities WHERE category = ?1",
            [category.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(max)
}

fn count_overlapping(
    conn: &Connection,
    site_types: &[SiteType],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_id: Option<&str>,
) -> Result<u32> {
    if site_types.is_empty() {
        return Ok(0);
    }

    // ?1 = check_in, ?2 = check_out, ?3 = excluded id, ?4.. = site types
    let placeholders: Vec<String> = (4..4 + site_types.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT COUNT(*) FROM bookings
         WHERE status != 'cancelled'
           AND check_in < ?2 AND check_out > ?1
           AND id != COALESCE(?3, '')
           AND site_type IN ({})",
        placeholders.join(", ")
    );

    let check_in = format_date(check_in);
    let check_out = format_date(check_out);
    let names: Vec<&str> = site_types.iter().map(SiteType::as_str).collect();

    let mut params: Vec<&dyn ToSql> = vec![&check_in, &check_out, &exclude_id];
    params.extend(names.iter().map(|n| n as &dyn ToSql));

    let count: u32 = conn.query_row(&sql, params.as_slice(), |row| row.get(0))?;
    Ok(count)
}

fn stored_amount(s: &str) -> Result<Decimal> {
    parse_decimal(s).map_err(|e| anyhow!("corrupt supplement: {}", e))
}
