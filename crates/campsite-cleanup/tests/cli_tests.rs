mod common;

use clap::Parser;

use campsite_cleanup::cli::{Cli, run};
use campsite_cleanup::{CleanupMode, DEFAULT_RETENTION_DAYS};
use campsite_db::Database;

use common::{booking, day};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("clean-old-bookings").chain(args.iter().copied()))
        .unwrap()
}

#[test]
fn deletes_by_default() {
    let cli = parse(&["--database", "bookings.db"]);
    assert_eq!(cli.mode(), CleanupMode::Delete);
    assert_eq!(cli.retention_days, DEFAULT_RETENTION_DAYS);
    assert!(cli.now.is_none());
}

#[test]
fn anonymize_flag_switches_mode() {
    let cli = parse(&["--anonymize", "--retention-days", "30"]);
    assert_eq!(cli.mode(), CleanupMode::Anonymize);
    assert_eq!(cli.policy().window(), chrono::Duration::days(30));
}

#[test]
fn retention_must_be_at_least_a_day() {
    assert!(Cli::try_parse_from(["clean-old-bookings", "--retention-days", "0"]).is_err());
    assert!(Cli::try_parse_from(["clean-old-bookings", "--retention-days", "-5"]).is_err());
    assert!(Cli::try_parse_from(["clean-old-bookings", "--now", "yesterday"]).is_err());
}

#[test]
fn missing_database_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let cli = parse(&["--database", path.to_str().unwrap()]);

    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("booking store unavailable"));
    assert!(!path.exists());
}

#[test]
fn empty_database_succeeds_with_nothing_done() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campsite.db");
    Database::open(&path).unwrap();

    let cli = parse(&["--database", path.to_str().unwrap()]);
    let report = run(&cli).unwrap();
    assert_eq!(report.affected, 0);
    assert_eq!(report.skipped, 0);
}

#[test]
fn anonymizes_expired_bookings_in_the_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campsite.db");
    let expired = booking(65);
    let recent = booking(75);
    {
        let db = Database::open(&path).unwrap();
        db.insert_booking(&expired).unwrap();
        db.insert_booking(&recent).unwrap();
    }

    let now = day(100).to_rfc3339();
    let cli = parse(&[
        "--anonymize",
        "--retention-days",
        "30",
        "--now",
        &now,
        "--database",
        path.to_str().unwrap(),
    ]);
    let report = run(&cli).unwrap();
    assert_eq!(report.affected, 1);
    assert_eq!(report.to_string(), "1 booking(s) anonymized (cutoff 2026-03-12)");

    let db = Database::open_existing(&path).unwrap();
    let stored = db
        .get_booking(&expired.id.to_string())
        .unwrap()
        .unwrap()
        .into_record()
        .unwrap();
    assert!(stored.contact.is_blank());
}
