use chrono::NaiveDate;

use super::common::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
}

#[test]
fn expiry_flag_trips_at_two_days_out_but_not_three() {
    // Fixture expiry is 2024-01-25.
    let record = record_at("don-1", &producer(), timestamp(8));

    assert_eq!(record.days_until_expiry(day(23)), 2);
    assert!(record.expiring_soon(day(23)));

    assert_eq!(record.days_until_expiry(day(22)), 3);
    assert!(!record.expiring_soon(day(22)));
}

#[test]
fn past_expiry_counts_negative_and_stays_flagged() {
    let record = record_at("don-1", &producer(), timestamp(8));

    assert_eq!(record.days_until_expiry(day(28)), -3);
    assert!(record.expiring_soon(day(28)));
}

#[test]
fn feed_view_carries_expiry_annotations() {
    let record = record_at("don-1", &producer(), timestamp(8));
    let view = record.feed_view(day(24));

    assert_eq!(view.days_until_expiry, 1);
    assert!(view.expiring_soon);
    assert_eq!(view.status, "available");
}
