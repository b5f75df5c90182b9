// Conditional request tests against real cache entries

use brewcache::cache::CacheEntry;
use brewcache::delivery::{evaluate, format_http_date, parse_http_date, Evaluation};
use std::time::{Duration, SystemTime};

fn entry_modified_at(secs: u64) -> CacheEntry {
    CacheEntry::build(
        "logo.svg",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>",
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
    )
    .unwrap()
}

#[test]
fn test_if_none_match_with_entry_etag() {
    let entry = entry_modified_at(1_600_000_000);
    assert_eq!(
        evaluate(&entry, Some(entry.etag.as_str()), None),
        Evaluation::NotModified
    );
    assert_eq!(
        evaluate(&entry, Some("\"0000\""), None),
        Evaluation::Send
    );
}

#[test]
fn test_if_modified_since_boundaries() {
    let entry = entry_modified_at(1_600_000_000);
    let at = format_http_date(entry.last_modified);
    let day_before = format_http_date(entry.last_modified - Duration::from_secs(86_400));
    let second_before = format_http_date(entry.last_modified - Duration::from_secs(1));

    assert_eq!(evaluate(&entry, None, Some(&at)), Evaluation::NotModified);
    assert_eq!(evaluate(&entry, None, Some(&day_before)), Evaluation::Send);
    assert_eq!(evaluate(&entry, None, Some(&second_before)), Evaluation::Send);
}

#[test]
fn test_no_conditions_sends() {
    assert_eq!(
        evaluate(&entry_modified_at(0), None, None),
        Evaluation::Send
    );
}

#[test]
fn test_http_date_round_trip_on_whole_seconds() {
    let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    assert_eq!(parse_http_date(&format_http_date(time)), Some(time));
}
