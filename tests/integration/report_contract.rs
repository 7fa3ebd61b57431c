//! The dashboard consumes the serialized report as-is, so field names and
//! the granularity discriminator are pinned here.

use tally_dns_application::services::stats_rollup::{daily_report, hourly_report};
use tally_dns_domain::{StatsReport, TimeUnits, UnitCounters};

fn sample_units(count: usize) -> Vec<UnitCounters> {
    (0..count)
        .map(|i| UnitCounters {
            total: i as u64,
            ..UnitCounters::default()
        })
        .collect()
}

#[test]
fn test_hourly_report_field_names() {
    let report = hourly_report(&sample_units(3));
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["time_units"], "hours");
    assert_eq!(value["dns_queries"].as_array().unwrap().len(), 3);
    for field in [
        "blocked_filtering",
        "replaced_safebrowsing",
        "replaced_parental",
        "num_dns_queries",
        "num_blocked_filtering",
        "num_replaced_safebrowsing",
        "num_replaced_safesearch",
        "num_replaced_parental",
        "avg_processing_time",
    ] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn test_daily_report_discriminator() {
    // 72 aligned hours ending 12 hours into the current day.
    let report = daily_report(&sample_units(72), 4 * 24 + 12);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["time_units"], "days");
}

#[test]
fn test_time_units_serialization_round_trips() {
    for (units, text) in [(TimeUnits::Hours, "\"hours\""), (TimeUnits::Days, "\"days\"")] {
        assert_eq!(serde_json::to_string(&units).unwrap(), text);
        let parsed: TimeUnits = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, units);
    }
}

#[test]
fn test_default_report_is_empty_hours() {
    let report = StatsReport::default();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["time_units"], "hours");
    assert_eq!(value["dns_queries"].as_array().unwrap().len(), 0);
    assert_eq!(value["num_dns_queries"], 0);
}
