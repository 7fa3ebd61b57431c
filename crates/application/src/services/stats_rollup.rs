//! Pure conversions from hourly unit counters to report series. Kept free of
//! locks and I/O so the grouping arithmetic is testable on its own.

use tally_dns_domain::{FilterResult, StatsReport, TimeUnits, UnitCounters, UnitId};

pub const UNITS_PER_DAY: usize = 24;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// One report entry per hourly unit, oldest first. No cross-unit grouping.
pub fn hourly_report(units: &[UnitCounters]) -> StatsReport {
    let mut report = summarize(units);
    report.time_units = TimeUnits::Hours;

    for unit in units {
        report.dns_queries.push(unit.total);
        report
            .blocked_filtering
            .push(unit.result_count(FilterResult::Filtered));
        report
            .replaced_safebrowsing
            .push(unit.result_count(FilterResult::SafeBrowsing));
        report
            .replaced_parental
            .push(unit.result_count(FilterResult::Parental));
    }

    report
}

/// Folds hourly units into whole days.
///
/// `current_id % 24` hours of today are already covered, so the head of
/// `units` carries `24 - that` entries of day-alignment padding (the tail of
/// the day before the window). Those are dropped; the rest groups into runs
/// of 24, the last run being today's partial day.
pub fn daily_report(units: &[UnitCounters], current_id: UnitId) -> StatsReport {
    let hours_in_today = current_id as usize % UNITS_PER_DAY;
    let discard = UNITS_PER_DAY - hours_in_today;
    let aligned = units.get(discard..).unwrap_or(&[]);

    let mut report = summarize(aligned);
    report.time_units = TimeUnits::Days;

    for day in aligned.chunks(UNITS_PER_DAY) {
        let mut queries = 0u64;
        let mut filtered = 0u64;
        let mut safebrowsing = 0u64;
        let mut parental = 0u64;

        for unit in day {
            queries += unit.total;
            filtered += unit.result_count(FilterResult::Filtered);
            safebrowsing += unit.result_count(FilterResult::SafeBrowsing);
            parental += unit.result_count(FilterResult::Parental);
        }

        report.dns_queries.push(queries);
        report.blocked_filtering.push(filtered);
        report.replaced_safebrowsing.push(safebrowsing);
        report.replaced_parental.push(parental);
    }

    report
}

/// Window-wide aggregates shared by both granularities.
fn summarize(units: &[UnitCounters]) -> StatsReport {
    let mut report = StatsReport::default();
    let mut elapsed_sum = 0u64;

    for unit in units {
        report.num_dns_queries += unit.total;
        report.num_blocked_filtering += unit.result_count(FilterResult::Filtered);
        report.num_replaced_safebrowsing += unit.result_count(FilterResult::SafeBrowsing);
        report.num_replaced_safesearch += unit.result_count(FilterResult::SafeSearch);
        report.num_replaced_parental += unit.result_count(FilterResult::Parental);
        elapsed_sum += unit.elapsed_sum_micros;
    }

    if report.num_dns_queries > 0 {
        report.avg_processing_time =
            elapsed_sum as f64 / report.num_dns_queries as f64 / MICROS_PER_SECOND;
    }

    report
}
