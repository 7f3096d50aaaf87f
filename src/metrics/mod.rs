//! src/metrics/mod.rs
//!
//! Pure aggregation over a registry snapshot: counters, claim rates,
//! time-to-claim statistics and the cumulative time series behind the
//! dashboard charts. Nothing here mutates or caches; the registry is small
//! enough to recompute per query.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::ClaimSource;
use crate::registry::WinnerRegistry;

/// Width of one time-series bucket.
const BUCKET_MINUTES: i64 = 5;

/// Bands of the time-to-claim distribution chart, in minutes.
const HISTOGRAM_BANDS: [(&str, f64, f64); 7] = [
    ("0-5min", 0.0, 5.0),
    ("5-15min", 5.0, 15.0),
    ("15-30min", 15.0, 30.0),
    ("30-60min", 30.0, 60.0),
    ("1-2h", 60.0, 120.0),
    ("2-4h", 120.0, 240.0),
    ("4h+", 240.0, f64::INFINITY),
];

/// Total prizes awarded, across all winners.
pub fn total_prizes(registry: &WinnerRegistry) -> usize {
    registry.winners().iter().map(|w| w.prizes.len()).sum()
}

/// Total prizes claimed. Counts individual prize ids across claims, not
/// claim records: one claim covering three prizes contributes three.
pub fn total_claims(registry: &WinnerRegistry) -> usize {
    registry
        .winners()
        .iter()
        .flat_map(|w| &w.claims)
        .map(|c| c.prize_ids.len())
        .sum()
}

/// Total prizes not yet covered by any claim.
pub fn total_unclaimed(registry: &WinnerRegistry) -> usize {
    registry
        .winners()
        .iter()
        .map(|w| registry.unclaimed_prizes(w).len())
        .sum()
}

/// Number of winner records. Names are not deduplicated; two winners sharing
/// a name count twice.
pub fn unique_winners(registry: &WinnerRegistry) -> usize {
    registry.winners().len()
}

/// Claimed share of all prizes, as a percentage. Zero when nothing has been
/// awarded yet.
pub fn claim_rate(registry: &WinnerRegistry) -> f64 {
    let prizes = total_prizes(registry);
    if prizes == 0 {
        return 0.0;
    }
    total_claims(registry) as f64 / prizes as f64 * 100.0
}

/// Prize-claim counts per source channel. Both sources are always present in
/// the map, so callers can index without a fallback.
pub fn claims_by_source(registry: &WinnerRegistry) -> HashMap<ClaimSource, usize> {
    let mut counts = HashMap::from([(ClaimSource::Display, 0), (ClaimSource::Admin, 0)]);
    for claim in registry.winners().iter().flat_map(|w| &w.claims) {
        *counts.entry(claim.source).or_insert(0) += claim.prize_ids.len();
    }
    counts
}

/// Minutes between each claimed prize and the claim covering it, over every
/// (prize, claim) pair. Claimed ids missing from the prize ledger are
/// skipped; they can only occur in hand-built data.
fn claim_times_minutes(registry: &WinnerRegistry) -> Vec<f64> {
    let mut times = Vec::new();
    for winner in registry.winners() {
        for claim in &winner.claims {
            for prize_id in &claim.prize_ids {
                if let Some(prize) = winner.prize(*prize_id) {
                    let elapsed = claim.timestamp.signed_duration_since(prize.timestamp);
                    times.push(elapsed.num_milliseconds() as f64 / 60_000.0);
                }
            }
        }
    }
    times
}

/// Mean time to claim in minutes; zero when no claims exist.
pub fn average_time_to_claim(registry: &WinnerRegistry) -> f64 {
    let times = claim_times_minutes(registry);
    if times.is_empty() {
        return 0.0;
    }
    times.iter().sum::<f64>() / times.len() as f64
}

/// Median time to claim in minutes; even-count lists average the middle two.
/// Zero when no claims exist.
pub fn median_time_to_claim(registry: &WinnerRegistry) -> f64 {
    let mut times = claim_times_minutes(registry);
    if times.is_empty() {
        return 0.0;
    }
    times.sort_by(f64::total_cmp);
    let mid = times.len() / 2;
    if times.len() % 2 == 0 {
        (times[mid - 1] + times[mid]) / 2.0
    } else {
        times[mid]
    }
}

/// Shortest time to claim in minutes. `None` when no claims exist — the
/// dashboard shows "N/A" here, distinct from the zero default of the
/// average/median counters.
pub fn fastest_claim_time(registry: &WinnerRegistry) -> Option<f64> {
    claim_times_minutes(registry).into_iter().reduce(f64::min)
}

/// Longest time to claim in minutes; `None` when no claims exist.
pub fn slowest_claim_time(registry: &WinnerRegistry) -> Option<f64> {
    claim_times_minutes(registry).into_iter().reduce(f64::max)
}

/// One point of the cumulative prizes/claims series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    /// Start of the 5-minute bucket.
    pub timestamp: DateTime<Utc>,
    /// Prizes awarded up to the end of this bucket.
    pub prizes: usize,
    /// Prizes claimed up to the end of this bucket.
    pub claims: usize,
}

/// Bucket every award event and every individual prize-claim event into
/// fixed 5-minute intervals spanning earliest to latest, with running totals
/// per bucket. Empty when there are no events at all.
pub fn cumulative_time_series(registry: &WinnerRegistry) -> Vec<TimeSeriesPoint> {
    let mut prize_events: Vec<DateTime<Utc>> = Vec::new();
    let mut claim_events: Vec<DateTime<Utc>> = Vec::new();
    for winner in registry.winners() {
        prize_events.extend(winner.prizes.iter().map(|p| p.timestamp));
        for claim in &winner.claims {
            // Each covered prize id is its own claim event.
            claim_events.extend(std::iter::repeat_n(claim.timestamp, claim.prize_ids.len()));
        }
    }

    let Some(earliest) = prize_events.iter().chain(&claim_events).min().copied() else {
        return Vec::new();
    };
    let Some(latest) = prize_events.iter().chain(&claim_events).max().copied() else {
        return Vec::new();
    };
    prize_events.sort();
    claim_events.sort();

    let mut points = Vec::new();
    let mut prizes_so_far = 0;
    let mut claims_so_far = 0;
    let mut bucket = earliest;
    while bucket <= latest {
        let bucket_end = bucket + Duration::minutes(BUCKET_MINUTES);
        while prizes_so_far < prize_events.len() && prize_events[prizes_so_far] < bucket_end {
            prizes_so_far += 1;
        }
        while claims_so_far < claim_events.len() && claim_events[claims_so_far] < bucket_end {
            claims_so_far += 1;
        }
        points.push(TimeSeriesPoint {
            timestamp: bucket,
            prizes: prizes_so_far,
            claims: claims_so_far,
        });
        bucket = bucket_end;
    }
    points
}

/// One band of the time-to-claim distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBand {
    pub label: &'static str,
    pub count: usize,
}

/// Time-to-claim distribution over fixed bands (0-5min up to 4h+), in band
/// order. Negative times from hand-built data fall into no band, matching
/// the dashboard chart.
pub fn time_to_claim_histogram(registry: &WinnerRegistry) -> Vec<HistogramBand> {
    let times = claim_times_minutes(registry);
    HISTOGRAM_BANDS
        .iter()
        .map(|&(label, min, max)| HistogramBand {
            label,
            count: times.iter().filter(|&&t| t >= min && t < max).count(),
        })
        .collect()
}

/// Render a minute value the way the dashboard counters do: seconds under a
/// minute, whole minutes under an hour, hours and minutes beyond that, and
/// "N/A" for the no-data sentinel.
pub fn format_minutes(minutes: Option<f64>) -> String {
    let Some(minutes) = minutes else {
        return "N/A".to_string();
    };
    if minutes < 1.0 {
        format!("{} seconds", (minutes * 60.0).round() as i64)
    } else if minutes < 60.0 {
        format!("{} minutes", minutes.round() as i64)
    } else {
        let hours = (minutes / 60.0).floor() as i64;
        let rem = (minutes % 60.0).round() as i64;
        format!("{}h {}m", hours, rem)
    }
}

/// Every scalar counter of the metrics dashboard in one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_prizes: usize,
    pub total_claims: usize,
    pub total_unclaimed: usize,
    pub unique_winners: usize,
    pub claim_rate: f64,
    pub claims_by_source: HashMap<ClaimSource, usize>,
    pub average_time_to_claim: f64,
    pub median_time_to_claim: f64,
    pub fastest_claim_time: Option<f64>,
    pub slowest_claim_time: Option<f64>,
}

impl MetricsSummary {
    pub fn collect(registry: &WinnerRegistry) -> Self {
        Self {
            total_prizes: total_prizes(registry),
            total_claims: total_claims(registry),
            total_unclaimed: total_unclaimed(registry),
            unique_winners: unique_winners(registry),
            claim_rate: claim_rate(registry),
            claims_by_source: claims_by_source(registry),
            average_time_to_claim: average_time_to_claim(registry),
            median_time_to_claim: median_time_to_claim(registry),
            fastest_claim_time: fastest_claim_time(registry),
            slowest_claim_time: slowest_claim_time(registry),
        }
    }
}
