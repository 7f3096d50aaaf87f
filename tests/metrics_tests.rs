// tests/metrics_tests.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use raffleboard::metrics::{
    average_time_to_claim, claim_rate, claims_by_source, cumulative_time_series,
    fastest_claim_time, format_minutes, median_time_to_claim, slowest_claim_time,
    time_to_claim_histogram, total_claims, total_prizes, total_unclaimed, unique_winners,
    MetricsSummary,
};
use raffleboard::models::{Claim, ClaimSource, Prize, Winner};
use raffleboard::registry::WinnerRegistry;
use raffleboard::Error;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
}

fn prize_at(timestamp: DateTime<Utc>) -> Prize {
    Prize {
        id: Uuid::new_v4(),
        timestamp,
    }
}

/// Winner whose prizes sit at the given minute offsets, each claimed
/// `claim_after` minutes later through its own claim.
fn winner_with_claims(
    name: &str,
    prize_offsets: &[i64],
    claim_after: i64,
    source: ClaimSource,
) -> Winner {
    let prizes: Vec<Prize> = prize_offsets
        .iter()
        .map(|&m| prize_at(t0() + Duration::minutes(m)))
        .collect();
    let claims: Vec<Claim> = prizes
        .iter()
        .map(|p| Claim {
            id: Uuid::new_v4(),
            timestamp: p.timestamp + Duration::minutes(claim_after),
            prize_ids: vec![p.id],
            source,
        })
        .collect();
    Winner {
        id: Uuid::new_v4(),
        name: name.to_string(),
        prizes,
        claims,
    }
}

#[test]
fn alice_scenario_counts_and_sources() -> Result<(), Error> {
    // 1) Alice starts with two prizes and no claims
    let mut registry = WinnerRegistry::from_records(vec![Winner {
        id: Uuid::new_v4(),
        name: "Alice".to_string(),
        prizes: vec![prize_at(t0()), prize_at(t0() + Duration::minutes(1))],
        claims: vec![],
    }]);

    // 2) a third award shows up in the unclaimed set
    let alice_id = registry.award_prize("Alice");
    let alice = registry.find_by_id(alice_id).unwrap();
    assert_eq!(registry.unclaimed_prizes(alice).len(), 3);

    // 3) bulk claim from the display covers all three
    registry.record_bulk_claim(alice_id, ClaimSource::Display)?;
    let alice = registry.find_by_id(alice_id).unwrap();
    assert!(registry.unclaimed_prizes(alice).is_empty());

    assert_eq!(total_prizes(&registry), 3);
    assert_eq!(total_claims(&registry), 3);
    assert_eq!(total_unclaimed(&registry), 0);
    assert_eq!(unique_winners(&registry), 1);

    let by_source = claims_by_source(&registry);
    assert_eq!(by_source[&ClaimSource::Display], 3);
    assert_eq!(by_source[&ClaimSource::Admin], 0);
    Ok(())
}

#[test]
fn single_pair_statistics_all_agree() {
    // prize at t=0, claimed 10 minutes later
    let registry = WinnerRegistry::from_records(vec![winner_with_claims(
        "Sam",
        &[0],
        10,
        ClaimSource::Admin,
    )]);

    assert_eq!(average_time_to_claim(&registry), 10.0);
    assert_eq!(median_time_to_claim(&registry), 10.0);
    assert_eq!(fastest_claim_time(&registry), Some(10.0));
    assert_eq!(slowest_claim_time(&registry), Some(10.0));
}

#[test]
fn empty_registry_uses_sentinels_not_zeros() {
    let registry = WinnerRegistry::new();

    assert_eq!(claim_rate(&registry), 0.0);
    assert_eq!(average_time_to_claim(&registry), 0.0);
    assert_eq!(median_time_to_claim(&registry), 0.0);
    // fastest/slowest are "no data", which is not the same as zero
    assert_eq!(fastest_claim_time(&registry), None);
    assert_eq!(slowest_claim_time(&registry), None);
    assert!(cumulative_time_series(&registry).is_empty());

    let summary = MetricsSummary::collect(&registry);
    assert_eq!(summary.total_prizes, 0);
    assert_eq!(summary.unique_winners, 0);
    assert_eq!(summary.fastest_claim_time, None);
}

#[test]
fn claim_rate_counts_prize_claims_over_prizes() {
    // four prizes, two of them claimed
    let mut winner = winner_with_claims("Sam", &[0, 5], 10, ClaimSource::Display);
    winner.prizes.push(prize_at(t0() + Duration::minutes(20)));
    winner.prizes.push(prize_at(t0() + Duration::minutes(25)));
    let registry = WinnerRegistry::from_records(vec![winner]);

    assert_eq!(total_prizes(&registry), 4);
    assert_eq!(total_claims(&registry), 2);
    assert_eq!(total_unclaimed(&registry), 2);
    assert_eq!(claim_rate(&registry), 50.0);
}

#[test]
fn median_averages_the_middle_pair_for_even_counts() {
    // times to claim: 5, 10, 20, 40 minutes -> median (10 + 20) / 2
    let winners = vec![
        winner_with_claims("A", &[0], 5, ClaimSource::Admin),
        winner_with_claims("B", &[0], 10, ClaimSource::Admin),
        winner_with_claims("C", &[0], 20, ClaimSource::Admin),
        winner_with_claims("D", &[0], 40, ClaimSource::Admin),
    ];
    let registry = WinnerRegistry::from_records(winners);

    assert_eq!(median_time_to_claim(&registry), 15.0);
    assert_eq!(fastest_claim_time(&registry), Some(5.0));
    assert_eq!(slowest_claim_time(&registry), Some(40.0));
    assert_eq!(average_time_to_claim(&registry), 18.75);
}

#[test]
fn cumulative_series_buckets_and_running_totals() {
    // prizes at 0 and 7 minutes, both claimed at 12 minutes by one claim
    let a = prize_at(t0());
    let b = prize_at(t0() + Duration::minutes(7));
    let claim = Claim {
        id: Uuid::new_v4(),
        timestamp: t0() + Duration::minutes(12),
        prize_ids: vec![a.id, b.id],
        source: ClaimSource::Display,
    };
    let registry = WinnerRegistry::from_records(vec![Winner {
        id: Uuid::new_v4(),
        name: "Sam".to_string(),
        prizes: vec![a, b],
        claims: vec![claim],
    }]);

    let series = cumulative_time_series(&registry);
    // spans 0..=12 minutes in 5-minute buckets: [0,5), [5,10), [10,15)
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].timestamp, t0());

    assert_eq!(series[0].prizes, 1);
    assert_eq!(series[0].claims, 0);
    assert_eq!(series[1].prizes, 2);
    assert_eq!(series[1].claims, 0);
    // the one claim record covers two prizes, so it counts twice
    assert_eq!(series[2].prizes, 2);
    assert_eq!(series[2].claims, 2);
}

#[test]
fn histogram_assigns_band_edges_to_the_higher_band() {
    // 4, 5, 30 and 300 minutes to claim
    let winners = vec![
        winner_with_claims("A", &[0], 4, ClaimSource::Admin),
        winner_with_claims("B", &[0], 5, ClaimSource::Admin),
        winner_with_claims("C", &[0], 30, ClaimSource::Admin),
        winner_with_claims("D", &[0], 300, ClaimSource::Admin),
    ];
    let registry = WinnerRegistry::from_records(winners);

    let bands = time_to_claim_histogram(&registry);
    let count_for = |label: &str| bands.iter().find(|b| b.label == label).unwrap().count;

    assert_eq!(count_for("0-5min"), 1);
    assert_eq!(count_for("5-15min"), 1);
    assert_eq!(count_for("15-30min"), 0);
    assert_eq!(count_for("30-60min"), 1);
    assert_eq!(count_for("4h+"), 1);
}

#[test]
fn format_minutes_matches_the_dashboard() {
    assert_eq!(format_minutes(None), "N/A");
    assert_eq!(format_minutes(Some(0.5)), "30 seconds");
    assert_eq!(format_minutes(Some(10.4)), "10 minutes");
    assert_eq!(format_minutes(Some(59.4)), "59 minutes");
    assert_eq!(format_minutes(Some(90.0)), "1h 30m");
    assert_eq!(format_minutes(Some(245.0)), "4h 5m");
}
