//! src/display.rs
//!
//! Presentation-adjacent helpers with real rules in them: the public
//! display's grid bucketing and the admin table's claim-status filter.

use crate::models::Winner;

/// Cards per row on the public display, bucketed by how many winners exist.
/// Fed by the total winner count, not the outstanding count — the original
/// display sizes its grid before filtering, and that quirk is kept.
pub fn grid_columns(winner_count: usize) -> u8 {
    match winner_count {
        0..=3 => 1,
        4..=6 => 2,
        7..=12 => 3,
        _ => 4,
    }
}

/// Claim-status filter applied to admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    All,
    AllClaimed,
    HasUnclaimed,
}

/// Winners passing the filter, registry order preserved.
pub fn filter_by_status(winners: &[Winner], filter: StatusFilter) -> Vec<&Winner> {
    winners
        .iter()
        .filter(|w| match filter {
            StatusFilter::All => true,
            StatusFilter::AllClaimed => !w.has_unclaimed(),
            StatusFilter::HasUnclaimed => w.has_unclaimed(),
        })
        .collect()
}
