//! src/services/raffle_service.rs
//!
//! The persistence bridge: owns the registry plus an injected storage port,
//! loads on construction, and writes the whole registry back after every
//! mutation. This is the surface the presentation layer talks to.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::display::StatusFilter;
use crate::error::Error;
use crate::metrics::{self, HistogramBand, MetricsSummary, TimeSeriesPoint};
use crate::models::{ClaimSource, Prize, Winner};
use crate::registry::WinnerRegistry;
use crate::storage::ProfileStore;

/// The single key all registry state lives under.
pub const STORAGE_KEY: &str = "raffleWinners";

pub struct RaffleService<S: ProfileStore> {
    store: S,
    registry: WinnerRegistry,
}

impl<S: ProfileStore> RaffleService<S> {
    /// Load the registry from the store. An absent key starts empty; a value
    /// that fails to parse is logged and also starts empty — corrupt
    /// persisted state is recoverable, never fatal.
    pub fn load(store: S) -> Result<Self, Error> {
        let registry = match store.get(STORAGE_KEY)? {
            None => WinnerRegistry::new(),
            Some(text) => match serde_json::from_str::<Vec<Winner>>(&text) {
                Ok(records) => WinnerRegistry::from_records(records),
                Err(e) => {
                    warn!("stored winner data failed to parse, starting empty: {e}");
                    WinnerRegistry::new()
                }
            },
        };
        Ok(Self { store, registry })
    }

    /// Award a prize to the named winner (created on first award) and
    /// persist. Returns the winner's id.
    pub fn award_prize(&mut self, name: &str) -> Result<Uuid, Error> {
        let winner_id = self.registry.award_prize(name);
        self.persist()?;
        Ok(winner_id)
    }

    /// Claim every outstanding prize of the winner and persist. A failed
    /// claim writes nothing.
    pub fn record_bulk_claim(&mut self, winner_id: Uuid, source: ClaimSource) -> Result<(), Error> {
        self.registry.record_bulk_claim(winner_id, source)?;
        self.persist()
    }

    /// Claim one specific prize and persist. A failed claim writes nothing.
    pub fn record_single_claim(
        &mut self,
        winner_id: Uuid,
        prize_id: Uuid,
        source: ClaimSource,
    ) -> Result<(), Error> {
        self.registry.record_single_claim(winner_id, prize_id, source)?;
        self.persist()
    }

    /// Drop everything. Writes the literal `[]` rather than going through
    /// the general serialize path, so the on-disk empty state is always the
    /// same bytes.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.registry.reset();
        self.store.put(STORAGE_KEY, "[]")
    }

    /// Replace the whole registry with externally supplied JSON and persist.
    /// Text that fails to parse leaves both the in-memory registry and the
    /// stored value untouched. Confirming the overwrite of pre-existing
    /// winners is the caller's concern.
    pub fn import_json(&mut self, text: &str) -> Result<(), Error> {
        let records: Vec<Winner> =
            serde_json::from_str(text).map_err(Error::MalformedImport)?;
        info!("replacing registry with {} imported winner(s)", records.len());
        self.registry = WinnerRegistry::from_records(records);
        self.persist()
    }

    /// Serialize the registry in the import/persistence wire shape.
    pub fn export_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self.registry.winners())?)
    }

    /// `raffle-winners-<YYYY-MM-DD>.json` for the given export date.
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("raffle-winners-{}.json", date.format("%Y-%m-%d"))
    }

    // ------------------------------------------------------------------
    // Query pass-throughs consumed by the presentation layer.
    // ------------------------------------------------------------------

    pub fn registry(&self) -> &WinnerRegistry {
        &self.registry
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Winner> {
        self.registry.find_by_id(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Winner> {
        self.registry.find_by_name(name)
    }

    pub fn match_partial_name(&self, fragment: &str) -> Vec<&Winner> {
        self.registry.match_partial_name(fragment)
    }

    pub fn unclaimed_prizes(&self, winner: &Winner) -> Vec<Prize> {
        self.registry.unclaimed_prizes(winner)
    }

    /// Winners still owed something, in registry order. Drives the public
    /// display.
    pub fn outstanding_winners(&self) -> Vec<&Winner> {
        self.registry.winners_with_unclaimed()
    }

    /// Status-filtered listing for the admin table.
    pub fn list_winners(&self, filter: StatusFilter) -> Vec<&Winner> {
        crate::display::filter_by_status(self.registry.winners(), filter)
    }

    pub fn metrics_summary(&self) -> MetricsSummary {
        MetricsSummary::collect(&self.registry)
    }

    pub fn time_series(&self) -> Vec<TimeSeriesPoint> {
        metrics::cumulative_time_series(&self.registry)
    }

    pub fn histogram(&self) -> Vec<HistogramBand> {
        metrics::time_to_claim_histogram(&self.registry)
    }

    fn persist(&self) -> Result<(), Error> {
        let serialized = serde_json::to_string(self.registry.winners())?;
        self.store.put(STORAGE_KEY, &serialized)
    }
}
