//! src/registry/mod.rs
//!
//! The winner registry: single source of truth for all winners and their
//! prize/claim ledgers, plus the memoized unclaimed-prize resolver.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::Error;
use crate::models::{Claim, ClaimSource, Prize, Winner};

/// State a cached unclaimed-prize result was computed from. Counting alone
/// cannot distinguish two claim sets of equal size, so the fingerprint also
/// hashes the covered prize-id set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedgerFingerprint {
    prize_count: usize,
    claim_count: usize,
    claimed_ids_hash: u64,
}

impl LedgerFingerprint {
    fn of(winner: &Winner) -> Self {
        // XOR of per-id hashes: order and claim grouping must not matter,
        // only which prizes are covered.
        let mut claimed_ids_hash = 0u64;
        for claim in &winner.claims {
            for prize_id in &claim.prize_ids {
                let mut hasher = DefaultHasher::new();
                prize_id.hash(&mut hasher);
                claimed_ids_hash ^= hasher.finish();
            }
        }
        Self {
            prize_count: winner.prizes.len(),
            claim_count: winner.claims.len(),
            claimed_ids_hash,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedUnclaimed {
    fingerprint: LedgerFingerprint,
    prizes: Vec<Prize>,
}

/// All winners, in insertion order. Mutations go through the record/award
/// methods so the claim-once invariant holds and the resolver cache stays
/// coherent.
pub struct WinnerRegistry {
    winners: Vec<Winner>,
    unclaimed_cache: DashMap<Uuid, CachedUnclaimed>,
}

impl WinnerRegistry {
    pub fn new() -> Self {
        Self {
            winners: Vec::new(),
            unclaimed_cache: DashMap::new(),
        }
    }

    /// Build a registry from externally supplied records (bulk load or
    /// rehydration), re-sorting each winner's ledgers by timestamp. Full
    /// replacement semantics: nothing is merged.
    pub fn from_records(mut records: Vec<Winner>) -> Self {
        for winner in &mut records {
            winner.prizes.sort_by_key(|p| p.timestamp);
            winner.claims.sort_by_key(|c| c.timestamp);
        }
        debug!("registry loaded with {} winner(s)", records.len());
        Self {
            winners: records,
            unclaimed_cache: DashMap::new(),
        }
    }

    /// Registry-order view of all winners.
    pub fn winners(&self) -> &[Winner] {
        &self.winners
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// Case-insensitive exact name match; first match in registry order when
    /// duplicates exist.
    pub fn find_by_name(&self, name: &str) -> Option<&Winner> {
        self.winners
            .iter()
            .find(|w| w.name.to_lowercase() == name.to_lowercase())
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<&Winner> {
        self.winners.iter().find(|w| w.id == id)
    }

    /// Case-insensitive substring match over all names, registry order.
    /// Drives autocomplete-style lookups.
    pub fn match_partial_name(&self, fragment: &str) -> Vec<&Winner> {
        let fragment = fragment.to_lowercase();
        let matches: Vec<&Winner> = self
            .winners
            .iter()
            .filter(|w| w.name.to_lowercase().contains(&fragment))
            .collect();
        debug!("{} winner(s) match partial name {:?}", matches.len(), fragment);
        matches
    }

    /// Unconditionally append a new winner with empty ledgers. Public so the
    /// find-then-create step inside [`award_prize`](Self::award_prize) is a
    /// visible contract rather than a hidden side effect.
    pub fn add_winner(&mut self, name: &str) -> Uuid {
        let winner = Winner {
            id: Uuid::new_v4(),
            name: name.to_string(),
            prizes: Vec::new(),
            claims: Vec::new(),
        };
        let winner_id = winner.id;
        info!("adding new winner {:?} ({winner_id})", winner.name);
        self.winners.push(winner);
        winner_id
    }

    /// Award a prize to the named winner, creating the winner first if no
    /// case-insensitive match exists. Returns the winner's id.
    pub fn award_prize(&mut self, name: &str) -> Uuid {
        let winner_id = match self.find_by_name(name) {
            Some(winner) => winner.id,
            None => self.add_winner(name),
        };
        if let Some(winner) = self.winners.iter_mut().find(|w| w.id == winner_id) {
            winner.prizes.push(Prize {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
            });
            info!(
                "prize recorded for {:?}, total prizes: {}",
                winner.name,
                winner.prizes.len()
            );
        }
        self.unclaimed_cache.remove(&winner_id);
        winner_id
    }

    /// Record one claim covering every currently-unclaimed prize of the
    /// winner. Fails without touching the ledgers when the winner is unknown
    /// or has nothing outstanding.
    pub fn record_bulk_claim(&mut self, winner_id: Uuid, source: ClaimSource) -> Result<(), Error> {
        let Some(winner) = self.find_by_id(winner_id) else {
            error!("bulk claim rejected: winner {winner_id} not found");
            return Err(Error::WinnerNotFound(winner_id));
        };

        let unclaimed = self.unclaimed_prizes(winner);
        if unclaimed.is_empty() {
            error!("bulk claim rejected: winner {winner_id} has no unclaimed prizes");
            return Err(Error::NoUnclaimedPrizes(winner_id));
        }

        let prize_ids: Vec<Uuid> = unclaimed.iter().map(|p| p.id).collect();
        info!(
            "claiming {} prize(s) for winner {winner_id} via {source}",
            prize_ids.len()
        );
        self.append_claim(winner_id, prize_ids, source);
        Ok(())
    }

    /// Record a claim covering exactly one prize. Fails without touching the
    /// ledgers when the winner or prize is unknown, or the prize is already
    /// covered by an earlier claim.
    pub fn record_single_claim(
        &mut self,
        winner_id: Uuid,
        prize_id: Uuid,
        source: ClaimSource,
    ) -> Result<(), Error> {
        let Some(winner) = self.find_by_id(winner_id) else {
            error!("single claim rejected: winner {winner_id} not found");
            return Err(Error::WinnerNotFound(winner_id));
        };
        if winner.prize(prize_id).is_none() {
            error!("single claim rejected: prize {prize_id} not found");
            return Err(Error::PrizeNotFound(prize_id));
        }
        if winner.is_claimed(prize_id) {
            error!("single claim rejected: prize {prize_id} already claimed");
            return Err(Error::AlreadyClaimed(prize_id));
        }

        info!("claiming prize {prize_id} for winner {winner_id} via {source}");
        self.append_claim(winner_id, vec![prize_id], source);
        Ok(())
    }

    /// Drop every winner, prize and claim.
    pub fn reset(&mut self) {
        info!("clearing {} winner(s)", self.winners.len());
        self.winners.clear();
        self.unclaimed_cache.clear();
    }

    /// Prizes of `winner` not covered by any claim, in prize-ledger order.
    /// Memoized per winner id; the fingerprint check recomputes whenever the
    /// ledgers changed, so stale entries can never be served.
    pub fn unclaimed_prizes(&self, winner: &Winner) -> Vec<Prize> {
        let fingerprint = LedgerFingerprint::of(winner);
        if let Some(entry) = self.unclaimed_cache.get(&winner.id) {
            if entry.fingerprint == fingerprint {
                return entry.prizes.clone();
            }
        }

        let claimed: HashSet<Uuid> = winner
            .claims
            .iter()
            .flat_map(|c| c.prize_ids.iter().copied())
            .collect();
        let unclaimed: Vec<Prize> = winner
            .prizes
            .iter()
            .filter(|p| !claimed.contains(&p.id))
            .cloned()
            .collect();
        debug!(
            "computed {} unclaimed prize(s) for {:?}",
            unclaimed.len(),
            winner.name
        );

        self.unclaimed_cache.insert(
            winner.id,
            CachedUnclaimed {
                fingerprint,
                prizes: unclaimed.clone(),
            },
        );
        unclaimed
    }

    /// Winners with at least one unclaimed prize, registry order. Drives the
    /// public display grid.
    pub fn winners_with_unclaimed(&self) -> Vec<&Winner> {
        self.winners
            .iter()
            .filter(|w| !self.unclaimed_prizes(w).is_empty())
            .collect()
    }

    fn append_claim(&mut self, winner_id: Uuid, prize_ids: Vec<Uuid>, source: ClaimSource) {
        if let Some(winner) = self.winners.iter_mut().find(|w| w.id == winner_id) {
            winner.claims.push(Claim {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                prize_ids,
                source,
            });
        }
        self.unclaimed_cache.remove(&winner_id);
    }
}

impl Default for WinnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
