// src/models/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single raffle item won at a point in time. Immutable once created;
/// whether it has been claimed is derived from the owning winner's claim
/// ledger, never stored on the prize itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Channel through which a claim was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimSource {
    /// Claimed by tapping a card on the public display.
    Display,
    /// Claimed from the admin console.
    Admin,
}

impl std::fmt::Display for ClaimSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimSource::Display => write!(f, "DISPLAY"),
            ClaimSource::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for ClaimSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "display" => Ok(ClaimSource::Display),
            "admin" => Ok(ClaimSource::Admin),
            _ => Err(format!("Unknown claim source: {}", s)),
        }
    }
}

/// A record that one or more prizes were collected. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Non-empty; each id may be covered by at most one claim across the
    /// owning winner's whole ledger.
    pub prize_ids: Vec<Uuid>,
    pub source: ClaimSource,
}

/// One raffle winner with their prize and claim ledgers. Both ledgers are
/// append-only and kept in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub id: Uuid,
    /// Free-text display name. Uniqueness is by convention only: awarding
    /// matches case-insensitively, but bulk loads may introduce duplicates.
    pub name: String,
    pub prizes: Vec<Prize>,
    pub claims: Vec<Claim>,
}

impl Winner {
    pub fn prize(&self, prize_id: Uuid) -> Option<&Prize> {
        self.prizes.iter().find(|p| p.id == prize_id)
    }

    /// Whether any claim already covers the given prize id.
    pub fn is_claimed(&self, prize_id: Uuid) -> bool {
        self.claims.iter().any(|c| c.prize_ids.contains(&prize_id))
    }

    /// Status shown on the admin table: true while prizes outnumber the
    /// prize ids covered by claims.
    pub fn has_unclaimed(&self) -> bool {
        let covered: usize = self.claims.iter().map(|c| c.prize_ids.len()).sum();
        self.prizes.len() > covered
    }
}
