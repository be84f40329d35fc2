//! Claims snapshot and the owner colour policy.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::grid::CellId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claimed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

static UNCLAIMED: ClaimRecord = ClaimRecord {
    claimed: false,
    owner: None,
};

impl ClaimRecord {
    pub fn claimed_by(owner: impl Into<String>) -> Self {
        Self {
            claimed: true,
            owner: Some(owner.into()),
        }
    }

    /// Owner of a live claim. A record marked claimed without a name has no owner.
    pub fn owner(&self) -> Option<&str> {
        if self.claimed {
            self.owner.as_deref()
        } else {
            None
        }
    }
}

/// Immutable claims snapshot. Cloning shares the same map; edits produce a
/// new snapshot, so readers never observe a half-applied update.
#[derive(Clone, Debug, Default)]
pub struct ClaimBook(Arc<HashMap<CellId, ClaimRecord>>);

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never fails: ids without a record (including ids outside the grid)
    /// read as unclaimed.
    pub fn lookup(&self, id: CellId) -> &ClaimRecord {
        self.0.get(&id).unwrap_or(&UNCLAIMED)
    }

    pub fn with_claim(&self, id: CellId, record: ClaimRecord) -> Self {
        let mut next = (*self.0).clone();
        next.insert(id, record);
        tracing::debug!(%id, claims = next.len(), "claims snapshot replaced");
        Self(Arc::new(next))
    }

    pub fn without_claim(&self, id: CellId) -> Self {
        let mut next = (*self.0).clone();
        next.remove(&id);
        tracing::debug!(%id, claims = next.len(), "claims snapshot replaced");
        Self(Arc::new(next))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both handles point at the same snapshot.
    pub fn same_snapshot(&self, other: &ClaimBook) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FromIterator<(CellId, ClaimRecord)> for ClaimBook {
    fn from_iter<I: IntoIterator<Item = (CellId, ClaimRecord)>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl From<&BTreeMap<u32, ClaimRecord>> for ClaimBook {
    fn from(map: &BTreeMap<u32, ClaimRecord>) -> Self {
        map.iter().map(|(id, r)| (CellId(*id), r.clone())).collect()
    }
}

/// Owner -> colour mapping.
///
/// Unknown owners get `fallback` instead of an error; unclaimed cells (and
/// claims with no owner name) get `unclaimed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerPalette {
    pub owners: BTreeMap<String, Color>,
    pub fallback: Color,
    pub unclaimed: Color,
}

impl Default for OwnerPalette {
    fn default() -> Self {
        let owners = [
            ("Alice", 0x2196f3),
            ("Bob", 0x43ea4a),
            ("Ryan", 0xffa500),
            ("Mom", 0xff4081),
            ("Allison", 0xba68c8),
        ]
        .into_iter()
        .map(|(name, hex)| (name.to_string(), Color::hex(hex)))
        .collect();

        Self {
            owners,
            fallback: Color::hex(0x2196f3),
            unclaimed: Color::hex(0xbbbbbb),
        }
    }
}

impl OwnerPalette {
    pub fn owner_color(&self, owner: &str) -> Color {
        self.owners.get(owner).copied().unwrap_or(self.fallback)
    }

    pub fn color_for(&self, record: &ClaimRecord) -> Color {
        match record.owner() {
            Some(owner) => self.owner_color(owner),
            None => self.unclaimed,
        }
    }
}
