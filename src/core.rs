use std::collections::BTreeMap;

use bevy_math::Vec3;
use chrono::{Days, NaiveDate};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::claims::{ClaimBook, ClaimRecord, OwnerPalette};
use crate::error::BetCubeError;
use crate::grid::{CellId, CellLayout, GridDims, GridIndexer};

/// sRGB colour with alpha.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::srgba(c.r, c.g, c.b, c.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of orbit velocity removed each frame (0 = no damping)
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(30.0, 30.0, 60.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
        }
    }
}

/// Everything that shapes one betting pool: grid dimensions, display
/// constants, palette and the claims dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub dims: GridDims,
    pub base_date: NaiveDate,
    pub base_weight: f64,
    pub weight_step: f64,
    /// Distance between adjacent cell centres
    pub spacing: f32,
    /// Edge length of each cube
    pub cell_size: f32,
    pub cell_opacity: f32,
    pub background: Color,
    pub palette: OwnerPalette,
    /// Sparse: ids with no entry are unclaimed
    pub claims: BTreeMap<u32, ClaimRecord>,
    pub camera: CameraConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            dims: GridDims::default(),
            base_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default(),
            base_weight: 5.0,
            weight_step: 0.1,
            spacing: 1.2,
            cell_size: 0.5,
            cell_opacity: 0.7,
            background: Color::hex(0xf5f5fa),
            palette: OwnerPalette::default(),
            claims: BTreeMap::new(),
            camera: CameraConfig::default(),
        }
    }
}

impl PoolConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: PoolConfig =
            serde_json::from_str(json).change_context(BetCubeError::ConfigParse)?;
        config.validate()?;
        tracing::debug!(
            cells = config.dims.total(),
            claims = config.claims.len(),
            "parsed pool config"
        );
        Ok(config)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).change_context(BetCubeError::ConfigParse)
    }

    pub fn validate(&self) -> crate::Result<()> {
        let invalid = |msg: String| Report::new(BetCubeError::InvalidConfig(msg));

        let GridDims {
            days,
            weight_steps,
            hours,
        } = self.dims;
        if days == 0 || weight_steps == 0 || hours == 0 {
            return Err(invalid(format!(
                "grid dimensions must be non-zero, got {days}x{weight_steps}x{hours}"
            )));
        }
        let total = self
            .dims
            .checked_total()
            .ok_or_else(|| invalid(format!("grid {days}x{weight_steps}x{hours} is too large")))?;

        if self
            .base_date
            .checked_add_days(Days::new(u64::from(days - 1)))
            .is_none()
        {
            return Err(invalid(format!(
                "{days} days from {} run past the last representable date",
                self.base_date
            )));
        }

        let last_weight = self.base_weight + f64::from(weight_steps - 1) * self.weight_step;
        if !self.weight_step.is_finite() || self.weight_step <= 0.0 || !last_weight.is_finite() {
            return Err(invalid(format!(
                "weight must stay finite and step forward, got base {} step {}",
                self.base_weight, self.weight_step
            )));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.spacing) || !positive(self.cell_size) {
            return Err(invalid(format!(
                "spacing and cell size must be positive, got {} and {}",
                self.spacing, self.cell_size
            )));
        }
        if let Some((&id, _)) = self.claims.range(total..).next() {
            return Err(invalid(format!(
                "claim for cell {id} is outside the grid of {total} cells"
            )));
        }
        Ok(())
    }

    pub fn indexer(&self) -> GridIndexer {
        GridIndexer::new(self.dims, self.base_date, self.base_weight, self.weight_step)
    }

    pub fn layout(&self) -> CellLayout {
        CellLayout::build(&self.indexer(), self.spacing)
    }

    pub fn claim_book(&self) -> ClaimBook {
        ClaimBook::from(&self.claims)
    }

    /// The placeholder claims the pool ships with.
    pub fn sample_claims() -> BTreeMap<u32, ClaimRecord> {
        [
            (0, "Alice"),
            (1234, "Bob"),
            (10, "Ryan"),
            (500, "Mom"),
            (999, "Allison"),
            (2021, "Ryan"),
            (3500, "Mom"),
            (4000, "Allison"),
        ]
        .into_iter()
        .map(|(id, owner)| (id, ClaimRecord::claimed_by(owner)))
        .collect()
    }

    pub fn claim(&self, id: CellId) -> Option<&ClaimRecord> {
        self.claims.get(&id.0)
    }
}
