use bevy_math::Vec3;
use chrono::NaiveDate;

use crate::claims::ClaimRecord;
use crate::core::{Color, PoolConfig};
use crate::grid::{CellId, GridDims};

pub fn pool() -> PoolBuilder {
    PoolBuilder {
        config: PoolConfig::default(),
    }
}

pub struct PoolBuilder {
    config: PoolConfig,
}

impl PoolBuilder {
    pub fn dims(mut self, days: u32, weight_steps: u32, hours: u32) -> Self {
        self.config.dims = GridDims::new(days, weight_steps, hours);
        self
    }

    pub fn base_date(mut self, date: NaiveDate) -> Self {
        self.config.base_date = date;
        self
    }

    /// Weight of step 0 and the increment per step.
    pub fn weights(mut self, base: f64, step: f64) -> Self {
        self.config.base_weight = base;
        self.config.weight_step = step;
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.config.spacing = spacing;
        self
    }

    pub fn cell_size(mut self, size: f32) -> Self {
        self.config.cell_size = size;
        self
    }

    pub fn background_color(mut self, c: Color) -> Self {
        self.config.background = c;
        self
    }

    pub fn owner_color(mut self, owner: impl Into<String>, c: Color) -> Self {
        self.config.palette.owners.insert(owner.into(), c);
        self
    }

    pub fn fallback_color(mut self, c: Color) -> Self {
        self.config.palette.fallback = c;
        self
    }

    pub fn claim(mut self, id: CellId, owner: impl Into<String>) -> Self {
        self.config.claims.insert(id.0, ClaimRecord::claimed_by(owner));
        self
    }

    /// Load the placeholder claims the pool ships with.
    pub fn sample_claims(mut self) -> Self {
        self.config.claims.extend(PoolConfig::sample_claims());
        self
    }

    pub fn camera(mut self, eye: Vec3, target: Vec3) -> Self {
        self.config.camera.eye = eye;
        self.config.camera.target = target;
        self
    }

    /// Get the built config without running it
    pub fn build(self) -> crate::Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Run the pool locally using Bevy (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_local(self) -> crate::Result<()> {
        let config = self.build()?;
        crate::runtime::run_pool(config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_settings() {
        let cfg = pool()
            .dims(7, 10, 24)
            .base_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .weights(6.0, 0.25)
            .claim(CellId(3), "Alice")
            .owner_color("Zoe", Color::hex(0x00ff00))
            .build()
            .unwrap();

        assert_eq!(cfg.dims.total(), 7 * 10 * 24);
        assert_eq!(cfg.claim(CellId(3)).and_then(|r| r.owner()), Some("Alice"));
        assert_eq!(cfg.palette.owner_color("Zoe"), Color::hex(0x00ff00));
        let ix = cfg.indexer();
        let info = ix.to_info(ix.to_coordinate(CellId(24)).unwrap()).unwrap();
        assert!((info.weight - 6.25).abs() < 1e-9);
    }

    #[test]
    fn sample_claims_are_in_range() {
        let cfg = pool().sample_claims().build().unwrap();
        assert_eq!(cfg.claims.len(), 8);
        assert_eq!(cfg.claim(CellId(1234)).and_then(|r| r.owner()), Some("Bob"));
    }

    #[test]
    fn build_rejects_claim_outside_grid() {
        assert!(pool().dims(1, 1, 24).claim(CellId(24), "Alice").build().is_err());
    }
}
