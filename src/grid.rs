//! Flat cell ids <-> (day, weight step, hour) coordinates.
//!
//! Ids are assigned row-major with the day varying slowest and the hour
//! fastest: `id = day * W * H + weight_step * H + hour`. The layout and the
//! inverse mapping both depend on that order.

use bevy_math::Vec3;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::GridError;

#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct CellId(pub u32);

impl CellId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub day: u32,
    pub weight_step: u32,
    pub hour: u32,
}

impl CellCoordinate {
    pub const fn new(day: u32, weight_step: u32, hour: u32) -> Self {
        Self {
            day,
            weight_step,
            hour,
        }
    }
}

/// Display values derived from a coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellInfo {
    pub date: NaiveDate,
    /// Full precision; round only when formatting.
    pub weight: f64,
    pub hour: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDims {
    pub days: u32,
    pub weight_steps: u32,
    pub hours: u32,
}

impl Default for GridDims {
    fn default() -> Self {
        Self {
            days: 21,
            weight_steps: 50,
            hours: 24,
        }
    }
}

impl GridDims {
    pub const fn new(days: u32, weight_steps: u32, hours: u32) -> Self {
        Self {
            days,
            weight_steps,
            hours,
        }
    }

    /// Total number of cells, or `None` if it does not fit in a `u32`.
    pub fn checked_total(&self) -> Option<u32> {
        self.days
            .checked_mul(self.weight_steps)?
            .checked_mul(self.hours)
    }

    pub fn total(&self) -> u32 {
        self.days * self.weight_steps * self.hours
    }

    pub fn contains(&self, coord: CellCoordinate) -> bool {
        coord.day < self.days && coord.weight_step < self.weight_steps && coord.hour < self.hours
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridIndexer {
    dims: GridDims,
    base_date: NaiveDate,
    base_weight: f64,
    weight_step: f64,
}

impl GridIndexer {
    pub fn new(dims: GridDims, base_date: NaiveDate, base_weight: f64, weight_step: f64) -> Self {
        Self {
            dims,
            base_date,
            base_weight,
            weight_step,
        }
    }

    pub fn total(&self) -> u32 {
        self.dims.total()
    }

    pub fn to_id(&self, day: u32, weight_step: u32, hour: u32) -> Result<CellId, GridError> {
        let d = self.dims;
        if !d.contains(CellCoordinate::new(day, weight_step, hour)) {
            return Err(GridError::CoordinateOutOfRange {
                day,
                weight_step,
                hour,
                days: d.days,
                weight_steps: d.weight_steps,
                hours: d.hours,
            });
        }
        Ok(CellId(day * d.weight_steps * d.hours + weight_step * d.hours + hour))
    }

    pub fn coordinate_to_id(&self, coord: CellCoordinate) -> Result<CellId, GridError> {
        self.to_id(coord.day, coord.weight_step, coord.hour)
    }

    pub fn to_coordinate(&self, id: CellId) -> Result<CellCoordinate, GridError> {
        let total = self.total();
        if id.0 >= total {
            return Err(GridError::IdOutOfRange { id: id.0, total });
        }
        let plane = self.dims.weight_steps * self.dims.hours;
        Ok(CellCoordinate {
            day: id.0 / plane,
            weight_step: (id.0 % plane) / self.dims.hours,
            hour: id.0 % self.dims.hours,
        })
    }

    pub fn to_info(&self, coord: CellCoordinate) -> Result<CellInfo, GridError> {
        let date = self
            .base_date
            .checked_add_days(Days::new(u64::from(coord.day)))
            .ok_or(GridError::DateOutOfRange {
                base: self.base_date,
                day: coord.day,
            })?;
        Ok(CellInfo {
            date,
            weight: self.base_weight + f64::from(coord.weight_step) * self.weight_step,
            hour: coord.hour,
        })
    }

    /// Every cell in id order (day -> weight step -> hour), paired with its
    /// running id.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, CellCoordinate)> + '_ {
        let GridDims {
            days,
            weight_steps,
            hours,
        } = self.dims;
        (0..days)
            .flat_map(move |day| {
                (0..weight_steps).flat_map(move |w| {
                    (0..hours).map(move |hour| CellCoordinate::new(day, w, hour))
                })
            })
            .enumerate()
            .map(|(i, coord)| (CellId(i as u32), coord))
    }
}

/// World-space centre of every cell, indexed by `CellId`.
#[derive(Clone, Debug, Default)]
pub struct CellLayout {
    positions: Vec<Vec3>,
}

impl CellLayout {
    pub fn build(indexer: &GridIndexer, spacing: f32) -> Self {
        let mut positions = Vec::with_capacity(indexer.total() as usize);
        for (id, coord) in indexer.cells() {
            debug_assert_eq!(id.index(), positions.len());
            positions.push(Self::position_of(coord, spacing));
        }
        Self { positions }
    }

    #[inline]
    pub fn position_of(coord: CellCoordinate, spacing: f32) -> Vec3 {
        Vec3::new(
            coord.day as f32,
            coord.weight_step as f32,
            coord.hour as f32,
        ) * spacing
    }

    pub fn position(&self, id: CellId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, Vec3)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (CellId(i as u32), *p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn indexer() -> GridIndexer {
        GridIndexer::new(
            GridDims::default(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            5.0,
            0.1,
        )
    }

    #[test]
    fn round_trips_every_id() {
        let ix = indexer();
        for i in 0..ix.total() {
            let coord = ix.to_coordinate(CellId(i)).unwrap();
            assert_eq!(ix.coordinate_to_id(coord).unwrap(), CellId(i));
        }
    }

    #[test]
    fn enumeration_covers_range_without_gaps() {
        let ix = indexer();
        let mut seen = HashSet::new();
        for (id, coord) in ix.cells() {
            assert!(seen.insert(id), "duplicate id {id}");
            assert_eq!(ix.coordinate_to_id(coord).unwrap(), id);
        }
        assert_eq!(seen.len(), 21 * 50 * 24);
        assert!((0..ix.total()).all(|i| seen.contains(&CellId(i))));
    }

    #[test]
    fn boundaries() {
        let ix = indexer();
        assert_eq!(
            ix.to_coordinate(CellId(0)).unwrap(),
            CellCoordinate::new(0, 0, 0)
        );
        assert_eq!(
            ix.to_coordinate(CellId(ix.total() - 1)).unwrap(),
            CellCoordinate::new(20, 49, 23)
        );
    }

    #[test]
    fn hour_varies_fastest() {
        let ix = indexer();
        assert_eq!(ix.to_id(0, 0, 1).unwrap(), CellId(1));
        assert_eq!(ix.to_id(0, 1, 0).unwrap(), CellId(24));
        assert_eq!(ix.to_id(1, 0, 0).unwrap(), CellId(1200));
    }

    #[test]
    fn rejects_out_of_range() {
        let ix = indexer();
        assert_eq!(
            ix.to_coordinate(CellId(25_200)),
            Err(GridError::IdOutOfRange {
                id: 25_200,
                total: 25_200
            })
        );
        assert!(matches!(
            ix.to_id(21, 0, 0),
            Err(GridError::CoordinateOutOfRange { day: 21, .. })
        ));
        assert!(ix.to_id(0, 50, 0).is_err());
        assert!(ix.to_id(0, 0, 24).is_err());
    }

    #[test]
    fn dates_offset_from_base() {
        let ix = indexer();
        let first = ix.to_info(ix.to_coordinate(CellId(0)).unwrap()).unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());

        let day20 = ix.to_id(20, 0, 0).unwrap();
        let info = ix.to_info(ix.to_coordinate(day20).unwrap()).unwrap();
        assert_eq!(info.date, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
    }

    #[test]
    fn weights_scale_linearly() {
        let ix = indexer();
        let lo = ix.to_info(CellCoordinate::new(0, 0, 0)).unwrap();
        let hi = ix.to_info(CellCoordinate::new(0, 49, 0)).unwrap();
        assert!((lo.weight - 5.0).abs() < 1e-9);
        assert!((hi.weight - 9.9).abs() < 1e-9);
        assert_eq!(format!("{:.1}", hi.weight), "9.9");
        for step in 0..50 {
            let w = ix.to_info(CellCoordinate::new(0, step, 0)).unwrap().weight;
            assert_eq!(format!("{:.1}", w), format!("{:.1}", 5.0 + step as f64 / 10.0));
        }
    }

    #[test]
    fn unrepresentable_date_is_an_error() {
        let ix = GridIndexer::new(GridDims::default(), NaiveDate::MAX, 5.0, 0.1);
        assert!(ix.to_info(ix.to_coordinate(CellId(0)).unwrap()).is_ok());
        let day1 = ix.to_coordinate(CellId(1200)).unwrap();
        assert_eq!(
            ix.to_info(day1),
            Err(GridError::DateOutOfRange {
                base: NaiveDate::MAX,
                day: 1
            })
        );
    }

    #[test]
    fn layout_follows_id_order() {
        let ix = indexer();
        let layout = CellLayout::build(&ix, 1.2);
        assert_eq!(layout.len(), 25_200);
        assert_eq!(layout.position(CellId(0)), Some(Vec3::ZERO));
        let id = ix.to_id(2, 3, 4).unwrap();
        let p = layout.position(id).unwrap();
        assert!((p - Vec3::new(2.4, 3.6, 4.8)).length() < 1e-5);
        assert_eq!(layout.position(CellId(25_200)), None);
    }

    #[test]
    fn checked_total_detects_overflow() {
        assert_eq!(GridDims::default().checked_total(), Some(25_200));
        assert_eq!(GridDims::new(u32::MAX, 2, 1).checked_total(), None);
    }
}
