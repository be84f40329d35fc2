//! Ray picking over the cell layout.

use bevy_math::{Ray3d, Vec3};

use crate::grid::{CellId, CellLayout};

/// One picking result: the cell and how far along the ray it was entered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub cell: CellId,
    pub distance: f32,
}

/// Anything that can answer "which cell does this ray hit first".
pub trait SpatialIndex {
    /// Nearest hit along the ray, if any.
    fn pick(&self, ray: Ray3d) -> Option<Hit>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extent: f32) -> Self {
        Self {
            min: center - Vec3::splat(half_extent),
            max: center + Vec3::splat(half_extent),
        }
    }

    /// Slab test. Returns the entry distance, clamped to 0 when the origin
    /// is already inside the box.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let (o, d, lo, hi) = (origin[axis], dir[axis], self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Brute-force nearest-hit index over every cell's bounding cube, with a
/// whole-grid bounds check up front.
#[derive(Clone, Debug)]
pub struct GridSpatialIndex {
    boxes: Vec<Aabb>,
    bounds: Option<Aabb>,
}

impl GridSpatialIndex {
    pub fn new(layout: &CellLayout, cell_size: f32) -> Self {
        let half = cell_size * 0.5;
        let boxes: Vec<Aabb> = layout
            .iter()
            .map(|(_, p)| Aabb::from_center(p, half))
            .collect();

        let bounds = boxes.iter().copied().reduce(|acc, b| Aabb {
            min: acc.min.min(b.min),
            max: acc.max.max(b.max),
        });

        Self { boxes, bounds }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

impl SpatialIndex for GridSpatialIndex {
    fn pick(&self, ray: Ray3d) -> Option<Hit> {
        let dir = *ray.direction;
        self.bounds?.ray_entry(ray.origin, dir)?;

        let mut nearest: Option<Hit> = None;
        for (i, aabb) in self.boxes.iter().enumerate() {
            let Some(t) = aabb.ray_entry(ray.origin, dir) else {
                continue;
            };
            // Strict comparison keeps the lower id on exact ties.
            if nearest.is_none_or(|best| t < best.distance) {
                nearest = Some(Hit {
                    cell: CellId(i as u32),
                    distance: t,
                });
            }
        }
        nearest
    }
}
