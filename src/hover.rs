//! Pointer -> cell resolution and the tooltip text.
//!
//! Every pointer event is handled from scratch: the tooltip state is a pure
//! function of the latest hit and pointer position, never of previous ones.

use bevy_math::{Dir3, Ray3d, Vec2, Vec3};

use crate::claims::ClaimBook;
use crate::error::GridError;
use crate::grid::{CellId, GridIndexer};
use crate::spatial::SpatialIndex;

/// Screen-pixel offset of the tooltip from the pointer.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Turns a pointer position into a world-space ray.
pub trait PointerCamera {
    fn ray_through(&self, ndc: Vec2) -> Option<Ray3d>;
}

/// Pixel position (origin top-left, y down) to normalized device
/// coordinates (origin centre, y up, both axes in [-1, 1]).
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        pointer.x / viewport.x * 2.0 - 1.0,
        -(pointer.y / viewport.y) * 2.0 + 1.0,
    ))
}

/// Inverse of [`pointer_to_ndc`].
pub fn ndc_to_pointer(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * viewport.x, (1.0 - ndc.y) * 0.5 * viewport.y)
}

/// The spatial index's nearest hit is taken as is.
pub fn resolve_hover(
    pointer_ndc: Vec2,
    camera: &impl PointerCamera,
    index: &impl SpatialIndex,
) -> Option<CellId> {
    let ray = camera.ray_through(pointer_ndc)?;
    index.pick(ray).map(|hit| hit.cell)
}

/// Minimal perspective camera (eye looking at a target).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveRig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
}

impl PointerCamera for PerspectiveRig {
    fn ray_through(&self, ndc: Vec2) -> Option<Ray3d> {
        let forward = (self.target - self.eye).try_normalize()?;
        let right = forward.cross(self.up).try_normalize()?;
        let up = right.cross(forward);
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * self.aspect;
        let dir = forward + right * (ndc.x * half_w) + up * (ndc.y * half_h);
        Some(Ray3d::new(self.eye, Dir3::new(dir).ok()?))
    }
}

/// What the UI layer should show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub position: Vec2,
    pub text: String,
}

impl TooltipState {
    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Joins the indexer and a claims snapshot into tooltip text.
#[derive(Clone, Copy, Debug)]
pub struct HoverReporter<'a> {
    indexer: &'a GridIndexer,
    claims: &'a ClaimBook,
}

impl<'a> HoverReporter<'a> {
    pub fn new(indexer: &'a GridIndexer, claims: &'a ClaimBook) -> Self {
        Self { indexer, claims }
    }

    pub fn describe(&self, id: CellId) -> Result<String, GridError> {
        let info = self.indexer.to_info(self.indexer.to_coordinate(id)?)?;
        let claim = self.claims.lookup(id);
        let status = if claim.claimed {
            format!("Claimed by: {}", claim.owner.as_deref().unwrap_or("unknown"))
        } else {
            "Available".to_string()
        };
        Ok(format!(
            "Date: {}\nWeight: {:.1} lbs\nHour: {}:00\n{}",
            info.date.format("%a %b %d %Y"),
            info.weight,
            info.hour,
            status
        ))
    }

    /// Tooltip for the latest pointer event. No hit, or a hit the indexer
    /// cannot describe, hides it.
    pub fn report(&self, hit: Option<CellId>, pointer: Vec2) -> TooltipState {
        let Some(id) = hit else {
            return TooltipState::hidden();
        };
        match self.describe(id) {
            Ok(text) => TooltipState {
                visible: true,
                position: pointer + TOOLTIP_OFFSET,
                text,
            },
            Err(err) => {
                tracing::warn!(%err, "picked cell has no description");
                TooltipState::hidden()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimRecord;
    use crate::grid::{CellLayout, GridDims};
    use crate::spatial::{GridSpatialIndex, Hit};
    use chrono::NaiveDate;

    fn indexer() -> GridIndexer {
        GridIndexer::new(
            GridDims::default(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            5.0,
            0.1,
        )
    }

    fn alice_claims() -> ClaimBook {
        [(CellId(0), ClaimRecord::claimed_by("Alice"))]
            .into_iter()
            .collect()
    }

    struct FixedCamera(Option<Ray3d>);

    impl PointerCamera for FixedCamera {
        fn ray_through(&self, _ndc: Vec2) -> Option<Ray3d> {
            self.0
        }
    }

    struct FixedIndex(Option<Hit>);

    impl SpatialIndex for FixedIndex {
        fn pick(&self, _ray: Ray3d) -> Option<Hit> {
            self.0
        }
    }

    #[test]
    fn describes_claimed_and_available_cells() {
        let ix = indexer();
        let claims = alice_claims();
        let reporter = HoverReporter::new(&ix, &claims);

        let claimed = reporter.describe(CellId(0)).unwrap();
        assert!(claimed.contains("Claimed by: Alice"));
        assert_eq!(
            claimed,
            "Date: Mon Dec 01 2025\nWeight: 5.0 lbs\nHour: 0:00\nClaimed by: Alice"
        );

        let open = reporter.describe(CellId(1)).unwrap();
        assert!(open.contains("Available"));
        assert!(open.contains("Hour: 1:00"));
    }

    #[test]
    fn describes_last_cell() {
        let ix = indexer();
        let claims = ClaimBook::new();
        let text = HoverReporter::new(&ix, &claims)
            .describe(CellId(ix.total() - 1))
            .unwrap();
        assert_eq!(
            text,
            "Date: Sun Dec 21 2025\nWeight: 9.9 lbs\nHour: 23:00\nAvailable"
        );
    }

    #[test]
    fn ownerless_claim_still_reads_as_claimed() {
        let ix = indexer();
        let claims: ClaimBook = [(
            CellId(5),
            ClaimRecord {
                claimed: true,
                owner: None,
            },
        )]
        .into_iter()
        .collect();
        let text = HoverReporter::new(&ix, &claims).describe(CellId(5)).unwrap();
        assert!(text.ends_with("Claimed by: unknown"));
    }

    #[test]
    fn describe_rejects_out_of_range() {
        let ix = indexer();
        let claims = ClaimBook::new();
        assert!(matches!(
            HoverReporter::new(&ix, &claims).describe(CellId(25_200)),
            Err(GridError::IdOutOfRange { .. })
        ));
    }

    #[test]
    fn absence_hides_then_hit_shows() {
        let ix = indexer();
        let claims = alice_claims();
        let reporter = HoverReporter::new(&ix, &claims);
        let pointer = Vec2::new(200.0, 150.0);

        let shown = reporter.report(Some(CellId(0)), pointer);
        assert!(shown.visible);

        let hidden = reporter.report(None, pointer);
        assert_eq!(hidden, TooltipState::hidden());

        let again = reporter.report(Some(CellId(42)), pointer);
        assert!(again.visible);
        assert_eq!(again.position, Vec2::new(210.0, 160.0));
        assert_eq!(again.text, reporter.describe(CellId(42)).unwrap());
    }

    #[test]
    fn date_overflow_is_reported_not_panicked() {
        let ix = GridIndexer::new(GridDims::default(), NaiveDate::MAX, 5.0, 0.1);
        let claims = ClaimBook::new();
        let reporter = HoverReporter::new(&ix, &claims);
        assert!(matches!(
            reporter.describe(CellId(1200)),
            Err(GridError::DateOutOfRange { day: 1, .. })
        ));
        assert!(!reporter.report(Some(CellId(1200)), Vec2::ZERO).visible);
    }

    #[test]
    fn undescribable_hit_hides() {
        let ix = indexer();
        let claims = ClaimBook::new();
        let state = HoverReporter::new(&ix, &claims).report(Some(CellId(u32::MAX)), Vec2::ZERO);
        assert!(!state.visible);
    }

    #[test]
    fn resolve_hover_takes_picker_result() {
        let ray = Some(Ray3d::new(Vec3::ZERO, Dir3::X));
        let hit = Some(Hit {
            cell: CellId(9),
            distance: 1.0,
        });
        assert_eq!(
            resolve_hover(Vec2::ZERO, &FixedCamera(ray), &FixedIndex(hit)),
            Some(CellId(9))
        );
        assert_eq!(
            resolve_hover(Vec2::ZERO, &FixedCamera(None), &FixedIndex(hit)),
            None
        );
        assert_eq!(
            resolve_hover(Vec2::ZERO, &FixedCamera(ray), &FixedIndex(None)),
            None
        );
    }

    #[test]
    fn centre_of_screen_picks_the_cell_in_front() {
        let ix = indexer();
        let layout = CellLayout::build(&ix, 1.2);
        let index = GridSpatialIndex::new(&layout, 0.5);
        let target = layout.position(ix.to_id(10, 20, 23).unwrap()).unwrap();
        let rig = PerspectiveRig {
            eye: target + Vec3::new(0.0, 0.0, 30.0),
            target,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
        };
        let ndc = pointer_to_ndc(Vec2::new(640.0, 360.0), Vec2::new(1280.0, 720.0)).unwrap();
        assert_eq!(resolve_hover(ndc, &rig, &index), ix.to_id(10, 20, 23).ok());
    }

    #[test]
    fn ndc_conversion() {
        let vp = Vec2::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, vp), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(vp, vp), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(pointer_to_ndc(vp * 0.5, vp), Some(Vec2::ZERO));
        assert_eq!(pointer_to_ndc(Vec2::ZERO, Vec2::ZERO), None);
        assert_eq!(ndc_to_pointer(Vec2::new(-1.0, 1.0), vp), Vec2::ZERO);
        assert_eq!(ndc_to_pointer(Vec2::new(0.5, -0.5), vp), Vec2::new(600.0, 450.0));
    }
}
