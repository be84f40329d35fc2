use bevy::prelude::*;
use bevy_camera::{PerspectiveProjection, Projection};
use bevy_math::Ray3d;
use std::collections::HashMap;

use super::components::{CubeCamera, OrbitView};
use crate::claims::{ClaimBook, ClaimRecord};
use crate::core::PoolConfig;
use crate::grid::{CellId, CellLayout, GridIndexer};
use crate::hover::{PointerCamera, TooltipState, ndc_to_pointer};
use crate::spatial::GridSpatialIndex;

/// Static, startup-built view of the pool: config, indexer, layout and
/// the picking index.
#[derive(Resource, Clone)]
pub struct PoolRes {
    pub config: PoolConfig,
    pub indexer: GridIndexer,
    pub layout: CellLayout,
    pub spatial: GridSpatialIndex,
}

impl PoolRes {
    pub fn new(config: PoolConfig) -> Self {
        let indexer = config.indexer();
        let layout = CellLayout::build(&indexer, config.spacing);
        let spatial = GridSpatialIndex::new(&layout, config.cell_size);
        info!(
            cells = layout.len(),
            spacing = config.spacing,
            "built cell layout"
        );
        Self {
            config,
            indexer,
            layout,
            spatial,
        }
    }
}

/// Current claims snapshot. Replace the whole resource to publish new claims.
#[derive(Resource, Clone, Default)]
pub struct ClaimsRes(pub ClaimBook);

#[derive(Resource, Default, PartialEq)]
pub struct HoveredCell(pub Option<CellId>);

#[derive(Resource, Default, PartialEq)]
pub struct TooltipRes(pub TooltipState);

/// Shared cube mesh and one material per colour.
#[derive(Resource)]
pub struct CellAssets {
    pub cube: Handle<Mesh>,
    pub unclaimed: Handle<StandardMaterial>,
    pub fallback: Handle<StandardMaterial>,
    pub owners: HashMap<String, Handle<StandardMaterial>>,
}

impl CellAssets {
    pub fn new(
        config: &PoolConfig,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let size = config.cell_size;
        let opacity = config.cell_opacity;
        let mut material = |c: crate::core::Color| {
            materials.add(StandardMaterial {
                base_color: c.with_a(opacity).into(),
                alpha_mode: AlphaMode::Blend,
                metallic: 0.0,
                perceptual_roughness: 0.3,
                ..default()
            })
        };

        let palette = &config.palette;
        let unclaimed = material(palette.unclaimed);
        let fallback = material(palette.fallback);
        let owners = palette
            .owners
            .iter()
            .map(|(name, c)| (name.clone(), material(*c)))
            .collect();

        Self {
            cube: meshes.add(Cuboid::new(size, size, size)),
            unclaimed,
            fallback,
            owners,
        }
    }

    pub fn material_for(&self, record: &ClaimRecord) -> &Handle<StandardMaterial> {
        match record.owner() {
            Some(owner) => self.owners.get(owner).unwrap_or(&self.fallback),
            None => &self.unclaimed,
        }
    }
}

/// Bevy camera adapter for [`PointerCamera`].
pub struct ViewportCamera<'a> {
    pub camera: &'a Camera,
    pub transform: &'a GlobalTransform,
    /// Logical size of the surface the pointer moves over
    pub viewport: Vec2,
}

impl PointerCamera for ViewportCamera<'_> {
    fn ray_through(&self, ndc: Vec2) -> Option<Ray3d> {
        let pointer = ndc_to_pointer(ndc, self.viewport);
        self.camera.viewport_to_world(self.transform, pointer).ok()
    }
}

const SKY: crate::core::Color = crate::core::Color::hex(0xffffff);
const GROUND: crate::core::Color = crate::core::Color::hex(0x888888);

/// Ambient term standing in for a sky/ground hemisphere: the average of the
/// two colours. The ground half also gets a dim light from below.
pub fn sky_ground_ambient(
    sky: crate::core::Color,
    ground: crate::core::Color,
    brightness: f32,
) -> AmbientLight {
    let mid = crate::core::Color::rgb(
        (sky.r + ground.r) * 0.5,
        (sky.g + ground.g) * 0.5,
        (sky.b + ground.b) * 0.5,
    );
    AmbientLight {
        color: mid.into(),
        brightness,
        ..default()
    }
}

pub fn setup_scene(mut commands: Commands, pool: Res<PoolRes>) {
    let cam = pool.config.camera;

    commands.spawn((
        Name::new("cube_cam"),
        CubeCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: cam.fov_degrees.to_radians(),
            near: cam.near,
            far: cam.far,
            ..default()
        }),
        OrbitView::from_eye(cam.eye, cam.target, cam.damping),
        Transform::from_translation(cam.eye).looking_at(cam.target, Vec3::Y),
    ));

    commands.insert_resource(sky_ground_ambient(SKY, GROUND, 800.0));
    commands.spawn((
        DirectionalLight {
            color: GROUND.into(),
            illuminance: 1_500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, -50.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    // Key light from above-front, softer fill from the opposite side
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(30.0, 60.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 5_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-50.0, 40.0, -30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 2_000_000.0,
            range: 400.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-40.0, 40.0, 60.0),
    ));
}
