pub mod components;
pub mod resources;
pub mod systems;

pub use components::*;
pub use resources::*;
use systems::*;

use bevy::prelude::*;

/// Scene, cells, orbit camera and hover tooltip.
///
/// Expects [`PoolRes`] and [`ClaimsRes`] to be inserted before the app runs.
/// Replacing `ClaimsRes` at runtime recolours the grid.
#[derive(Default)]
pub struct BetCubePlugin;

impl Plugin for BetCubePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClaimsRes>()
            .init_resource::<HoveredCell>()
            .init_resource::<TooltipRes>()
            .add_systems(Startup, (setup_scene, spawn_cells, spawn_tooltip))
            .add_systems(
                Update,
                (recolor_cells, orbit_camera, update_hover, sync_tooltip).chain(),
            );
    }
}
