use super::*;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow};

use crate::hover::{HoverReporter, TooltipState, pointer_to_ndc, resolve_hover};

/// Spawn one cube per cell, in id order, all unclaimed. `recolor_cells`
/// applies the claims on the first update.
pub fn spawn_cells(
    mut commands: Commands,
    pool: Res<PoolRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let assets = CellAssets::new(&pool.config, &mut meshes, &mut materials);

    let batch: Vec<_> = pool
        .layout
        .iter()
        .map(|(id, pos)| {
            (
                Cell { id },
                Mesh3d(assets.cube.clone()),
                MeshMaterial3d(assets.unclaimed.clone()),
                Transform::from_translation(pos),
            )
        })
        .collect();
    info!(cells = batch.len(), "spawning cells");
    commands.spawn_batch(batch);
    commands.insert_resource(assets);
}

pub fn spawn_tooltip(mut commands: Commands) {
    commands.spawn((
        TooltipNode,
        Text::new(""),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        Visibility::Hidden,
    ));
}

/// Re-assign materials whenever the claims snapshot is replaced.
pub fn recolor_cells(
    claims: Res<ClaimsRes>,
    assets: Option<Res<CellAssets>>,
    mut cells: Query<(&Cell, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(assets) = assets else {
        return;
    };
    if !claims.is_changed() && !assets.is_added() {
        return;
    }

    let mut changed = 0usize;
    for (cell, mut material) in cells.iter_mut() {
        let wanted = assets.material_for(claims.0.lookup(cell.id));
        if material.0 != *wanted {
            material.0 = wanted.clone();
            changed += 1;
        }
    }
    debug!(claims = claims.0.len(), changed, "recolored cells");
}

/// Left-drag rotates, right-drag pans, wheel zooms. Rotation keeps gliding
/// after release until damping stops it.
pub fn orbit_camera(
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    mut motion: MessageReader<MouseMotion>,
    mut cameras: Query<(&mut OrbitView, &mut Transform), With<CubeCamera>>,
) {
    let scroll: f32 = wheel.read().map(|e| e.y).sum();
    let delta: Vec2 = motion.read().map(|e| e.delta).sum();

    for (mut view, mut transform) in cameras.iter_mut() {
        let mut moved = false;

        if mouse.pressed(MouseButton::Left) && delta != Vec2::ZERO {
            view.drag(delta);
        }
        if mouse.pressed(MouseButton::Right) && delta != Vec2::ZERO {
            view.pan(delta);
            moved = true;
        }
        if scroll != 0.0 {
            view.zoom(scroll);
            moved = true;
        }
        moved |= view.step();

        if moved {
            *transform = view.transform();
        }
    }
}

/// Pointer-move handler: pick the cell under the pointer and rebuild the
/// tooltip from scratch.
pub fn update_hover(
    mut moved: MessageReader<CursorMoved>,
    mut left: MessageReader<CursorLeft>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<CubeCamera>>,
    pool: Res<PoolRes>,
    claims: Res<ClaimsRes>,
    mut hovered: ResMut<HoveredCell>,
    mut tooltip: ResMut<TooltipRes>,
) {
    let had_move = moved.read().count() > 0;
    let had_leave = left.read().count() > 0;
    if !had_move && !had_leave {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(pointer) = window.cursor_position() else {
        hovered.set_if_neq(HoveredCell(None));
        tooltip.set_if_neq(TooltipRes(TooltipState::hidden()));
        return;
    };
    let Ok((camera, cam_transform)) = cameras.single() else {
        return;
    };

    let viewport = Vec2::new(window.width(), window.height());
    let hit = pointer_to_ndc(pointer, viewport).and_then(|ndc| {
        let view = ViewportCamera {
            camera,
            transform: cam_transform,
            viewport,
        };
        resolve_hover(ndc, &view, &pool.spatial)
    });

    let state = HoverReporter::new(&pool.indexer, &claims.0).report(hit, pointer);
    hovered.set_if_neq(HoveredCell(hit));
    tooltip.set_if_neq(TooltipRes(state));
}

/// Copy the tooltip state onto its UI node.
pub fn sync_tooltip(
    tooltip: Res<TooltipRes>,
    mut nodes: Query<(&mut Node, &mut Visibility, &mut Text), With<TooltipNode>>,
) {
    if !tooltip.is_changed() {
        return;
    }
    let state = &tooltip.0;

    for (mut node, mut visibility, mut text) in nodes.iter_mut() {
        if !state.visible {
            *visibility = Visibility::Hidden;
            continue;
        }
        node.left = Val::Px(state.position.x);
        node.top = Val::Px(state.position.y);
        text.0.clone_from(&state.text);
        *visibility = Visibility::Visible;
    }
}
