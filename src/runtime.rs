use bevy::prelude::*;

use crate::core::PoolConfig;
use crate::render::{BetCubePlugin, ClaimsRes, PoolRes};

fn pool_resources(config: PoolConfig) -> (ClearColor, PoolRes, ClaimsRes) {
    let bg = config.background;
    let claims = ClaimsRes(config.claim_book());
    (
        ClearColor(Color::srgb(bg.r, bg.g, bg.b)),
        PoolRes::new(config),
        claims,
    )
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_pool(config: PoolConfig) {
    let (clear, pool, claims) = pool_resources(config);
    App::new()
        .insert_resource(clear)
        .insert_resource(pool)
        .insert_resource(claims)
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Baby Bet Cube".to_string(),
                    ..default()
                }),
                ..default()
            }),
            BetCubePlugin,
        ))
        .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_pool(config: PoolConfig, canvas_id: &str) {
    let (clear, pool, claims) = pool_resources(config);
    App::new()
        .insert_resource(clear)
        .insert_resource(pool)
        .insert_resource(claims)
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{}", canvas_id)),
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            }),
            BetCubePlugin,
        ))
        .run();
}
