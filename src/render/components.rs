use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::grid::CellId;

/// One rendered cube.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
}

/// Marker for the camera used for picking.
#[derive(Component)]
pub struct CubeCamera;

/// Marker for the floating tooltip node.
#[derive(Component)]
pub struct TooltipNode;

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Damped orbit camera state.
///
/// Drag input adds angular velocity; every frame the velocity is applied and
/// then reduced by `damping`, so the view glides to a stop.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitView {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_velocity: f32,
    pub pitch_velocity: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitView {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 12.0,
            yaw: 0.8,
            pitch: 0.4,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            damping: 0.05,
            rotate_speed: 0.005,
            pan_speed: 0.0015,
            min_radius: 1.0,
            max_radius: 500.0,
        }
    }
}

impl OrbitView {
    pub fn from_eye(eye: Vec3, target: Vec3, damping: f32) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            damping: damping.clamp(0.0, 1.0),
            max_radius: (radius * 4.0).max(500.0),
            ..default()
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp) * self.radius
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Queue a rotation from a pointer drag (pixels).
    pub fn drag(&mut self, delta: Vec2) {
        self.yaw_velocity -= delta.x * self.rotate_speed;
        self.pitch_velocity += delta.y * self.rotate_speed;
    }

    /// Move the target in the camera's ground plane (pixels).
    pub fn pan(&mut self, delta: Vec2) {
        let right = Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin());
        let up = Vec3::Y;
        self.target += (-right * delta.x + up * delta.y) * self.pan_speed * self.radius;
    }

    /// Positive `scroll` moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.radius = (self.radius * (1.0 - scroll * 0.1)).clamp(self.min_radius, self.max_radius);
    }

    /// Advance one frame. Returns true if the eye moved.
    pub fn step(&mut self) -> bool {
        if self.yaw_velocity.abs() < 1e-6 && self.pitch_velocity.abs() < 1e-6 {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            return false;
        }
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let keep = 1.0 - self.damping;
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
        true
    }
}
