//! Component fixtures shared by the benches.
//!
//! Sizes range from a marker to a 40 byte transform, so erased and sparse storage move values of
//! realistic width.

use rusty_ecs::ecs::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
}

/// Translation, rotation quaternion and scale.
#[derive(Component, Clone, Copy, Debug)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub points: i32,
    pub limit: i32,
}

/// Registered at runtime in the identifier benches, never part of a static set.
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(name = "script_state")]
pub struct ScriptState {
    pub handle: u64,
}

/// Marker for short lived entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Projectile;

/// The components benches treat as known when the program is built.
pub type StaticSet = (Position, Velocity, Transform, Health);
