//! Scene entity types. Pure data, no logic.

use glam::{EulerRot, Mat4, Quat, Vec3};

// ── Transform ─────────────────────────────────────────────────────────────────

/// Position, rotation and scale of one entity, plus the world matrix derived
/// from them.
///
/// Rotation is Euler angles in radians, applied in XYZ order. The world
/// matrix is a cache: callers that move an entity refresh it once per frame
/// via [`Transform::refresh_world`].
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub world: Mat4,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
        }
    }

    /// A fresh transform at the origin with the given scale.
    pub fn with_scale(scale: Vec3) -> Self {
        let mut t = Self::new();
        t.scale = scale;
        t.refresh_world();
        t
    }

    /// Recompute the world matrix from the three component vectors.
    pub fn refresh_world(&mut self) {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        self.world = Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Fixed scene camera. Positioned once at initialization; the view matrix is
/// derived from the position and never changes afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub view: Mat4,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            view: Mat4::from_translation(-position),
        }
    }
}

// ── Presence ──────────────────────────────────────────────────────────────────

/// Whether the beam or the enemy currently exists in the scene.
///
/// An `Inactive` entity is neither drawn nor collision-tested; its transform
/// persists and is reused on the next spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Inactive,
    Active,
}

impl Presence {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// One frame's digital input, snapshotted by the driver before the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub transform: Transform,
}

#[derive(Clone, Debug)]
pub struct Beam {
    pub transform: Transform,
    pub presence: Presence,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub transform: Transform,
    pub presence: Presence,
}

// ── Scene state ───────────────────────────────────────────────────────────────

/// The whole gameplay scene: fixed cardinality, one of everything.
///
/// Cloneable so the pure update functions in [`crate::compute`] can return a
/// new state without mutating the previous frame's.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub stage: Transform,
    pub player: Player,
    pub beam: Beam,
    pub enemy: Enemy,
    /// Displayed every frame; no current rule increments it.
    pub score: u32,
    pub frame: u64,
}
