//! Pure per-frame scene logic.
//!
//! Every public function takes an immutable reference to the current
//! [`SceneState`] (and, where needed, input and an RNG handle) and returns a
//! brand-new state. Side effects are limited to the injected RNG, so a
//! seeded generator replays the same run.

use glam::Vec3;
use log::debug;
use rand::Rng;

use crate::entities::{Beam, Camera, Enemy, InputState, Player, Presence, SceneState, Transform};

// ── Tunables ─────────────────────────────────────────────────────────────────

/// Player strafe step per held direction, units/frame.
pub const PLAYER_STEP: f32 = 0.1;
/// Player X is clamped to ±this.
pub const PLAYER_X_LIMIT: f32 = 4.0;
pub const BEAM_SPEED: f32 = 1.0;
/// Cosmetic beam spin, radians/frame.
pub const BEAM_SPIN: f32 = 0.1;
/// The beam expires once its Z reaches this.
pub const BEAM_TRAVEL_LIMIT: f32 = 40.0;
pub const ENEMY_SPEED: f32 = 0.5;
/// Cosmetic enemy spin, radians/frame.
pub const ENEMY_SPIN: f32 = 0.1;
/// Fresh enemies drop in at this Z.
pub const ENEMY_SPAWN_Z: f32 = 40.0;
/// An enemy that slips this far past the player returns to the source.
pub const ENEMY_EXIT_Z: f32 = -5.0;
/// Per-axis window of the XZ box-overlap test.
pub const HIT_RANGE: f32 = 1.0;
/// The spawn X lattice: this many 0.1-unit cells covering [-4, 4).
pub const SPAWN_CELLS: u32 = 80;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the scene as it looks on frame zero: camera and stage placed, all
/// movable entities at the origin, beam and enemy not yet present.
pub fn init_scene() -> SceneState {
    let camera = Camera::new(Vec3::new(0.0, 1.0, -6.0));

    let mut stage = Transform::with_scale(Vec3::new(4.5, 1.0, 40.0));
    stage.translation = Vec3::new(0.0, -1.5, 0.0);
    stage.refresh_world();

    SceneState {
        camera,
        stage,
        player: Player {
            transform: Transform::with_scale(Vec3::splat(0.5)),
        },
        beam: Beam {
            transform: Transform::with_scale(Vec3::splat(0.2)),
            presence: Presence::Inactive,
        },
        enemy: Enemy {
            transform: Transform::with_scale(Vec3::splat(0.5)),
            presence: Presence::Inactive,
        },
        score: 0,
        frame: 0,
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Strafe the player along X and clamp to the lane.
///
/// While the beam is inactive it rides along with the player, so a freshly
/// fired beam leaves from wherever the player is. An active beam keeps its
/// own X.
pub fn player_update(state: &SceneState, input: &InputState) -> SceneState {
    let mut player = state.player.clone();
    let mut beam = state.beam.clone();

    if input.right {
        player.transform.translation.x += PLAYER_STEP;
    }
    if input.left {
        player.transform.translation.x -= PLAYER_STEP;
    }
    player.transform.translation.x = player
        .transform
        .translation
        .x
        .clamp(-PLAYER_X_LIMIT, PLAYER_X_LIMIT);

    if !beam.presence.is_active() {
        beam.transform.translation.x = player.transform.translation.x;
    }

    SceneState {
        player,
        beam,
        ..state.clone()
    }
}

// ── Beam ─────────────────────────────────────────────────────────────────────

/// Advance the beam: travel, then the fire and expiry rules.
///
/// Travel runs first, so a beam born this frame holds its muzzle position
/// until the next one. Fire is deliberately not edge-triggered: every frame
/// the key is held the beam re-arms at the player's current X and Z.
pub fn beam_update(state: &SceneState, input: &InputState) -> SceneState {
    let mut beam = state.beam.clone();

    if beam.presence.is_active() {
        beam.transform.translation.z += BEAM_SPEED;
        beam.transform.rotation.x += BEAM_SPIN;
    }

    if input.fire {
        beam.presence = Presence::Active;
        beam.transform.translation.x = state.player.transform.translation.x;
        beam.transform.translation.z = state.player.transform.translation.z;
    }

    if beam.presence.is_active() && beam.transform.translation.z >= BEAM_TRAVEL_LIMIT {
        debug!("beam expired at z={:.1}", beam.transform.translation.z);
        beam.presence = Presence::Inactive;
    }

    SceneState {
        beam,
        ..state.clone()
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

/// X for a fresh enemy: one of `SPAWN_CELLS` lattice points across the lane.
pub fn spawn_x(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0..SPAWN_CELLS) as f32 / 10.0 - 4.0
}

/// Advance the enemy: spawn rule, exit rule, then travel.
///
/// The spawn check runs before the exit check, so an exit-expiry leaves the
/// enemy absent for exactly one frame before the respawn, while a collision
/// despawn respawns on the very next frame.
pub fn enemy_update(state: &SceneState, rng: &mut impl Rng) -> SceneState {
    let mut enemy = state.enemy.clone();

    if !enemy.presence.is_active() {
        enemy.presence = Presence::Active;
        enemy.transform.translation.z = ENEMY_SPAWN_Z;
        enemy.transform.translation.x = spawn_x(rng);
        debug!("enemy spawn at x={:.1}", enemy.transform.translation.x);
    }

    if enemy.transform.translation.z <= ENEMY_EXIT_Z {
        enemy.presence = Presence::Inactive;
    }

    if enemy.presence.is_active() {
        enemy.transform.translation.z -= ENEMY_SPEED;
        enemy.transform.rotation.x -= ENEMY_SPIN;
    }

    SceneState {
        enemy,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Symmetric box-overlap test on the XZ footprint. Y never participates.
pub fn overlap_xz(a: Vec3, b: Vec3) -> bool {
    (a.x - b.x).abs() < HIT_RANGE && (a.z - b.z).abs() < HIT_RANGE
}

/// Run both pairwise checks against one snapshot of this frame's positions
/// and presences, so an enemy that overlaps the player and the beam in the
/// same frame triggers both outcomes.
///
/// A player-enemy hit silently removes the enemy: no damage, no score.
pub fn collision(state: &SceneState) -> SceneState {
    let mut beam = state.beam.clone();
    let mut enemy = state.enemy.clone();

    let enemy_present = state.enemy.presence.is_active();
    let beam_present = state.beam.presence.is_active();

    let player_pos = state.player.transform.translation;
    let beam_pos = state.beam.transform.translation;
    let enemy_pos = state.enemy.transform.translation;

    if enemy_present && overlap_xz(player_pos, enemy_pos) {
        debug!("enemy reached the player at x={:.1}", enemy_pos.x);
        enemy.presence = Presence::Inactive;
    }

    if enemy_present && beam_present && overlap_xz(beam_pos, enemy_pos) {
        debug!("beam hit enemy at x={:.1} z={:.1}", enemy_pos.x, enemy_pos.z);
        enemy.presence = Presence::Inactive;
        beam.presence = Presence::Inactive;
    }

    SceneState {
        beam,
        enemy,
        ..state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the scene by one frame: player, beam, enemy, collisions, then the
/// world-matrix refresh for everything that moves. Stage and camera are
/// fixed after [`init_scene`].
pub fn tick(state: &SceneState, input: &InputState, rng: &mut impl Rng) -> SceneState {
    let state = player_update(state, input);
    let state = beam_update(&state, input);
    let state = enemy_update(&state, rng);
    let mut state = collision(&state);

    state.player.transform.refresh_world();
    state.beam.transform.refresh_world();
    state.enemy.transform.refresh_world();

    state.frame += 1;
    state
}
