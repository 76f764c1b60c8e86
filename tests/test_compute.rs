use starlane::compute::*;
use starlane::entities::*;

use approx::assert_relative_eq;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

const NO_INPUT: InputState = InputState { left: false, right: false, fire: false };
const LEFT: InputState = InputState { left: true, right: false, fire: false };
const RIGHT: InputState = InputState { left: false, right: true, fire: false };
const FIRE: InputState = InputState { left: false, right: false, fire: true };

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn place_beam(state: &mut SceneState, x: f32, z: f32) {
    state.beam.presence = Presence::Active;
    state.beam.transform.translation = Vec3::new(x, 0.0, z);
}

fn place_enemy(state: &mut SceneState, x: f32, z: f32) {
    state.enemy.presence = Presence::Active;
    state.enemy.transform.translation = Vec3::new(x, 0.0, z);
}

// ── init_scene ────────────────────────────────────────────────────────────────

#[test]
fn init_places_camera_and_stage() {
    let s = init_scene();
    assert_eq!(s.camera.position, Vec3::new(0.0, 1.0, -6.0));
    assert_eq!(s.stage.translation, Vec3::new(0.0, -1.5, 0.0));
    assert_eq!(s.stage.scale, Vec3::new(4.5, 1.0, 40.0));
}

#[test]
fn init_entities_start_absent_and_unscored() {
    let s = init_scene();
    assert_eq!(s.beam.presence, Presence::Inactive);
    assert_eq!(s.enemy.presence, Presence::Inactive);
    assert_eq!(s.player.transform.translation, Vec3::ZERO);
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
}

#[test]
fn init_entity_scales() {
    let s = init_scene();
    assert_eq!(s.player.transform.scale, Vec3::splat(0.5));
    assert_eq!(s.beam.transform.scale, Vec3::splat(0.2));
    assert_eq!(s.enemy.transform.scale, Vec3::splat(0.5));
}

// ── player_update ─────────────────────────────────────────────────────────────

#[test]
fn player_steps_right_by_tenth() {
    let s = player_update(&init_scene(), &RIGHT);
    assert_relative_eq!(s.player.transform.translation.x, 0.1, epsilon = 1e-6);
}

#[test]
fn player_steps_left_by_tenth() {
    let s = player_update(&init_scene(), &LEFT);
    assert_relative_eq!(s.player.transform.translation.x, -0.1, epsilon = 1e-6);
}

#[test]
fn opposed_directions_cancel() {
    let both = InputState { left: true, right: true, fire: false };
    let mut s = init_scene();
    for _ in 0..10 {
        s = player_update(&s, &both);
    }
    assert_eq!(s.player.transform.translation.x, 0.0);
}

#[test]
fn forty_right_frames_reach_the_wall() {
    let mut s = init_scene();
    for _ in 0..40 {
        s = player_update(&s, &RIGHT);
    }
    assert_relative_eq!(s.player.transform.translation.x, 4.0, epsilon = 1e-5);
}

#[test]
fn player_x_clamps_exactly_at_limit() {
    let mut s = init_scene();
    for _ in 0..100 {
        s = player_update(&s, &RIGHT);
    }
    assert_eq!(s.player.transform.translation.x, 4.0);

    for _ in 0..200 {
        s = player_update(&s, &LEFT);
    }
    assert_eq!(s.player.transform.translation.x, -4.0);
}

#[test]
fn clamp_holds_under_ticks_too() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    for _ in 0..120 {
        s = tick(&s, &RIGHT, &mut rng);
    }
    assert_eq!(s.player.transform.translation.x, 4.0);
}

#[test]
fn idle_beam_rides_with_the_player() {
    let mut s = init_scene();
    for _ in 0..7 {
        s = player_update(&s, &RIGHT);
    }
    assert_eq!(
        s.beam.transform.translation.x,
        s.player.transform.translation.x
    );
}

#[test]
fn active_beam_x_is_frozen() {
    let mut s = init_scene();
    place_beam(&mut s, 0.0, 5.0);
    for _ in 0..5 {
        s = player_update(&s, &RIGHT);
    }
    assert_relative_eq!(s.player.transform.translation.x, 0.5, epsilon = 1e-6);
    assert_eq!(s.beam.transform.translation.x, 0.0);
}

// ── beam_update ───────────────────────────────────────────────────────────────

#[test]
fn fire_arms_beam_at_the_player() {
    let mut s = init_scene();
    s.player.transform.translation.x = 2.0;
    let s = beam_update(&s, &FIRE);
    assert_eq!(s.beam.presence, Presence::Active);
    assert_eq!(s.beam.transform.translation.x, 2.0);
    assert_eq!(s.beam.transform.translation.z, 0.0);
}

#[test]
fn newborn_beam_holds_muzzle_position_for_one_frame() {
    // Travel runs before the fire rule, so the birth frame does not move it.
    let s = beam_update(&init_scene(), &FIRE);
    assert_eq!(s.beam.transform.translation.z, 0.0);
    let s = beam_update(&s, &NO_INPUT);
    assert_eq!(s.beam.transform.translation.z, 1.0);
}

#[test]
fn beam_travels_one_unit_per_frame_and_spins() {
    let mut s = init_scene();
    place_beam(&mut s, 0.0, 0.0);
    for _ in 0..3 {
        s = beam_update(&s, &NO_INPUT);
    }
    assert_eq!(s.beam.transform.translation.z, 3.0);
    assert_relative_eq!(s.beam.transform.rotation.x, 0.3, epsilon = 1e-6);
}

#[test]
fn held_fire_rearms_the_beam_every_frame() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    for _ in 0..5 {
        s = tick(&s, &FIRE, &mut rng);
        assert_eq!(s.beam.presence, Presence::Active);
        assert_eq!(s.beam.transform.translation.z, 0.0);
    }
}

#[test]
fn beam_z_monotonic_while_active() {
    let mut s = init_scene();
    place_beam(&mut s, 0.0, 0.0);
    let mut last_z = s.beam.transform.translation.z;
    while s.beam.presence.is_active() {
        s = beam_update(&s, &NO_INPUT);
        assert!(s.beam.transform.translation.z >= last_z);
        last_z = s.beam.transform.translation.z;
    }
}

#[test]
fn beam_expires_exactly_at_travel_limit() {
    let mut s = init_scene();
    place_beam(&mut s, 0.0, 0.0);
    for _ in 0..39 {
        s = beam_update(&s, &NO_INPUT);
    }
    assert_eq!(s.beam.presence, Presence::Active);
    assert_eq!(s.beam.transform.translation.z, 39.0);

    let s = beam_update(&s, &NO_INPUT);
    assert_eq!(s.beam.presence, Presence::Inactive);
    assert_eq!(s.beam.transform.translation.z, 40.0);
}

#[test]
fn refire_on_the_expiry_frame_keeps_the_beam_alive() {
    // The fire rule runs before the expiry check, so re-arming at the player
    // wins over the travel limit.
    let mut s = init_scene();
    place_beam(&mut s, 0.0, 39.5);
    let s = beam_update(&s, &FIRE);
    assert_eq!(s.beam.presence, Presence::Active);
    assert_eq!(s.beam.transform.translation.z, 0.0);
}

// ── enemy_update ──────────────────────────────────────────────────────────────

#[test]
fn enemy_spawns_on_the_first_frame() {
    let mut rng = seeded_rng();
    let s = tick(&init_scene(), &NO_INPUT, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Active);
    // Spawned at the far end, then travelled its first half unit.
    assert_eq!(s.enemy.transform.translation.z, 39.5);
}

#[test]
fn spawn_x_stays_on_the_lattice() {
    let mut rng = seeded_rng();
    for _ in 0..1000 {
        let x = spawn_x(&mut rng);
        let cells = (x + 4.0) * 10.0;
        assert_relative_eq!(cells, cells.round(), epsilon = 1e-4);
        assert!(
            (0.0..=79.0).contains(&cells.round()),
            "off-lattice spawn x {x}"
        );
    }
}

#[test]
fn spawn_sequence_reproducible_from_seed() {
    let mut a = StdRng::seed_from_u64(7);
    let mut b = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        assert_eq!(spawn_x(&mut a), spawn_x(&mut b));
    }
}

#[test]
fn enemy_advances_half_unit_per_frame_and_spins() {
    let mut rng = seeded_rng();
    let mut s = tick(&init_scene(), &NO_INPUT, &mut rng);
    let mut expected_z = 39.5;
    for _ in 0..10 {
        s = enemy_update(&s, &mut rng);
        expected_z -= 0.5;
        assert_eq!(s.enemy.transform.translation.z, expected_z);
    }
    assert!(s.enemy.transform.rotation.x < 0.0);
}

#[test]
fn exit_despawn_leaves_one_idle_frame_before_respawn() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    place_enemy(&mut s, 0.0, -4.5);

    // Crosses the exit threshold this frame but is still present.
    let s = enemy_update(&s, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Active);
    assert_eq!(s.enemy.transform.translation.z, -5.0);

    // Exit rule fires; the spawn check already ran, so this frame is idle.
    let s = enemy_update(&s, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Inactive);

    // Back at the source on the following frame.
    let s = enemy_update(&s, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Active);
    assert_eq!(s.enemy.transform.translation.z, 39.5);
}

#[test]
fn collision_despawn_respawns_on_the_very_next_frame() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    s.enemy.presence = Presence::Inactive; // as a collision leaves it
    let s = enemy_update(&s, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Active);
    assert_eq!(s.enemy.transform.translation.z, 39.5);
}

// ── collision ────────────────────────────────────────────────────────────────

#[test]
fn overlap_is_symmetric() {
    let pairs = [
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.5, 0.0, -0.5)),
        (Vec3::new(-2.0, 1.0, 3.0), Vec3::new(-1.2, 0.0, 3.9)),
        (Vec3::new(1.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0)),
    ];
    for (a, b) in pairs {
        assert_eq!(overlap_xz(a, b), overlap_xz(b, a));
    }
}

#[test]
fn overlap_window_is_strict() {
    assert!(!overlap_xz(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));
    assert!(!overlap_xz(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)));
    assert!(overlap_xz(Vec3::ZERO, Vec3::new(0.99, 0.0, 0.99)));
}

#[test]
fn overlap_ignores_y() {
    assert!(overlap_xz(
        Vec3::new(0.0, 100.0, 0.0),
        Vec3::new(0.5, -50.0, 0.5)
    ));
}

#[test]
fn beam_hit_consumes_beam_and_enemy() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    s.player.transform.translation.x = -3.0; // out of the enemy's path
    place_beam(&mut s, 0.0, 0.0);
    place_enemy(&mut s, 0.0, 0.9);

    // Beam climbs to 1.0, enemy drops to 0.4: inside the window together.
    let s = tick(&s, &NO_INPUT, &mut rng);
    assert_eq!(s.beam.presence, Presence::Inactive);
    assert_eq!(s.enemy.presence, Presence::Inactive);
    assert_eq!(s.score, 0);
}

#[test]
fn player_graze_removes_enemy_silently() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    place_enemy(&mut s, 0.5, 1.3);

    let s = tick(&s, &NO_INPUT, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Inactive);
    assert_eq!(s.beam.presence, Presence::Inactive);
    assert_eq!(s.player.transform.translation, Vec3::ZERO);
    assert_eq!(s.score, 0);
}

#[test]
fn enemy_overlapping_player_and_beam_consumes_both() {
    // Both checks read the same snapshot, so the player graze does not
    // shield the beam from being spent.
    let mut rng = seeded_rng();
    let mut s = init_scene();
    place_beam(&mut s, 0.0, -0.5);
    place_enemy(&mut s, 0.0, 0.9);

    let s = tick(&s, &NO_INPUT, &mut rng);
    assert_eq!(s.enemy.presence, Presence::Inactive);
    assert_eq!(s.beam.presence, Presence::Inactive);
}

#[test]
fn absent_entities_never_collide() {
    let mut s = init_scene();
    s.enemy.transform.translation = Vec3::ZERO; // on top of the player
    s.enemy.presence = Presence::Inactive;
    let s2 = collision(&s);
    assert_eq!(s2.enemy.presence, Presence::Inactive);
    assert_eq!(s2.beam.presence, Presence::Inactive);
}

#[test]
fn touching_the_window_edge_is_not_a_hit() {
    let mut s = init_scene();
    place_enemy(&mut s, 1.0, 0.0); // exactly one unit off the player in x
    let s = collision(&s);
    assert_eq!(s.enemy.presence, Presence::Active);
}

// ── tick ─────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_the_frame_counter() {
    let mut rng = seeded_rng();
    let mut s = init_scene();
    s.frame = 5;
    let s = tick(&s, &NO_INPUT, &mut rng);
    assert_eq!(s.frame, 6);
}

#[test]
fn tick_refreshes_world_matrices() {
    let mut rng = seeded_rng();
    let s = tick(&init_scene(), &RIGHT, &mut rng);

    let (_, _, player_pos) = s.player.transform.world.to_scale_rotation_translation();
    assert_relative_eq!(player_pos.x, s.player.transform.translation.x, epsilon = 1e-6);

    let (_, _, enemy_pos) = s.enemy.transform.world.to_scale_rotation_translation();
    assert_relative_eq!(enemy_pos.z, s.enemy.transform.translation.z, epsilon = 1e-4);
}

#[test]
fn stage_and_camera_never_move() {
    let mut rng = seeded_rng();
    let init = init_scene();
    let mut s = init.clone();
    for _ in 0..50 {
        s = tick(&s, &FIRE, &mut rng);
    }
    assert_eq!(s.stage, init.stage);
    assert_eq!(s.camera, init.camera);
}

#[test]
fn tick_does_not_mutate_its_input() {
    let mut rng = seeded_rng();
    let s = init_scene();
    let _ = tick(&s, &RIGHT, &mut rng);
    assert_eq!(s.player.transform.translation.x, 0.0);
    assert_eq!(s.frame, 0);
}
