use glam::Vec2;

use roll_dodge::consts::{BURST_COUNT, PLAYER_START, WORLD_WIDTH};
use roll_dodge::sim::SensorFan;
use roll_dodge::{Action, EnvConfig, EpisodePhase, Environment};

fn env_with_sensors(num_sensors: usize) -> Environment {
    Environment::new(EnvConfig {
        num_sensors,
        seed: 1234,
        ..Default::default()
    })
    .unwrap()
}

fn assert_fresh_episode(env: &Environment, observation: &[f32]) {
    assert_eq!(env.obstacle_count(), 0);
    assert_eq!(env.particle_count(), 0);
    assert_eq!(env.frame(), 0);
    assert_eq!(env.phase(), EpisodePhase::Playing);
    assert_eq!(
        env.player_position().unwrap(),
        Vec2::new(PLAYER_START.0, PLAYER_START.1)
    );
    assert_eq!(observation.len(), env.observation_size());
    for &ray in &observation[1..] {
        assert!((0.0..=1.0).contains(&ray));
    }
}

#[test]
fn test_empty_world_observation() {
    let mut env = env_with_sensors(5);
    let observation = env.reset().unwrap();

    assert_eq!(observation.len(), 6);
    assert_eq!(observation[0], PLAYER_START.0 / WORLD_WIDTH);
    assert_eq!(&observation[1..], &[0.0; 5]);
}

#[test]
fn test_obstacle_on_first_step_of_middle_ray() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();

    let config = env.config().clone();
    let fan = SensorFan::from_config(&config);
    let player = env.player_position().unwrap();
    let first_step = config.sensor_range / config.sensor_depth_resolution as f32;
    let theta = fan.ray_angle(2);
    let target = player + roll_dodge::fan_direction(theta) * first_step;
    env.place_obstacle(target, 5.0, 0.0);

    let observation = env.observe().unwrap();
    assert_eq!(observation[1 + 2], 1.0);
}

#[test]
fn test_sensor_prefers_nearer_obstacle() {
    let score_at = |distance: f32| {
        let mut env = env_with_sensors(5);
        env.reset().unwrap();
        let player = env.player_position().unwrap();
        env.place_obstacle(player + Vec2::new(0.0, -distance), 10.0, 0.0);
        env.observe().unwrap()[3]
    };

    let near = score_at(90.0);
    let far = score_at(240.0);
    assert!(far > 0.0);
    assert!(near >= far);
}

#[test]
fn test_lethal_contact_ends_episode_with_one_burst() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();

    // Two obstacles touching the player in the same physics step
    let player = env.player_position().unwrap();
    env.place_obstacle(player + Vec2::new(-20.0, 0.0), 20.0, 0.0);
    env.place_obstacle(player + Vec2::new(20.0, 0.0), 20.0, 0.0);

    let result = env.step(Action::Hold).unwrap();
    assert_eq!(env.phase(), EpisodePhase::GameOver);
    assert_eq!(result.reward, -1.0);
    assert!(result.done);
    assert_eq!(env.particle_count(), BURST_COUNT);
}

#[test]
fn test_terminal_state_is_sticky_until_reset() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();
    let player = env.player_position().unwrap();
    env.place_obstacle(player, 30.0, 0.0);
    assert!(env.step(Action::Hold).unwrap().done);

    for action in [Action::Left, Action::Hold, Action::Right].into_iter().cycle().take(30) {
        let result = env.step(action).unwrap();
        assert_eq!(result.reward, -1.0);
        assert!(result.done);
        assert!(env.particle_count() <= BURST_COUNT);
    }

    let observation = env.reset().unwrap();
    assert_fresh_episode(&env, &observation);
    let result = env.step(Action::Hold).unwrap();
    assert!(!result.done);
    assert_eq!(result.reward, 1.0);
}

#[test]
fn test_second_contact_after_death_adds_no_burst() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();
    let player = env.player_position().unwrap();
    env.place_obstacle(player, 30.0, 0.0);
    assert!(env.step(Action::Hold).unwrap().done);
    assert_eq!(env.particle_count(), BURST_COUNT);

    // A fresh obstacle on top of the player starts a new lethal contact
    let player = env.player_position().unwrap();
    env.place_obstacle(player, 30.0, 0.0);
    let result = env.step(Action::Hold).unwrap();
    assert!(result.done);
    assert_eq!(env.phase(), EpisodePhase::GameOver);
    assert_eq!(env.particle_count(), BURST_COUNT);
}

#[test]
fn test_particles_expire_on_their_own() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();
    let player = env.player_position().unwrap();
    env.place_obstacle(player, 30.0, 0.0);
    env.step(Action::Hold).unwrap();
    assert_eq!(env.particle_count(), BURST_COUNT);

    for _ in 0..300 {
        env.step(Action::Hold).unwrap();
    }
    assert_eq!(env.particle_count(), 0);
    assert!(env.is_done());
}

#[test]
fn test_reset_restores_fresh_episode() {
    let mut env = env_with_sensors(7);
    for _ in 0..120 {
        env.step(Action::Left).unwrap();
    }
    let observation = env.reset().unwrap();
    assert_fresh_episode(&env, &observation);
}

#[test]
fn test_frame_counter_increments_by_one() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();
    for expected in 1..=45 {
        env.step(Action::Hold).unwrap();
        assert_eq!(env.frame(), expected);
    }
    env.reset().unwrap();
    assert_eq!(env.frame(), 0);
}

#[test]
fn test_drift_right_moves_player_to_wall() {
    let mut env = env_with_sensors(5);
    env.reset().unwrap();

    let mut last_x = env.player_position().unwrap().x;
    for _ in 0..60 {
        let result = env.step(Action::Right).unwrap();
        assert!(!result.done);
        let x = env.player_position().unwrap().x;
        assert!(x >= last_x - 1.0, "x went backwards: {last_x} -> {x}");
        last_x = x;
    }
    assert!(last_x > PLAYER_START.0 + 300.0);
    assert!(last_x <= WORLD_WIDTH);
}

#[test]
fn test_same_seed_same_trajectory() {
    let mut a = env_with_sensors(5);
    let mut b = env_with_sensors(5);
    let actions = [Action::Left, Action::Right, Action::Hold];

    for i in 0..240 {
        let action = actions[i % 3];
        let ra = a.step(action).unwrap();
        let rb = b.step(action).unwrap();
        assert_eq!(ra, rb);
    }
    assert_eq!(a.obstacle_count(), b.obstacle_count());
}

/// Position and drift of the newest obstacle after each of `steps` steps
fn spawn_stream(env: &mut Environment, steps: usize) -> Vec<(Vec2, f32)> {
    (0..steps)
        .map(|_| {
            env.step(Action::Hold).unwrap();
            let newest = *env.registry().obstacles().last().unwrap();
            (env.physics().position(newest.body).unwrap(), newest.drift)
        })
        .collect()
}

#[test]
fn test_reseed_restarts_spawn_stream() {
    let config = EnvConfig {
        spawn_interval_frames: 1,
        seed: 5,
        ..Default::default()
    };
    let mut env = Environment::new(config.clone()).unwrap();
    let first = spawn_stream(&mut env, 6);

    // Reset alone continues the stream
    env.reset().unwrap();
    assert_ne!(spawn_stream(&mut env, 6), first);

    env.reseed(5);
    env.reset().unwrap();
    assert_eq!(spawn_stream(&mut env, 6), first);

    let mut other = Environment::new(EnvConfig { seed: 42, ..config }).unwrap();
    other.reseed(5);
    other.reset().unwrap();
    assert_eq!(spawn_stream(&mut other, 6), first);
}

#[test]
fn test_population_never_exceeds_cap() {
    let mut env = Environment::new(EnvConfig {
        max_obstacles: 3,
        spawn_interval_frames: 5,
        ..Default::default()
    })
    .unwrap();

    for _ in 0..200 {
        env.step(Action::Hold).unwrap();
        // One spawn may land after culling within the step
        assert!(env.obstacle_count() <= 4);
    }
}
