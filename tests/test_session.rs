use snowline::assets::AssetRegistry;
use snowline::config::GameConfig;
use snowline::entities::*;
use snowline::levels::{builtin, LevelGrid};
use snowline::render::Layer;
use snowline::session::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Start anchor sits on the floor of the three-row test levels below.
fn test_config() -> GameConfig {
    GameConfig {
        start_position: (100, 50),
        ..GameConfig::default()
    }
}

fn grids(texts: &[&str]) -> Vec<LevelGrid> {
    texts.iter().map(|t| LevelGrid::parse(t).unwrap()).collect()
}

fn session(config: GameConfig, texts: &[&str]) -> (GameSession, StdRng) {
    let mut rng = StdRng::seed_from_u64(42);
    let game = GameSession::new(config, AssetRegistry::standard(), grids(texts), 1, &mut rng).unwrap();
    (game, rng)
}

fn step(game: &mut GameSession, rng: &mut StdRng, actions: &[Action]) -> FrameOutcome {
    game.advance(&InputState::with(actions), rng)
}

const PLAIN: &str = "
    . . . . . .
    . . . . . .
    0 0 0 0 0 0
";

const HAZARD: &str = "
    . . . . . .
    . . 5 . . .
    0 0 0 0 0 0
";

const FLOWER: &str = "
    . . . . . .
    . . 6 . . .
    0 0 0 0 0 0
";

const DOOR: &str = "
    . . . . . .
    . . 10 . . .
    0 0 0 0 0 0
";

// ── construction ──────────────────────────────────────────────────────────────

#[test]
fn new_session_starts_on_requested_level() {
    let mut rng = StdRng::seed_from_u64(1);
    let game = GameSession::new(
        test_config(),
        AssetRegistry::standard(),
        grids(&[PLAIN, FLOWER]),
        2,
        &mut rng,
    )
    .unwrap();
    assert_eq!(game.current().level(), 2);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.level_count(), 2);
    // Level flower plus the score pickup.
    assert_eq!(game.current().world().pickups().len(), 2);
}

#[test]
fn new_session_rejects_bad_level_choices() {
    let mut rng = StdRng::seed_from_u64(1);
    let assets = AssetRegistry::standard();

    let err = GameSession::new(test_config(), assets.clone(), Vec::new(), 1, &mut rng).unwrap_err();
    assert_eq!(err, SessionError::NoLevels);

    let err = GameSession::new(test_config(), assets.clone(), grids(&[PLAIN, PLAIN]), 3, &mut rng)
        .unwrap_err();
    assert_eq!(err, SessionError::StartLevelOutOfRange { start: 3, count: 2 });

    let err = GameSession::new(test_config(), assets, grids(&[PLAIN, PLAIN]), 0, &mut rng)
        .unwrap_err();
    assert_eq!(err, SessionError::StartLevelOutOfRange { start: 0, count: 2 });
}

// ── hazards and death ─────────────────────────────────────────────────────────

#[test]
fn hazard_drains_one_health_per_tick() {
    let (mut game, mut rng) = session(test_config(), &[HAZARD]);
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.current().player().health, 49);
    assert!(game.current().damaged());
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.current().player().health, 48);
}

#[test]
fn no_damage_without_contact() {
    let (mut game, mut rng) = session(test_config(), &[PLAIN]);
    for _ in 0..50 {
        step(&mut game, &mut rng, &[]);
    }
    assert_eq!(game.current().player().health, 50);
    assert!(!game.current().damaged());
}

#[test]
fn death_freezes_control_and_drifts_up() {
    let config = GameConfig {
        start_health: 3,
        // The test level is shorter than the default drift ceiling.
        ascend_ceiling: 0,
        ..test_config()
    };
    let (mut game, mut rng) = session(config, &[HAZARD]);

    let mut game_overs = 0;
    for _ in 0..3 {
        let outcome = step(&mut game, &mut rng, &[]);
        game_overs += outcome
            .events
            .iter()
            .filter(|e| **e == GameEvent::GameOverTriggered)
            .count();
    }
    assert_eq!(game_overs, 1);
    assert_eq!(game.current().phase(), LevelPhase::Dead);
    assert_eq!(game.status(), GameStatus::Restart);
    assert_eq!(game.current().player().health, 0);

    let before = game.current().player().rect;
    let outcome = step(&mut game, &mut rng, &[Action::MoveRight, Action::Jump]);
    let after = game.current().player().rect;
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.status, GameStatus::Restart);
    assert_eq!(after.x, before.x);
    assert_eq!(after.y, before.y - 2);
    assert_eq!(game.current().player().pose, PlayerPose::Ascending);
    assert!(game.hud().dead);
}

#[test]
fn restart_rebuilds_the_first_level() {
    let config = GameConfig {
        start_health: 1,
        ..test_config()
    };
    let (mut game, mut rng) = session(config, &[HAZARD]);
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.status(), GameStatus::Restart);

    game.restart(&mut rng);
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.current().phase(), LevelPhase::Playing);
    assert_eq!(game.current().player().health, 1);
    assert_eq!(game.current().score(), 0);
    assert_eq!(game.current().player().rect.x, 100);
}

#[test]
fn flyer_drains_health() {
    let flyer = "
        . . . . . .
        . . 9 . . .
        0 0 0 0 0 0
    ";
    let (mut game, mut rng) = session(test_config(), &[flyer]);
    step(&mut game, &mut rng, &[]);
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.current().player().health, 48);
}

#[test]
fn deep_water_and_hazard_both_hurt_in_one_tick() {
    // A flyer drops onto a swimmer over deep water.
    let pond = "
        . . 11 . . .
        . . 2 4 . .
        0 0 0 0 0 0
    ";
    let config = GameConfig {
        start_position: (120, 50),
        ..test_config()
    };
    let (mut game, mut rng) = session(config, &[pond]);
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.current().mode(), ControlMode::Swimming);
    assert_eq!(game.current().player().health, 48);
}

// ── pickups ───────────────────────────────────────────────────────────────────

#[test]
fn collect_takes_flower_and_heals() {
    let (mut game, mut rng) = session(test_config(), &[FLOWER]);

    let outcome = step(&mut game, &mut rng, &[]);
    assert!(outcome.events.is_empty());
    assert_eq!(game.current().score(), 0);

    let outcome = step(&mut game, &mut rng, &[Action::Collect]);
    assert_eq!(outcome.events, vec![GameEvent::ScoreTriggered]);
    assert_eq!(game.current().score(), 1);
    assert_eq!(game.current().player().health, 60);
    // Only the score pickup is left.
    assert_eq!(game.current().world().pickups().len(), 1);

    let outcome = step(&mut game, &mut rng, &[Action::Collect]);
    assert!(outcome.events.is_empty());
    assert_eq!(game.current().score(), 1);
}

#[test]
fn pickup_health_is_capped() {
    let config = GameConfig {
        start_health: 95,
        ..test_config()
    };
    let (mut game, mut rng) = session(config, &[FLOWER]);
    step(&mut game, &mut rng, &[Action::Collect]);
    assert_eq!(game.current().player().health, 100);
}

// ── water ─────────────────────────────────────────────────────────────────────

#[test]
fn surface_water_switches_to_swimming() {
    let water = "
        . . . . . .
        . . 2 . . .
        0 0 0 0 0 0
    ";
    let (mut game, mut rng) = session(test_config(), &[water]);
    for _ in 0..5 {
        step(&mut game, &mut rng, &[]);
    }
    assert_eq!(game.current().mode(), ControlMode::Swimming);
    assert_eq!(game.current().player().health, 50);
    assert_eq!(game.current().player().rect.y, 50);
    assert_eq!(
        game.current().player().pose,
        PlayerPose::Swimming(SwimStroke::Drift)
    );
}

#[test]
fn deep_water_hurts_swimmers() {
    let pond = "
        . . . . . .
        . . 2 4 . .
        0 0 0 0 0 0
    ";
    let config = GameConfig {
        start_position: (120, 50),
        ..test_config()
    };
    let (mut game, mut rng) = session(config, &[pond]);
    step(&mut game, &mut rng, &[]);
    assert_eq!(game.current().mode(), ControlMode::Swimming);
    assert_eq!(game.current().player().health, 49);
    assert!(game.current().damaged());
}

#[test]
fn jumping_into_floor_level_water_never_sinks() {
    let pool = "
        . . . . . .
        . . . 2 2 .
        0 0 0 0 0 0
    ";
    let (mut game, mut rng) = session(test_config(), &[pool]);
    step(&mut game, &mut rng, &[Action::MoveRight]);
    step(&mut game, &mut rng, &[Action::MoveRight]);
    step(&mut game, &mut rng, &[Action::MoveRight, Action::Jump]);
    assert_eq!(game.current().mode(), ControlMode::Swimming);
    assert_eq!(game.current().player().rect.y, 35);

    for _ in 0..80 {
        step(&mut game, &mut rng, &[]);
        let rect = game.current().player().rect;
        assert!(rect.bottom() <= 100, "sank to {rect:?}");
        assert!(game.current().world().query_collision(&rect).is_empty());
    }
    assert_eq!(game.current().player().rect.y, 50);
    assert_eq!(game.current().mode(), ControlMode::Swimming);
}

// ── doors and progression ─────────────────────────────────────────────────────

#[test]
fn last_door_finishes_the_game() {
    let (mut game, mut rng) = session(test_config(), &[DOOR]);

    let outcome = step(&mut game, &mut rng, &[]);
    assert_eq!(outcome.status, GameStatus::Finished);
    assert_eq!(game.current().phase(), LevelPhase::LevelComplete);
    assert!(game.current().world().doors().is_empty());
    assert!(game.hud().finished);
    assert!(game.hud().level_complete);
    assert!(!game.draw_list().iter().any(|c| c.layer == Layer::Door));

    let outcome = step(&mut game, &mut rng, &[]);
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.status, GameStatus::Finished);
}

#[test]
fn door_leads_to_next_level_keeping_score_and_health() {
    let first = "
        . . . . . .
        . . 6 . 10 .
        0 0 0 0 0 0
    ";
    let (mut game, mut rng) = session(test_config(), &[first, PLAIN]);

    let mut entered = None;
    for _ in 0..30 {
        let outcome = step(&mut game, &mut rng, &[Action::MoveRight, Action::Collect]);
        if let Some(e) = outcome
            .events
            .iter()
            .find(|e| matches!(e, GameEvent::LevelEntered { .. }))
        {
            entered = Some(e.clone());
            break;
        }
    }

    assert_eq!(entered, Some(GameEvent::LevelEntered { level: 2 }));
    let current = game.current();
    assert_eq!(current.level(), 2);
    assert_eq!(current.score(), 1);
    assert_eq!(current.player().health, 60);
    assert_eq!((current.player().rect.x, current.player().rect.y), (100, 50));
    assert_eq!(current.phase(), LevelPhase::Playing);
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(current.world().doors().is_empty());
}

#[test]
fn builtin_levels_spawn_on_the_floor() {
    for start in 1..=3 {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = GameSession::new(
            GameConfig::default(),
            AssetRegistry::standard(),
            builtin().unwrap(),
            start,
            &mut rng,
        )
        .unwrap();
        let spawn = game.current().player().rect;
        assert!(game.current().world().query_collision(&spawn).is_empty());

        step(&mut game, &mut rng, &[Action::MoveRight]);
        let rect = game.current().player().rect;
        assert_eq!((rect.x, rect.y), (104, 700));
    }
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn draw_list_ends_with_the_player() {
    let (game, _) = session(test_config(), &[HAZARD]);
    let list = game.draw_list();
    let last = list.last().unwrap();
    assert_eq!(last.layer, Layer::Player);
    assert_eq!(last.rect, game.current().player().rect);
    assert_eq!(list.iter().filter(|c| c.layer == Layer::Tile).count(), 6);
    assert_eq!(list.iter().filter(|c| c.layer == Layer::Hazard).count(), 1);
}

// ── whole runs ────────────────────────────────────────────────────────────────

fn random_actions(rng: &mut StdRng) -> Vec<Action> {
    let all = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Duck,
        Action::Collect,
    ];
    all.into_iter().filter(|_| rng.gen_bool(0.3)).collect()
}

#[test]
fn health_stays_in_range_over_random_play() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut input_rng = StdRng::seed_from_u64(99);
    let mut game = GameSession::new(
        GameConfig::default(),
        AssetRegistry::standard(),
        builtin().unwrap(),
        1,
        &mut rng,
    )
    .unwrap();

    for _ in 0..2000 {
        let actions = random_actions(&mut input_rng);
        let outcome = game.advance(&InputState::with(&actions), &mut rng);
        let health = game.current().player().health;
        assert!((0..=100).contains(&health));
        if outcome.status == GameStatus::Restart {
            game.restart(&mut rng);
        }
    }
}

#[test]
fn same_seed_same_frames() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(3);
        let mut input_rng = StdRng::seed_from_u64(4);
        let mut game = GameSession::new(
            GameConfig::default(),
            AssetRegistry::standard(),
            builtin().unwrap(),
            1,
            &mut rng,
        )
        .unwrap();
        for _ in 0..300 {
            let actions = random_actions(&mut input_rng);
            game.advance(&InputState::with(&actions), &mut rng);
        }
        (game.draw_list(), game.hud())
    };
    assert_eq!(run(), run());
}
