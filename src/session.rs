/// Level and game sessions: the per-tick interaction rules and the level
/// progression state machine.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::assets::AssetRegistry;
use crate::config::GameConfig;
use crate::entities::{
    Action, ControlMode, FrameOutcome, GameEvent, GameStatus, InputState, LevelPhase, Pickup,
    Player,
};
use crate::geometry::Rect;
use crate::levels::LevelGrid;
use crate::player::{adjust_health, ascend, control, reset_position, spawn_player, swim};
use crate::world::TileWorld;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no levels to play")]
    NoLevels,
    #[error("start level {start} is outside 1..={count}")]
    StartLevelOutOfRange { start: usize, count: usize },
}

/// Result of one level tick, as seen by the game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelOutcome {
    Continue,
    ExitReached,
}

// ── Level session ─────────────────────────────────────────────────────────────

/// One live level: its world, the player inside it, and the carried score.
#[derive(Clone, Debug)]
pub struct LevelSession {
    world: TileWorld,
    player: Player,
    level: usize,
    score: u32,
    mode: ControlMode,
    phase: LevelPhase,
    damaged: bool,
}

impl LevelSession {
    pub fn new(
        level: usize,
        grid: &LevelGrid,
        config: &GameConfig,
        assets: &AssetRegistry,
        rng: &mut impl Rng,
    ) -> Self {
        let mut world = TileWorld::build(grid, config, assets, rng);
        world.add_pickup(score_pickup(config, assets, rng));
        LevelSession {
            world,
            player: spawn_player(config),
            level,
            score: 0,
            mode: ControlMode::Ground,
            phase: LevelPhase::Playing,
            damaged: false,
        }
    }

    /// Swap in the world for `level`, keeping the player's health and the
    /// score.  The old world is dropped wholesale.
    pub fn enter_level(
        &mut self,
        level: usize,
        grid: &LevelGrid,
        config: &GameConfig,
        assets: &AssetRegistry,
        rng: &mut impl Rng,
    ) {
        self.world = TileWorld::build(grid, config, assets, rng);
        self.world.add_pickup(score_pickup(config, assets, rng));
        reset_position(&mut self.player, config);
        self.level = level;
        self.mode = ControlMode::Ground;
        info!(level, score = self.score, health = self.player.health, "entered level");
    }

    /// Close the level for good: doors vanish so the exit cannot re-fire.
    pub fn complete(&mut self) {
        self.world.clear_doors();
        self.phase = LevelPhase::LevelComplete;
    }

    /// Advance one tick.  Steps run in a fixed order: mobiles, ground
    /// control, water, hazards, death, pickups, door, dead drift.
    pub fn tick(
        &mut self,
        input: &InputState,
        config: &GameConfig,
        events: &mut Vec<GameEvent>,
    ) -> LevelOutcome {
        self.world.update_mobiles(config);
        self.damaged = false;
        let playing = self.phase == LevelPhase::Playing;

        if playing && self.mode == ControlMode::Ground {
            control(&mut self.player, &self.world, input, config, events);
        }

        // ── Water ────────────────────────────────────────────────────────────
        if playing && self.world.touches_water(&self.player.rect) {
            self.player.rect.y += config.water_nudge;
            self.mode = ControlMode::Swimming;
            swim(&mut self.player, &self.world, input, config);
            if !self.world.touches_water(&self.player.rect) {
                self.mode = ControlMode::Ground;
            }
            if self.world.touches_deep_water(&self.player.rect) {
                self.damage(config.deep_water_damage);
            }
        } else {
            self.mode = ControlMode::Ground;
        }

        // ── Hazards ──────────────────────────────────────────────────────────
        if playing && self.world.touches_hazard(&self.player.rect) {
            self.damage(config.hazard_damage);
        }

        if playing && self.damaged && self.player.health == 0 {
            self.phase = LevelPhase::Dead;
            events.push(GameEvent::GameOverTriggered);
            info!(level = self.level, score = self.score, "player died");
        }

        // ── Pickups ──────────────────────────────────────────────────────────
        let playing = self.phase == LevelPhase::Playing;
        if playing
            && input.is_held(Action::Collect)
            && self.world.take_pickups(&self.player.rect) > 0
        {
            self.score += 1;
            adjust_health(&mut self.player, config.pickup_health);
            events.push(GameEvent::ScoreTriggered);
        }

        if self.phase == LevelPhase::Dead {
            ascend(&mut self.player, config);
        }

        if playing && self.world.touches_door(&self.player.rect) {
            return LevelOutcome::ExitReached;
        }
        LevelOutcome::Continue
    }

    fn damage(&mut self, amount: i32) {
        adjust_health(&mut self.player, -amount);
        self.damaged = true;
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Whether damage landed during the last tick.
    pub fn damaged(&self) -> bool {
        self.damaged
    }
}

fn score_pickup(config: &GameConfig, assets: &AssetRegistry, rng: &mut impl Rng) -> Pickup {
    let (cx, cy) = config.score_pickup_center();
    let side = config.pickup_size();
    Pickup {
        rect: Rect::centered(cx, cy, side, side),
        sprite: assets.random_flower(rng),
    }
}

// ── Game session ──────────────────────────────────────────────────────────────

/// Sequences levels and surfaces the terminal outcomes to the shell.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    assets: AssetRegistry,
    levels: Vec<LevelGrid>,
    start_level: usize,
    current: LevelSession,
    status: GameStatus,
}

impl GameSession {
    /// `start_level` is 1-based.
    pub fn new(
        config: GameConfig,
        assets: AssetRegistry,
        levels: Vec<LevelGrid>,
        start_level: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, SessionError> {
        let grid = match levels.get(start_level.wrapping_sub(1)) {
            Some(grid) => grid,
            None if levels.is_empty() => return Err(SessionError::NoLevels),
            None => {
                return Err(SessionError::StartLevelOutOfRange {
                    start: start_level,
                    count: levels.len(),
                })
            }
        };
        let current = LevelSession::new(start_level, grid, &config, &assets, rng);
        info!(level = start_level, levels = levels.len(), "game session started");
        Ok(GameSession {
            config,
            assets,
            levels,
            start_level,
            current,
            status: GameStatus::Playing,
        })
    }

    /// Run one fixed tick with the actions held this frame.
    pub fn advance(&mut self, input: &InputState, rng: &mut impl Rng) -> FrameOutcome {
        let mut events = Vec::new();

        if self.current.tick(input, &self.config, &mut events) == LevelOutcome::ExitReached {
            let level = self.current.level();
            match self.levels.get(level) {
                Some(grid) => {
                    self.current
                        .enter_level(level + 1, grid, &self.config, &self.assets, rng);
                    events.push(GameEvent::LevelEntered { level: level + 1 });
                }
                None => {
                    self.current.complete();
                    self.status = GameStatus::Finished;
                    info!(score = self.current.score(), "game finished");
                }
            }
        }

        if self.current.phase() == LevelPhase::Dead {
            self.status = GameStatus::Restart;
        }

        FrameOutcome {
            events,
            status: self.status,
        }
    }

    /// Throw the whole run away and start again from the first level played.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        if let Some(grid) = self.levels.get(self.start_level - 1) {
            self.current = LevelSession::new(self.start_level, grid, &self.config, &self.assets, rng);
            self.status = GameStatus::Playing;
            info!(level = self.start_level, "game session restarted");
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current(&self) -> &LevelSession {
        &self.current
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
