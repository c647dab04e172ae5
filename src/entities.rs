/// All game entity types. Pure data, no logic.

use std::collections::HashSet;

use crate::assets::{FramePair, SpriteHandle};
use crate::geometry::Rect;

// ── Static tiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Ground,
    Grass,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub col: usize,
    pub row: usize,
    pub kind: TileKind,
    pub rect: Rect,
    pub sprite: SpriteHandle,
}

// ── Mobile entities ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MobileKind {
    /// Ground-dwelling worm or bug; always patrols horizontally.
    Hazard,
    FlyingHazard,
    Platform,
}

/// The single axis a mobile entity travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MobileEntity {
    pub kind: MobileKind,
    pub rect: Rect,
    pub axis: MoveAxis,
    /// Either +1 or −1.
    pub move_direction: i32,
    pub move_counter: i32,
    pub anim_counter: u32,
    pub frame_index: usize,
    pub frames: FramePair,
    /// Frame currently shown and whether it is mirrored.
    pub sprite: SpriteHandle,
    pub flip_x: bool,
}

impl MobileEntity {
    pub fn moves_x(&self) -> bool {
        self.axis == MoveAxis::Horizontal
    }

    pub fn moves_y(&self) -> bool {
        self.axis == MoveAxis::Vertical
    }
}

// ── Static interactables ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub rect: Rect,
    pub sprite: SpriteHandle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaterCell {
    pub rect: Rect,
    /// Deep cells use the darker sprite.
    pub deep: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Rotation of the dive sprite while swimming.  Purely visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwimStroke {
    Drift,
    Right,
    Up,
    Left,
}

impl SwimStroke {
    pub fn rotation_degrees(self) -> u16 {
        match self {
            SwimStroke::Drift => 0,
            SwimStroke::Right => 90,
            SwimStroke::Up => 180,
            SwimStroke::Left => 270,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPose {
    Standing(usize),
    Walking(usize),
    Jumping,
    Ducking,
    Swimming(SwimStroke),
    /// Dead and drifting upward.
    Ascending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub vel_y: i32,
    pub health: i32,
    pub max_health: i32,
    pub pose: PlayerPose,
    /// −1 left, +1 right, 0 before the first step.
    pub facing: i32,
    pub walk_counter: u32,
    pub walk_index: usize,
    pub idle_counter: u32,
    pub stand_index: usize,
    /// Set on launch; cleared only once jump is released.
    pub jump_held: bool,
    pub in_air: bool,
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Duck,
    Collect,
}

/// Logical actions held during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    held: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(actions: &[Action]) -> Self {
        InputState {
            held: actions.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Discrete happenings the shell turns into sounds or log lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    JumpTriggered,
    ScoreTriggered,
    GameOverTriggered,
    LevelEntered { level: usize },
}

/// Where the current level stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    Playing,
    Dead,
    LevelComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    Ground,
    Swimming,
}

/// Terminal state surfaced to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// The player died; the shell offers a restart.
    Restart,
    /// The last level's door was reached.
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameOutcome {
    pub events: Vec<GameEvent>,
    pub status: GameStatus,
}
