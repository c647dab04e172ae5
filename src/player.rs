/// Player physics: walking, jumping, gravity, platform riding and swimming.
///
/// Each function advances the player by exactly one tick.  Collision is
/// resolved per axis against the integer grid: horizontal motion either
/// happens in full or not at all, vertical motion snaps flush to whatever
/// it hits.

use crate::config::GameConfig;
use crate::entities::{Action, GameEvent, InputState, Player, PlayerPose, SwimStroke};
use crate::geometry::Rect;
use crate::world::TileWorld;

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn spawn_player(config: &GameConfig) -> Player {
    let (x, y) = config.start_position;
    let (w, h) = config.player_size;
    Player {
        rect: Rect::new(x, y, w, h),
        vel_y: 0,
        health: config.start_health.clamp(0, config.max_health),
        max_health: config.max_health,
        pose: PlayerPose::Standing(1),
        facing: 0,
        walk_counter: 0,
        walk_index: 0,
        idle_counter: 0,
        stand_index: 0,
        jump_held: false,
        in_air: false,
    }
}

/// Move the player back to the level-start anchor.
pub fn reset_position(player: &mut Player, config: &GameConfig) {
    player.rect.x = config.start_position.0;
    player.rect.y = config.start_position.1;
}

/// Add `delta` to health, clamped to `0..=max_health`.
pub fn adjust_health(player: &mut Player, delta: i32) {
    player.health = (player.health + delta).clamp(0, player.max_health);
}

// ── Ground mode ──────────────────────────────────────────────────────────────

/// One tick of walking/jumping physics.  Pushes `JumpTriggered` on launch.
pub fn control(
    player: &mut Player,
    world: &TileWorld,
    input: &InputState,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let mut dx = 0;
    let mut dy = 0;

    let left = input.is_held(Action::MoveLeft);
    let right = input.is_held(Action::MoveRight);
    let jump = input.is_held(Action::Jump);
    let duck = input.is_held(Action::Duck);

    if left {
        dx -= config.walk_speed;
        player.walk_counter += 1;
        player.facing = -1;
    }
    if right {
        dx += config.walk_speed;
        player.walk_counter += 1;
        player.facing = 1;
    }

    if jump && !player.jump_held && !player.in_air {
        player.vel_y = config.jump_velocity;
        player.jump_held = true;
        player.pose = PlayerPose::Jumping;
        events.push(GameEvent::JumpTriggered);
    }
    if !jump {
        player.jump_held = false;
    }

    if duck {
        player.pose = PlayerPose::Ducking;
    }

    if !left && !right && !jump && !duck {
        player.idle_counter += 1;
        player.pose = PlayerPose::Standing(player.stand_index);
    }

    // ── Animation ────────────────────────────────────────────────────────────
    if player.walk_counter > config.walk_frame_delay {
        player.walk_counter = 0;
        player.walk_index = (player.walk_index + 1) % config.walk_frames.max(1);
        // Ducking keeps its pose while the walk frames tick on.
        if player.facing != 0 && !duck {
            player.pose = PlayerPose::Walking(player.walk_index);
        }
    }
    if player.idle_counter > config.idle_frame_delay {
        player.idle_counter = 0;
        player.stand_index = (player.stand_index + 1) % config.stand_frames.max(1);
    }

    // ── Gravity ──────────────────────────────────────────────────────────────
    player.vel_y = (player.vel_y + config.gravity).min(config.max_fall_speed);
    dy += player.vel_y;

    // Airborne unless something below catches us this tick.
    player.in_air = true;

    // ── Static tiles ─────────────────────────────────────────────────────────
    if !world.query_collision(&player.rect.offset(dx, 0)).is_empty() {
        dx = 0;
    }
    let hits = world.query_collision(&player.rect.offset(0, dy));
    if player.vel_y < 0 {
        if let Some(ceiling) = hits.iter().map(|t| t.rect.bottom()).max() {
            dy = ceiling - player.rect.top();
            player.vel_y = 0;
        }
    } else if let Some(floor) = hits.iter().map(|t| t.rect.top()).min() {
        dy = floor - player.rect.bottom();
        player.vel_y = 0;
        player.in_air = false;
    }

    // ── Platforms ────────────────────────────────────────────────────────────
    let tolerance = config.platform_tolerance;
    for platform in world.platforms() {
        let p = &platform.rect;
        if p.overlaps(&player.rect.offset(dx, 0)) {
            dx = 0;
        }
        if p.overlaps(&player.rect.offset(0, dy)) {
            if (player.rect.top() + dy - p.bottom()).abs() < tolerance {
                player.vel_y = 0;
                dy = p.bottom() - player.rect.top();
            } else if (player.rect.bottom() + dy - p.top()).abs() < tolerance {
                player.rect.set_bottom(p.top() - 1);
                dy = 0;
                player.in_air = false;
            }
            if platform.moves_x() {
                player.rect.x += platform.move_direction;
            }
        }
    }

    player.rect.x += dx;
    player.rect.y += dy;
}

// ── Water mode ───────────────────────────────────────────────────────────────

/// One tick of swimming: no gravity, small strokes, tiles block strokes.
pub fn swim(player: &mut Player, world: &TileWorld, input: &InputState, config: &GameConfig) {
    let mut dx = 0;
    let mut dy = 0;
    player.pose = PlayerPose::Swimming(SwimStroke::Drift);

    // Water holds the player up: surfacing with a fresh jump press leaps out.
    player.in_air = false;
    if !input.is_held(Action::Jump) {
        player.jump_held = false;
    }

    // Water holds no momentum into or out of a swim.
    player.vel_y = 0;

    // Embedded in a tile (the water nudge can do that): back out one pixel,
    // up off a tile below the player's centre and down from one above it.
    let centre = player.rect.top() + player.rect.h / 2;
    if let Some(tile) = world.query_collision(&player.rect).first() {
        dy += if tile.rect.top() + tile.rect.h / 2 >= centre { -1 } else { 1 };
    }

    // Strokes are tested from the backed-out position; a blocked axis
    // simply does not move this tick.
    let rect = player.rect.offset(0, dy);
    let blocked = |dx: i32, dy: i32| !world.query_collision(&rect.offset(dx, dy)).is_empty();

    if input.is_held(Action::Jump) {
        if !blocked(0, -config.swim_rise) {
            dy -= config.swim_rise;
        }
        player.pose = PlayerPose::Swimming(SwimStroke::Up);
    }
    if input.is_held(Action::MoveRight) {
        if !blocked(config.swim_stroke, 0) {
            dx += config.swim_stroke;
        }
        player.pose = PlayerPose::Swimming(SwimStroke::Right);
    }
    if input.is_held(Action::MoveLeft) {
        if !blocked(-config.swim_stroke, 0) {
            dx -= config.swim_stroke;
        }
        player.pose = PlayerPose::Swimming(SwimStroke::Left);
    }

    player.rect.x += dx;
    player.rect.y += dy;
}

// ── Dead ─────────────────────────────────────────────────────────────────────

/// Drift upward until the ceiling offset, then hold.
pub fn ascend(player: &mut Player, config: &GameConfig) {
    player.pose = PlayerPose::Ascending;
    if player.rect.y > config.ascend_ceiling {
        player.rect.y = (player.rect.y - config.ascend_speed).max(config.ascend_ceiling);
    }
}
