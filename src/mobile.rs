/// Per-tick movement and animation for hazards, flyers and platforms.
///
/// Every kind runs the same oscillator: a tick counter that flips the move
/// direction whenever its magnitude passes the turning point.  Reversal is
/// driven by ticks, never by position, so collisions cannot change it.

use crate::assets::{FramePair, SpriteHandle};
use crate::config::GameConfig;
use crate::entities::{MobileEntity, MobileKind, MoveAxis};
use crate::geometry::Rect;

pub fn spawn_mobile(kind: MobileKind, rect: Rect, axis: MoveAxis, frames: FramePair) -> MobileEntity {
    // Source art faces left; the +1 direction shows it mirrored.
    MobileEntity {
        kind,
        rect,
        axis,
        move_direction: 1,
        move_counter: 0,
        anim_counter: 0,
        frame_index: 0,
        frames,
        sprite: frames[0],
        flip_x: kind != MobileKind::Platform,
    }
}

/// Advance one entity by a single tick.
pub fn update_mobile(mobile: &mut MobileEntity, config: &GameConfig) {
    mobile.move_counter += 1;
    mobile.anim_counter += 1;

    match mobile.axis {
        MoveAxis::Horizontal => mobile.rect.x += mobile.move_direction,
        MoveAxis::Vertical => mobile.rect.y += mobile.move_direction,
    }

    if mobile.move_counter.abs() > config.turning_point {
        mobile.move_direction = -mobile.move_direction;
        mobile.move_counter = -mobile.move_counter;
    }

    // Platforms share the oscillator but have a single still frame.
    if mobile.kind == MobileKind::Platform {
        return;
    }

    if mobile.anim_counter > config.mobile_frame_delay {
        mobile.anim_counter = 0;
        mobile.frame_index = (mobile.frame_index + 1) % mobile.frames.len();
        let (sprite, flip_x) = frame_for(&mobile.frames, mobile.frame_index, mobile.move_direction);
        mobile.sprite = sprite;
        mobile.flip_x = flip_x;
    }
}

fn frame_for(frames: &FramePair, index: usize, direction: i32) -> (SpriteHandle, bool) {
    (frames[index], direction > 0)
}
