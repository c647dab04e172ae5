/// Draw commands and HUD numbers for the shell.  No drawing happens here;
/// every live entity is mapped to "draw sprite S at rectangle R".

use crate::assets::{AssetRegistry, SpriteHandle};
use crate::entities::{GameStatus, LevelPhase, MobileKind, Player, PlayerPose};
use crate::geometry::Rect;
use crate::session::GameSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Tile,
    Water,
    Hazard,
    Pickup,
    Platform,
    Door,
    Player,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub sprite: SpriteHandle,
    pub rect: Rect,
    pub flip_x: bool,
    /// Clockwise, in degrees.
    pub rotation: u16,
}

impl DrawCommand {
    fn plain(layer: Layer, sprite: SpriteHandle, rect: Rect) -> Self {
        DrawCommand { layer, sprite, rect, flip_x: false, rotation: 0 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub level: usize,
    pub score: u32,
    pub health: i32,
    pub max_health: i32,
    pub dead: bool,
    pub level_complete: bool,
    pub finished: bool,
}

impl GameSession {
    /// Everything to draw this frame, back to front.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let assets = self.assets();
        let world = self.current().world();
        let mut list = Vec::new();

        list.extend(
            world
                .tiles()
                .iter()
                .map(|t| DrawCommand::plain(Layer::Tile, t.sprite, t.rect)),
        );
        list.extend(world.water().iter().chain(world.under_water()).map(|w| {
            let sprite = if w.deep { assets.deep_water } else { assets.water };
            DrawCommand::plain(Layer::Water, sprite, w.rect)
        }));

        // Hazards, flyers, pickups, platforms, doors: the reference layering.
        for kind in [MobileKind::Hazard, MobileKind::FlyingHazard] {
            list.extend(world.mobiles().iter().filter(|m| m.kind == kind).map(|m| {
                DrawCommand {
                    flip_x: m.flip_x,
                    ..DrawCommand::plain(Layer::Hazard, m.sprite, m.rect)
                }
            }));
        }
        list.extend(
            world
                .pickups()
                .iter()
                .map(|p| DrawCommand::plain(Layer::Pickup, p.sprite, p.rect)),
        );
        list.extend(
            world
                .platforms()
                .map(|m| DrawCommand::plain(Layer::Platform, m.sprite, m.rect)),
        );
        list.extend(
            world
                .doors()
                .iter()
                .map(|d| DrawCommand::plain(Layer::Door, assets.door, d.rect)),
        );

        list.push(player_command(self.current().player(), assets));
        list
    }

    pub fn hud(&self) -> Hud {
        let current = self.current();
        Hud {
            level: current.level(),
            score: current.score(),
            health: current.player().health,
            max_health: current.player().max_health,
            dead: current.phase() == LevelPhase::Dead,
            level_complete: current.phase() == LevelPhase::LevelComplete,
            finished: self.status() == GameStatus::Finished,
        }
    }
}

fn player_command(player: &Player, assets: &AssetRegistry) -> DrawCommand {
    let sprites = &assets.player;
    let frame = |frames: &[SpriteHandle], i: usize| frames.get(i).copied().unwrap_or(sprites.jump);

    let (sprite, flip_x, rotation) = match player.pose {
        PlayerPose::Standing(i) => (frame(sprites.stand.as_slice(), i), false, 0),
        // Walk frames face right; mirrored when heading left.
        PlayerPose::Walking(i) => (frame(sprites.walk.as_slice(), i), player.facing < 0, 0),
        PlayerPose::Jumping => (sprites.jump, false, 0),
        PlayerPose::Ducking => (sprites.duck, false, 0),
        PlayerPose::Swimming(stroke) => (sprites.dive, false, stroke.rotation_degrees()),
        PlayerPose::Ascending => (sprites.angel, false, 0),
    };
    DrawCommand {
        layer: Layer::Player,
        sprite,
        rect: player.rect,
        flip_x,
        rotation,
    }
}
