/// Opaque handles for sprites and sounds.
///
/// The registry is populated once at startup and only ever read during a
/// tick.  Entities store the `Copy` handles they need; the shell resolves a
/// handle back to its name when it draws or plays something.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle(u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(u16);

/// Two-frame animation used by hazards and flyers.
pub type FramePair = [SpriteHandle; 2];

#[derive(Clone, Debug)]
pub struct PlayerSprites {
    pub stand: Vec<SpriteHandle>,
    pub walk: Vec<SpriteHandle>,
    pub jump: SpriteHandle,
    pub duck: SpriteHandle,
    pub dive: SpriteHandle,
    pub angel: SpriteHandle,
}

#[derive(Clone, Debug)]
pub struct AssetRegistry {
    sprite_names: Vec<&'static str>,
    sound_names: Vec<&'static str>,

    pub ground: SpriteHandle,
    pub grass: SpriteHandle,
    pub platform: SpriteHandle,
    pub water: SpriteHandle,
    pub deep_water: SpriteHandle,
    pub door: SpriteHandle,
    pub player: PlayerSprites,
    pub hazards: Vec<FramePair>,
    pub flyers: Vec<FramePair>,
    pub flowers: Vec<SpriteHandle>,

    pub jump_sound: SoundHandle,
    pub score_sound: SoundHandle,
    pub game_over_sound: SoundHandle,
}

const STAND_FRAMES: [&str; 6] = ["stand0", "stand1", "stand2", "stand3", "stand4", "stand5"];
const WALK_FRAMES: [&str; 8] = [
    "walk0", "walk1", "walk2", "walk3", "walk4", "walk5", "walk6", "walk7",
];
const HAZARD_FRAMES: [(&str, &str); 8] = [
    ("worm0", "worm1"),
    ("barnacle0", "barnacle1"),
    ("frog", "frog_move"),
    ("ladybug", "ladybug_move"),
    ("mouse", "mouse_move"),
    ("saw", "saw_move"),
    ("slime", "slime_move"),
    ("snail", "snail_move"),
];
const FLYER_FRAMES: [(&str, &str); 2] = [("bee", "bee_move"), ("fly", "fly_move")];
const FLOWER_FRAMES: [&str; 7] = [
    "flower0", "flower1", "flower2", "flower3", "flower4", "flower5", "flower6",
];

impl AssetRegistry {
    /// The full catalogue the game ships with.
    pub fn standard() -> Self {
        let mut sprites = Vec::new();
        let mut sounds = Vec::new();

        let mut sprite = |name: &'static str| {
            sprites.push(name);
            SpriteHandle((sprites.len() - 1) as u16)
        };

        let ground = sprite("ground");
        let grass = sprite("grass");
        let platform = sprite("platform");
        let water = sprite("water");
        let deep_water = sprite("deep_water");
        let door = sprite("door");
        let player = PlayerSprites {
            stand: STAND_FRAMES.iter().map(|n| sprite(*n)).collect(),
            walk: WALK_FRAMES.iter().map(|n| sprite(*n)).collect(),
            jump: sprite("jump"),
            duck: sprite("duck"),
            dive: sprite("dive"),
            angel: sprite("angel"),
        };
        let hazards = HAZARD_FRAMES
            .iter()
            .map(|(a, b)| [sprite(*a), sprite(*b)])
            .collect();
        let flyers = FLYER_FRAMES
            .iter()
            .map(|(a, b)| [sprite(*a), sprite(*b)])
            .collect();
        let flowers = FLOWER_FRAMES.iter().map(|n| sprite(*n)).collect();

        let mut sound = |name: &'static str| {
            sounds.push(name);
            SoundHandle((sounds.len() - 1) as u16)
        };
        let jump_sound = sound("jump");
        let score_sound = sound("score");
        let game_over_sound = sound("game_over");

        AssetRegistry {
            sprite_names: sprites,
            sound_names: sounds,
            ground,
            grass,
            platform,
            water,
            deep_water,
            door,
            player,
            hazards,
            flyers,
            flowers,
            jump_sound,
            score_sound,
            game_over_sound,
        }
    }

    pub fn sprite_name(&self, handle: SpriteHandle) -> &'static str {
        self.sprite_names.get(handle.0 as usize).copied().unwrap_or("")
    }

    pub fn sound_name(&self, handle: SoundHandle) -> &'static str {
        self.sound_names.get(handle.0 as usize).copied().unwrap_or("")
    }

    pub fn sprite_count(&self) -> usize {
        self.sprite_names.len()
    }

    /// Sound cue for an event, if it has one.
    pub fn sound_for(&self, event: &GameEvent) -> Option<SoundHandle> {
        match event {
            GameEvent::JumpTriggered => Some(self.jump_sound),
            GameEvent::ScoreTriggered => Some(self.score_sound),
            GameEvent::GameOverTriggered => Some(self.game_over_sound),
            GameEvent::LevelEntered { .. } => None,
        }
    }

    // ── Variant selection (appearance only) ──────────────────────────────────

    pub fn random_hazard(&self, rng: &mut impl Rng) -> FramePair {
        pick_pair(&self.hazards, self.ground, rng)
    }

    pub fn random_flyer(&self, rng: &mut impl Rng) -> FramePair {
        pick_pair(&self.flyers, self.ground, rng)
    }

    pub fn random_flower(&self, rng: &mut impl Rng) -> SpriteHandle {
        self.flowers.choose(rng).copied().unwrap_or(self.grass)
    }
}

fn pick_pair(sets: &[FramePair], fallback: SpriteHandle, rng: &mut impl Rng) -> FramePair {
    sets.choose(rng).copied().unwrap_or([fallback, fallback])
}
