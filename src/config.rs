/// Fixed design parameters for the whole simulation.
///
/// One `GameConfig` is built at startup and handed to the session by
/// reference; nothing in the simulation reads ambient globals.

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    // ── Canvas & grid ────────────────────────────────────────────────────────
    pub tile_size: i32,
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub target_fps: u32,

    // ── Player body & health ─────────────────────────────────────────────────
    pub player_size: (i32, i32),
    pub start_position: (i32, i32),
    pub start_health: i32,
    pub max_health: i32,

    // ── Ground physics ───────────────────────────────────────────────────────
    pub walk_speed: i32,
    pub jump_velocity: i32,
    pub gravity: i32,
    pub max_fall_speed: i32,
    /// Band within which a platform contact still counts as a landing or a
    /// head bump.
    pub platform_tolerance: i32,

    // ── Player animation ─────────────────────────────────────────────────────
    pub walk_frame_delay: u32,
    pub idle_frame_delay: u32,
    pub walk_frames: usize,
    pub stand_frames: usize,

    // ── Swimming ─────────────────────────────────────────────────────────────
    pub swim_stroke: i32,
    pub swim_rise: i32,
    pub water_nudge: i32,

    // ── Mobile entities ──────────────────────────────────────────────────────
    pub turning_point: i32,
    pub mobile_frame_delay: u32,
    /// Hazards and flyers sit this far inside their cell.
    pub mobile_inset: i32,

    // ── Interactions ─────────────────────────────────────────────────────────
    pub hazard_damage: i32,
    pub deep_water_damage: i32,
    pub pickup_health: i32,
    /// Centre of the pickup re-seeded next to the score label, measured from
    /// the canvas top-right.
    pub score_pickup_offset: (i32, i32),

    // ── Dead state ───────────────────────────────────────────────────────────
    pub ascend_speed: i32,
    pub ascend_ceiling: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tile_size: 50,
            canvas_width: 800,
            canvas_height: 800,
            target_fps: 60,

            player_size: (40, 50),
            start_position: (100, 700),
            start_health: 50,
            max_health: 100,

            walk_speed: 4,
            jump_velocity: -15,
            gravity: 1,
            max_fall_speed: 10,
            platform_tolerance: 20,

            walk_frame_delay: 4,
            idle_frame_delay: 100,
            walk_frames: 8,
            stand_frames: 6,

            swim_stroke: 1,
            swim_rise: 2,
            water_nudge: 1,

            turning_point: 50,
            mobile_frame_delay: 10,
            mobile_inset: 20,

            hazard_damage: 1,
            deep_water_damage: 1,
            pickup_health: 10,
            score_pickup_offset: (126, 65),

            ascend_speed: 2,
            ascend_ceiling: 80,
        }
    }
}

impl GameConfig {
    /// Side of a hazard or flying hazard.
    pub fn mobile_size(&self) -> i32 {
        self.tile_size - self.mobile_inset
    }

    pub fn platform_size(&self) -> (i32, i32) {
        (self.tile_size, self.tile_size / 2)
    }

    pub fn pickup_size(&self) -> i32 {
        self.tile_size / 3
    }

    /// Canvas position of the score pickup's centre.
    pub fn score_pickup_center(&self) -> (i32, i32) {
        (
            self.canvas_width - self.score_pickup_offset.0,
            self.score_pickup_offset.1,
        )
    }
}
