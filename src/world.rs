/// The static collision grid of one level plus its categorised entities.

use rand::Rng;
use tracing::{debug, trace};

use crate::assets::AssetRegistry;
use crate::config::GameConfig;
use crate::entities::{Door, MobileEntity, MobileKind, MoveAxis, Pickup, Tile, TileKind, WaterCell};
use crate::geometry::Rect;
use crate::levels::{LevelGrid, TileCode};
use crate::mobile::{spawn_mobile, update_mobile};

#[derive(Clone, Debug)]
pub struct TileWorld {
    tiles: Vec<Tile>,
    mobiles: Vec<MobileEntity>,
    water: Vec<WaterCell>,
    under_water: Vec<WaterCell>,
    pickups: Vec<Pickup>,
    doors: Vec<Door>,
    size: (i32, i32),
}

impl TileWorld {
    /// Materialise every cell of `grid` once.  Unknown codes are empty
    /// cells.  `rng` only picks sprite variants.
    pub fn build(
        grid: &LevelGrid,
        config: &GameConfig,
        assets: &AssetRegistry,
        rng: &mut impl Rng,
    ) -> Self {
        let t = config.tile_size;
        let mut world = TileWorld {
            tiles: Vec::new(),
            mobiles: Vec::new(),
            water: Vec::new(),
            under_water: Vec::new(),
            pickups: Vec::new(),
            doors: Vec::new(),
            size: (grid.cols() as i32 * t, grid.rows() as i32 * t),
        };

        let mobile_side = config.mobile_size();
        let (platform_w, platform_h) = config.platform_size();
        let pickup_side = config.pickup_size();

        for (col, row, code) in grid.iter() {
            let (x, y) = (col as i32 * t, row as i32 * t);
            let cell = Rect::new(x, y, t, t);
            let inset = Rect::new(x + config.mobile_inset, y + config.mobile_inset, mobile_side, mobile_side);

            let Some(tile) = TileCode::from_code(code) else {
                trace!(col, row, code, "skipping unrecognised tile code");
                continue;
            };
            match tile {
                TileCode::Ground => world.tiles.push(Tile {
                    col,
                    row,
                    kind: TileKind::Ground,
                    rect: cell,
                    sprite: assets.ground,
                }),
                TileCode::Grass => world.tiles.push(Tile {
                    col,
                    row,
                    kind: TileKind::Grass,
                    rect: cell,
                    sprite: assets.grass,
                }),
                TileCode::WaterSurface => world.water.push(WaterCell { rect: cell, deep: false }),
                TileCode::DeepWater => world.water.push(WaterCell { rect: cell, deep: true }),
                TileCode::UnderWater => world.under_water.push(WaterCell { rect: cell, deep: true }),
                TileCode::Hazard => world.mobiles.push(spawn_mobile(
                    MobileKind::Hazard,
                    inset,
                    MoveAxis::Horizontal,
                    assets.random_hazard(rng),
                )),
                TileCode::Flower => world.pickups.push(Pickup {
                    rect: Rect::centered(x + t / 2, y + t - 8, pickup_side, pickup_side),
                    sprite: assets.random_flower(rng),
                }),
                TileCode::PlatformX | TileCode::PlatformY => {
                    let axis = if tile == TileCode::PlatformX {
                        MoveAxis::Horizontal
                    } else {
                        MoveAxis::Vertical
                    };
                    world.mobiles.push(spawn_mobile(
                        MobileKind::Platform,
                        Rect::new(x, y, platform_w, platform_h),
                        axis,
                        [assets.platform, assets.platform],
                    ));
                }
                TileCode::FlyerX | TileCode::FlyerY => {
                    let axis = if tile == TileCode::FlyerX {
                        MoveAxis::Horizontal
                    } else {
                        MoveAxis::Vertical
                    };
                    world.mobiles.push(spawn_mobile(
                        MobileKind::FlyingHazard,
                        inset,
                        axis,
                        assets.random_flyer(rng),
                    ));
                }
                TileCode::Door => world.doors.push(Door { rect: cell }),
            }
        }

        debug!(
            tiles = world.tiles.len(),
            mobiles = world.mobiles.len(),
            pickups = world.pickups.len(),
            doors = world.doors.len(),
            "built tile world"
        );
        world
    }

    // ── Collision queries ────────────────────────────────────────────────────

    /// Static tiles overlapping `rect`.
    pub fn query_collision(&self, rect: &Rect) -> Vec<&Tile> {
        self.tiles.iter().filter(|tile| tile.rect.overlaps(rect)).collect()
    }

    pub fn touches_water(&self, rect: &Rect) -> bool {
        self.water.iter().any(|w| w.rect.overlaps(rect))
    }

    pub fn touches_deep_water(&self, rect: &Rect) -> bool {
        self.under_water.iter().any(|w| w.rect.overlaps(rect))
    }

    /// Ground hazards and flyers alike.
    pub fn touches_hazard(&self, rect: &Rect) -> bool {
        self.mobiles
            .iter()
            .filter(|m| m.kind != MobileKind::Platform)
            .any(|m| m.rect.overlaps(rect))
    }

    pub fn touches_door(&self, rect: &Rect) -> bool {
        self.doors.iter().any(|d| d.rect.overlaps(rect))
    }

    pub fn touches_pickup(&self, rect: &Rect) -> bool {
        self.pickups.iter().any(|p| p.rect.overlaps(rect))
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Remove every pickup overlapping `rect`; returns how many went.
    pub fn take_pickups(&mut self, rect: &Rect) -> usize {
        let before = self.pickups.len();
        self.pickups.retain(|p| !p.rect.overlaps(rect));
        before - self.pickups.len()
    }

    pub fn add_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    pub fn clear_doors(&mut self) {
        self.doors.clear();
    }

    /// Advance every hazard, flyer and platform by one tick.
    pub fn update_mobiles(&mut self, config: &GameConfig) {
        for mobile in &mut self.mobiles {
            update_mobile(mobile, config);
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn mobiles(&self) -> &[MobileEntity] {
        &self.mobiles
    }

    pub fn platforms(&self) -> impl Iterator<Item = &MobileEntity> {
        self.mobiles.iter().filter(|m| m.kind == MobileKind::Platform)
    }

    pub fn water(&self) -> &[WaterCell] {
        &self.water
    }

    pub fn under_water(&self) -> &[WaterCell] {
        &self.under_water
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// World bounds in pixels: (cols × tile, rows × tile).
    pub fn pixel_size(&self) -> (i32, i32) {
        self.size
    }
}
