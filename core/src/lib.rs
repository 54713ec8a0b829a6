#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Rampage engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams and read-only views, and respond
//! with new command batches plus [`Cue`] values aimed at presentation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Side length of a square maze tile measured in world units.
pub const DEFAULT_TILE_LENGTH: f32 = 40.0;

/// Distance kept between an entity and the world edge when clamping.
pub const BOUNDS_MARGIN: f32 = 8.0;

/// Viewport width below which the mobile layout is selected.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Factor by which physics slows down while an enemy dodges.
pub const SLOW_MOTION_FACTOR: f32 = 3.0;

/// Screen layout the session was started with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayProfile {
    /// Landscape 800×600 playfield.
    #[default]
    Desktop,
    /// Portrait 360×640 playfield.
    Mobile,
}

impl DisplayProfile {
    /// Picks the profile matching a viewport width in pixels.
    #[must_use]
    pub const fn for_viewport_width(width: u32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Size of the playfield in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDimensions {
    width: f32,
    height: f32,
    tile_length: f32,
}

impl WorldDimensions {
    /// Creates a playfield description from explicit measurements.
    #[must_use]
    pub const fn new(width: f32, height: f32, tile_length: f32) -> Self {
        Self {
            width,
            height,
            tile_length,
        }
    }

    /// Playfield used by the provided display profile.
    #[must_use]
    pub const fn for_profile(profile: DisplayProfile) -> Self {
        match profile {
            DisplayProfile::Desktop => Self::new(800.0, 600.0, DEFAULT_TILE_LENGTH),
            DisplayProfile::Mobile => Self::new(360.0, 640.0, DEFAULT_TILE_LENGTH),
        }
    }

    /// Width of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Side length of a single tile.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Number of whole tile columns that fit the width.
    #[must_use]
    pub fn columns(&self) -> u32 {
        whole_tiles(self.width, self.tile_length)
    }

    /// Number of whole tile rows that fit the height.
    #[must_use]
    pub fn rows(&self) -> u32 {
        whole_tiles(self.height, self.tile_length)
    }

    /// Rectangle covering the whole playfield.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

impl Default for WorldDimensions {
    fn default() -> Self {
        Self::for_profile(DisplayProfile::Desktop)
    }
}

fn whole_tiles(extent: f32, tile_length: f32) -> u32 {
    if tile_length <= 0.0 || extent <= 0.0 {
        return 0;
    }
    (extent / tile_length).floor() as u32
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    /// Creates a rectangle spanning the two corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Clamps a point so it stays `margin` units away from every edge.
    ///
    /// When the rectangle is narrower than twice the margin the point is
    /// pinned to the centre of that axis.
    #[must_use]
    pub fn clamp(&self, point: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(point.x, self.min.x, self.max.x, margin),
            clamp_axis(point.y, self.min.y, self.max.y, margin),
        )
    }
}

fn clamp_axis(value: f32, min: f32, max: f32, margin: f32) -> f32 {
    let low = min + margin;
    let high = max - margin;
    if low > high {
        return (min + max) * 0.5;
    }
    value.clamp(low, high)
}

/// Contents of a single maze tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable floor.
    #[default]
    Empty,
    /// Solid obstacle.
    Wall,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Straight-line distance between two cells measured in tiles.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f32 {
        let columns = self.column.abs_diff(other.column) as f32;
        let rows = self.row.abs_diff(other.row) as f32;
        (columns * columns + rows * rows).sqrt()
    }

    /// Returns the cell displaced by the provided offsets, if it stays non-negative.
    #[must_use]
    pub fn offset(self, columns: i64, rows: i64) -> Option<CellCoord> {
        let column = u32::try_from(i64::from(self.column) + columns).ok()?;
        let row = u32::try_from(i64::from(self.row) + rows).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Dense tile layout of a maze level.
///
/// The outer ring of a grid is always [`Tile::Wall`]: [`TileGrid::bordered`]
/// builds it that way and [`TileGrid::set`] refuses to clear it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid whose border ring is walled and whose interior is empty.
    #[must_use]
    pub fn bordered(columns: u32, rows: u32, tile_length: f32) -> Self {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            tile_length,
            tiles: vec![Tile::Empty; count],
        };
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if grid.is_border(cell) {
                    grid.write(cell, Tile::Wall);
                }
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Tile stored at the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Reports whether the cell holds a wall. Cells outside the grid count as walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.tile(cell).map_or(true, |tile| tile == Tile::Wall)
    }

    /// Reports whether the cell belongs to the outer ring.
    #[must_use]
    pub fn is_border(&self, cell: CellCoord) -> bool {
        cell.column == 0
            || cell.row == 0
            || cell.column + 1 >= self.columns
            || cell.row + 1 >= self.rows
    }

    /// Writes a tile. Clearing a border cell or writing outside the grid is ignored.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) {
        if tile == Tile::Empty && self.is_border(cell) {
            return;
        }
        self.write(cell, tile);
    }

    /// Counts walls among the eight neighbours of a cell, ignoring cells outside the grid.
    #[must_use]
    pub fn wall_neighbors(&self, cell: CellCoord) -> u8 {
        let mut count = 0;
        for rows in -1..=1 {
            for columns in -1..=1 {
                if rows == 0 && columns == 0 {
                    continue;
                }
                let Some(neighbor) = cell.offset(columns, rows) else {
                    continue;
                };
                if self.tile(neighbor) == Some(Tile::Wall) {
                    count += 1;
                }
            }
        }
        count
    }

    /// World-space centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column as f32 + 0.5) * self.tile_length,
            (cell.row as f32 + 0.5) * self.tile_length,
        )
    }

    /// Cell containing the world-space point, if it lies inside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if self.tile_length <= 0.0 || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = CellCoord::new(
            (point.x / self.tile_length) as u32,
            (point.y / self.tile_length) as u32,
        );
        self.index(cell).map(|_| cell)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Reports whether the grid upholds its layout invariants: one tile per
    /// cell, a finite positive tile length and a walled outer ring.
    ///
    /// Grids built through [`TileGrid::bordered`] always do; decoded grids
    /// must be checked.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let expected = u64::from(self.columns) * u64::from(self.rows);
        if u64::try_from(self.tiles.len()).map_or(true, |count| count != expected) {
            return false;
        }
        if !self.tile_length.is_finite() || self.tile_length <= 0.0 {
            return false;
        }
        self.cells()
            .all(|(cell, tile)| tile == Tile::Wall || !self.is_border(cell))
    }

    /// Number of wall tiles, border included.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.tiles.iter().filter(|tile| **tile == Tile::Wall).count()
    }

    fn write(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            self.tiles[index] = tile;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column < self.columns && cell.row < self.rows {
            let row = usize::try_from(cell.row).ok()?;
            let column = usize::try_from(cell.column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column).filter(|index| *index < self.tiles.len())
        } else {
            None
        }
    }
}

/// Cells kept clear of walls so the player and the enemies can spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnLayout {
    player: Option<CellCoord>,
    enemies: Vec<CellCoord>,
}

impl SpawnLayout {
    /// Number of enemy spawn areas laid out along the top of the maze.
    pub const ENEMY_AREAS: u32 = 5;

    /// Computes the spawn cells for a grid of the provided size.
    ///
    /// The player spawns at the bottom centre, three rows above the bottom
    /// edge. Enemy areas sit on row 2, spread evenly between column 2 and
    /// column `columns - 2`. Cells that fall outside the grid are omitted.
    #[must_use]
    pub fn for_grid(columns: u32, rows: u32) -> Self {
        let player = rows
            .checked_sub(3)
            .map(|row| CellCoord::new(columns / 2, row))
            .filter(|cell| cell.column() < columns);

        let span = f64::from(columns) - 4.0;
        let last = f64::from(Self::ENEMY_AREAS - 1);
        let enemies = (0..Self::ENEMY_AREAS)
            .filter_map(|index| {
                let column = (2.0 + span * (f64::from(index) / last)).floor();
                if column < 0.0 || column >= f64::from(columns) || rows <= 2 {
                    return None;
                }
                Some(CellCoord::new(column as u32, 2))
            })
            .collect();

        Self { player, enemies }
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn player(&self) -> Option<CellCoord> {
        self.player
    }

    /// Centres of the enemy spawn areas, left to right.
    #[must_use]
    pub fn enemies(&self) -> &[CellCoord] {
        &self.enemies
    }
}

/// Colour tag shared by both ends of a portal pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortalColor(u32);

impl PortalColor {
    /// Cyan portals.
    pub const CYAN: Self = Self(0x00ff_ff);
    /// Magenta portals.
    pub const MAGENTA: Self = Self(0xff00_ff);
    /// Yellow portals.
    pub const YELLOW: Self = Self(0xffff_00);

    /// Creates a colour from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    /// Packed `0xRRGGBB` value.
    #[must_use]
    pub const fn rgb(&self) -> u32 {
        self.0
    }
}

/// Colours assigned to portal pairs in creation order.
pub const PORTAL_PALETTE: [PortalColor; 3] =
    [PortalColor::CYAN, PortalColor::MAGENTA, PortalColor::YELLOW];

/// Bidirectional teleport link between two tile centres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortalPair {
    first: Vec2,
    second: Vec2,
    color: PortalColor,
}

impl PortalPair {
    /// Links two world-space endpoints.
    #[must_use]
    pub const fn new(first: Vec2, second: Vec2, color: PortalColor) -> Self {
        Self {
            first,
            second,
            color,
        }
    }

    /// First endpoint.
    #[must_use]
    pub const fn first(&self) -> Vec2 {
        self.first
    }

    /// Second endpoint.
    #[must_use]
    pub const fn second(&self) -> Vec2 {
        self.second
    }

    /// Colour tag of the pair.
    #[must_use]
    pub const fn color(&self) -> PortalColor {
        self.color
    }

    /// Destination for an entity standing at `point`, if it is within
    /// `radius` of either endpoint. The first endpoint wins ties.
    #[must_use]
    pub fn exit_for(&self, point: Vec2, radius: f32) -> Option<Vec2> {
        if point.distance(self.first) < radius {
            Some(self.second)
        } else if point.distance(self.second) < radius {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Everything a level needs before the simulation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelPlan {
    /// Static maze geometry.
    pub grid: TileGrid,
    /// Portal pairs placed on empty tiles.
    pub portals: Vec<PortalPair>,
    /// Number of enemies to spawn.
    pub enemy_count: u32,
    /// Probability used when scattering walls.
    pub wall_density: f32,
    /// One-based level index the plan was generated for.
    pub level: u32,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Sides on which a body touched an obstacle during the last physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockedSides {
    /// Contact above the body.
    pub up: bool,
    /// Contact below the body.
    pub down: bool,
    /// Contact to the left of the body.
    pub left: bool,
    /// Contact to the right of the body.
    pub right: bool,
}

impl BlockedSides {
    /// No contact on any side.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Reports whether any side is blocked.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Physics state of an enemy as seen by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyBody {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre of the body in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Contacts resolved during the last physics step.
    pub blocked: BlockedSides,
}

/// Player state as seen by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Centre of the player in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Remaining health.
    pub health: i32,
    /// False once the player has been defeated.
    pub active: bool,
}

/// Projectile state as seen by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Centre of the projectile in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// False once the projectile hit something or expired.
    pub active: bool,
}

/// Global physics rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeScale {
    /// Physics runs in real time.
    #[default]
    Normal,
    /// Physics runs [`SLOW_MOTION_FACTOR`] times slower.
    Slowed,
}

impl TimeScale {
    /// Divisor applied to elapsed time before integrating physics.
    #[must_use]
    pub const fn divisor(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Slowed => SLOW_MOTION_FACTOR,
        }
    }
}

/// Escalation tier of an enraged enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BerserkerLevel {
    /// Regular rage triggered by frustration; speed is unchanged.
    #[default]
    Normal,
    /// Rage that follows a successful dodge; speed is tripled.
    Triple,
}

impl BerserkerLevel {
    /// Numeric tier, 1 or 3.
    #[must_use]
    pub const fn get(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Triple => 3,
        }
    }
}

/// Read-only snapshot of the arena handed to systems each frame.
#[derive(Clone, Copy, Debug)]
pub struct ArenaView<'a> {
    /// One-based index of the running level.
    pub level: u32,
    /// Simulation clock measured from the start of the level.
    pub clock: Duration,
    /// Playable rectangle.
    pub bounds: Bounds,
    /// The player, if one has been placed.
    pub player: Option<PlayerSnapshot>,
    /// Enemy bodies in spawn order.
    pub bodies: &'a [EnemyBody],
    /// Live projectiles.
    pub projectiles: &'a [Projectile],
}

impl ArenaView<'_> {
    /// Body of the provided enemy, if it is alive.
    #[must_use]
    pub fn body(&self, enemy: EnemyId) -> Option<&EnemyBody> {
        self.bodies.iter().find(|body| body.id == enemy)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena with a freshly generated level.
    StartLevel {
        /// Plan produced by the level generator.
        plan: LevelPlan,
    },
    /// Places a new enemy into the arena.
    SpawnEnemy {
        /// Spawn position in world units.
        position: Vec2,
        /// Initial velocity.
        velocity: Vec2,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the velocity the player moves with.
    SetPlayerVelocity {
        /// Velocity in world units per second.
        velocity: Vec2,
    },
    /// Requests that the player fire a projectile.
    FireProjectile,
    /// Overwrites an enemy's position and velocity.
    SteerEnemy {
        /// Enemy being steered.
        enemy: EnemyId,
        /// New position, already clamped to the bounds.
        position: Vec2,
        /// New velocity.
        velocity: Vec2,
    },
    /// Removes walls around an enraged enemy.
    DestroyWalls {
        /// Enemy tearing down the walls.
        enemy: EnemyId,
        /// Centre of the destruction radius.
        center: Vec2,
        /// Walls whose centres are closer than this are removed.
        radius: f32,
    },
    /// Removes a projectile after it struck an enemy.
    ConsumeProjectile {
        /// Projectile to remove.
        projectile: ProjectileId,
    },
    /// Removes a dead enemy.
    DespawnEnemy {
        /// Enemy to remove.
        enemy: EnemyId,
    },
    /// Asks for global slow motion on behalf of an enemy.
    BeginSlowMotion {
        /// Enemy requesting slow motion.
        owner: EnemyId,
    },
    /// Releases slow motion previously requested by an enemy.
    EndSlowMotion {
        /// Enemy releasing slow motion.
        owner: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new level replaced the arena.
    LevelStarted {
        /// One-based level index.
        level: u32,
        /// Number of enemies the level asks for.
        enemy_count: u32,
    },
    /// An enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned by the world.
        enemy: EnemyId,
        /// Spawn position.
        position: Vec2,
    },
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Real time that elapsed in the tick.
        dt: Duration,
        /// Clock value after the tick.
        now: Duration,
    },
    /// The player fired a projectile.
    ProjectileFired {
        /// Identifier assigned by the world.
        projectile: ProjectileId,
        /// Launch position.
        position: Vec2,
    },
    /// A projectile overlaps an enemy. The world does not resolve the hit itself.
    ProjectileOverlap {
        /// Overlapping projectile.
        projectile: ProjectileId,
        /// Overlapping enemy.
        enemy: EnemyId,
    },
    /// An enemy touched the player.
    PlayerHit {
        /// Player health after the hit.
        health: i32,
    },
    /// The player ran out of health.
    PlayerDefeated,
    /// The player stepped through a portal.
    PlayerTeleported {
        /// Portal endpoint entered.
        from: Vec2,
        /// Portal endpoint exited.
        to: Vec2,
    },
    /// Walls were torn down by an enraged enemy.
    WallsDestroyed {
        /// Enemy responsible for the destruction.
        enemy: EnemyId,
        /// Cells that turned empty.
        cells: Vec<CellCoord>,
    },
    /// An enemy was removed after dying.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
    },
    /// The last enemy of the level died.
    LevelCleared {
        /// Level that was cleared.
        level: u32,
    },
    /// The global physics rate changed.
    TimeScaleChanged {
        /// Rate now in effect.
        scale: TimeScale,
        /// Enemy holding slow motion, if any.
        owner: Option<EnemyId>,
    },
}

/// Semantic signals for the presentation layer. Never read back by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// First frustration warning.
    FrustrationWarning {
        /// Frustrated enemy.
        enemy: EnemyId,
    },
    /// Final frustration warning before rage.
    FinalWarning {
        /// Frustrated enemy.
        enemy: EnemyId,
    },
    /// An enemy entered berserker mode.
    BerserkerEntered {
        /// Enraged enemy.
        enemy: EnemyId,
        /// Escalation tier.
        level: BerserkerLevel,
    },
    /// An enemy calmed down.
    BerserkerExited {
        /// Calmed enemy.
        enemy: EnemyId,
    },
    /// An enemy started dodging.
    DodgeStarted {
        /// Dodging enemy.
        enemy: EnemyId,
    },
    /// A dodge window ended.
    DodgeEnded {
        /// Enemy that dodged.
        enemy: EnemyId,
        /// Whether the dodge escalated into a triple berserker.
        success: bool,
    },
    /// A projectile damaged an enemy.
    EnemyHit {
        /// Damaged enemy.
        enemy: EnemyId,
    },
}
