/// Game entity types: plain data plus geometric queries, no frame logic.

use crate::config::{LevelLayout, Tuning, Variant, TICK_RATE_HZ};

/// Tolerance for "this edge rests on that edge" comparisons.
pub const CONTACT_EPSILON: f32 = 1e-3;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in screen pixels, y growing downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Aabb { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Zero-area, negative or non-finite boxes never collide with anything.
    pub fn is_degenerate(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.w.is_finite()
            || !self.h.is_finite()
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when the horizontal extents overlap (strictly).
    pub fn spans_over(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// True when this box stands exactly on top of `floor`.
    pub fn rests_on(&self, floor: &Aabb) -> bool {
        !self.is_degenerate()
            && !floor.is_degenerate()
            && (self.bottom() - floor.top()).abs() <= CONTACT_EPSILON
            && self.spans_over(floor)
    }
}

/// Shared hit-box capability of every entity kind.
pub trait Bounded {
    fn bounds(&self) -> Aabb;
}

impl Bounded for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn of_speed(speed: f32) -> Facing {
        if speed < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

// ── Level geometry ────────────────────────────────────────────────────────────

/// Cosmetic only: the renderer draws ground and ledges differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformKind {
    Ground,
    Ledge,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    pub rect: Aabb,
    pub kind: PlatformKind,
}

impl Bounded for Platform {
    fn bounds(&self) -> Aabb {
        self.rect
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Aabb,
    pub vx: f32,
    pub vy: f32,
    pub health: u32,
    pub max_health: u32,
    /// Coins, stomps and MegaPixels all feed the same counter.
    pub score: u32,
    pub facing: Facing,
    pub on_ground: bool,
    pub invincible_ticks: u32,
}

impl Player {
    /// A fresh player at `(x, y)`: full health, no score, at rest.
    pub fn spawn(x: f32, y: f32, tuning: &Tuning) -> Self {
        Player {
            body: Aabb::new(x, y, tuning.player_width, tuning.player_height),
            vx: 0.0,
            vy: 0.0,
            health: tuning.max_health,
            max_health: tuning.max_health,
            score: 0,
            facing: Facing::Right,
            on_ground: false,
            invincible_ticks: 0,
        }
    }

    /// Blink while invincible: hidden for 5 of every 10 ticks.
    pub fn is_flashing(&self) -> bool {
        self.invincible_ticks > 0 && self.invincible_ticks % 10 < 5
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount).min(self.max_health);
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        self.body
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Aabb,
    /// Signed pixels per tick; the magnitude never changes after spawn.
    pub speed: f32,
    pub facing: Facing,
}

impl Enemy {
    pub fn new(body: Aabb, speed: f32) -> Self {
        Enemy {
            body,
            speed,
            facing: Facing::of_speed(speed),
        }
    }

    pub fn turn_around(&mut self) {
        self.speed = -self.speed;
        self.facing = Facing::of_speed(self.speed);
    }

    /// Point the enemy in `facing` without touching its speed magnitude.
    pub fn head(&mut self, facing: Facing) {
        self.speed = self.speed.abs() * facing.sign();
        self.facing = facing;
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        self.body
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    pub body: Aabb,
    /// Row the coin bobs around.
    pub anchor_y: f32,
    /// Random phase in `[0, 2π)` so coins do not bob in lockstep.
    pub phase_offset: f32,
}

impl Bounded for Coin {
    fn bounds(&self) -> Aabb {
        self.body
    }
}

/// The purple power pickup.
#[derive(Clone, Debug, PartialEq)]
pub struct MegaPixel {
    pub body: Aabb,
    pub anchor_y: f32,
    pub phase_offset: f32,
}

impl MegaPixel {
    /// Glow size in pixels for the current tick, within ±4.
    pub fn pulse(tick: u64) -> f32 {
        (tick as f32 / 10.0).sin() * 4.0
    }
}

impl Bounded for MegaPixel {
    fn bounds(&self) -> Aabb {
        self.body
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Discrete things that happened during one tick, for audio and HUD feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    EnemyDefeated,
    PlayerHit,
    CoinCollected,
    PickupCollected,
    Victory,
    Defeat,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Won,
    Lost,
}

/// One playthrough: every entity plus the rules it is played by.
/// `tick` returns a new copy and leaves its input untouched.
#[derive(Clone, Debug)]
pub struct Session {
    pub variant: Variant,
    pub tuning: Tuning,
    pub layout: LevelLayout,
    pub platforms: Vec<Platform>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub megapixels: Vec<MegaPixel>,
    pub phase: Phase,
    /// Ticks simulated since the session was created or reset.
    pub tick: u64,
}

impl Session {
    /// Simulated time, the clock the float animation runs on.
    pub fn elapsed_ms(&self) -> f32 {
        elapsed_ms(self.tick)
    }
}

pub fn elapsed_ms(tick: u64) -> f32 {
    tick as f32 * 1000.0 / TICK_RATE_HZ as f32
}
