/// Tuning tables and level layouts for the two game variants.
///
/// Everything a session needs to know about "which game" it is playing lives
/// here as plain data; the simulation never branches on `Variant` directly.

use std::ops::RangeInclusive;

use clap::ValueEnum;

use crate::entities::{Aabb, PlatformKind};

/// Simulation rate.  Float animation time is derived from the tick counter.
pub const TICK_RATE_HZ: u32 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// The first game: 800×600, softer gravity, 30 coins to win.
    Classic,
    /// The second game: 1024×768, capped fall speed, 50 coins to win.
    #[default]
    Deluxe,
}

impl Variant {
    pub fn title(&self) -> &'static str {
        match self {
            Variant::Classic => "MegaPixel",
            Variant::Deluxe => "MegaPixel v2.0",
        }
    }
}

/// Sinusoidal bobbing of a collectible around its anchor row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatMotion {
    /// Peak displacement in pixels.
    pub amplitude: f32,
    /// Milliseconds per radian of phase.
    pub period_ms: f32,
}

/// Named gameplay constants.  The two variants disagree on almost every one
/// of these, so none of them is hard-coded in the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub enemy_size: f32,
    pub coin_size: f32,
    pub megapixel_size: f32,

    pub run_speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    /// `None` lets vertical speed grow without bound while falling.
    pub max_fall_speed: Option<f32>,

    pub max_health: u32,
    pub contact_damage: u32,
    pub invincibility_ticks: u32,
    /// Horizontal shove applied on a side hit, away from the enemy.
    pub knockback_distance: f32,
    /// Upward speed given on a side hit (0 = none).
    pub knockback_lift: f32,
    /// Upward speed after a stomp (0 = simply stop falling).
    pub stomp_bounce: f32,
    /// Health lost per tick while resting on the bottom screen edge.
    pub floor_penalty: u32,

    pub stomp_score: u32,
    pub coin_score: u32,
    pub megapixel_score: u32,
    pub megapixel_heal: u32,
    pub win_score: u32,

    /// Distance from a ledge end at which a patrolling enemy turns around.
    pub enemy_edge_margin: f32,

    pub coin_float: FloatMotion,
    pub megapixel_float: FloatMotion,

    /// Whether Reset is honoured while the session is still running.
    pub reset_anytime: bool,
}

impl Tuning {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Tuning {
                screen_width: 800.0,
                screen_height: 600.0,
                player_width: 32.0,
                player_height: 64.0,
                enemy_size: 32.0,
                coin_size: 16.0,
                megapixel_size: 32.0,
                run_speed: 5.0,
                jump_velocity: 12.0,
                gravity: 0.5,
                max_fall_speed: None,
                max_health: 100,
                contact_damage: 10,
                invincibility_ticks: 30,
                knockback_distance: 30.0,
                knockback_lift: 0.0,
                stomp_bounce: 0.0,
                floor_penalty: 5,
                stomp_score: 5,
                coin_score: 1,
                megapixel_score: 10,
                megapixel_heal: 30,
                win_score: 30,
                enemy_edge_margin: 0.0,
                coin_float: FloatMotion { amplitude: 6.0, period_ms: 200.0 },
                megapixel_float: FloatMotion { amplitude: 8.0, period_ms: 200.0 },
                reset_anytime: false,
            },
            Variant::Deluxe => Tuning {
                screen_width: 1024.0,
                screen_height: 768.0,
                player_width: 48.0,
                player_height: 96.0,
                enemy_size: 48.0,
                coin_size: 24.0,
                megapixel_size: 48.0,
                run_speed: 6.0,
                jump_velocity: 16.0,
                gravity: 0.8,
                max_fall_speed: Some(12.0),
                max_health: 100,
                contact_damage: 15,
                invincibility_ticks: 60,
                knockback_distance: 8.0,
                knockback_lift: 5.0,
                stomp_bounce: 16.0 * 0.7,
                floor_penalty: 0,
                stomp_score: 5,
                coin_score: 1,
                megapixel_score: 10,
                megapixel_heal: 25,
                win_score: 50,
                enemy_edge_margin: 5.0,
                coin_float: FloatMotion { amplitude: 14.0, period_ms: 300.0 },
                megapixel_float: FloatMotion { amplitude: 18.0, period_ms: 250.0 },
                reset_anytime: true,
            },
        }
    }
}

// ── Spawn rules ───────────────────────────────────────────────────────────────

/// Uniform placement of `count` items inside an x/y box (top-left corners).
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRule {
    pub count: RangeInclusive<usize>,
    pub x: RangeInclusive<f32>,
    pub y: RangeInclusive<f32>,
}

/// Enemies stand on a ledge whose top edge is one of `rows`.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    pub count: RangeInclusive<usize>,
    pub rows: Vec<f32>,
    /// Signed initial speeds to pick from.
    pub speeds: Vec<f32>,
}

/// Immutable description of one level, consulted only at session creation
/// and on reset.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    pub platforms: Vec<(Aabb, PlatformKind)>,
    /// Top-left corner of the player at spawn, clear of every platform.
    pub player_spawn: (f32, f32),
    pub enemies: EnemySpawn,
    pub coins: SpawnRule,
    pub megapixels: SpawnRule,
}

impl LevelLayout {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => LevelLayout {
                platforms: vec![
                    (Aabb::new(0.0, 560.0, 800.0, 40.0), PlatformKind::Ground),
                    (Aabb::new(100.0, 500.0, 200.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(400.0, 400.0, 150.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(200.0, 300.0, 100.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(500.0, 250.0, 200.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(100.0, 200.0, 150.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(600.0, 150.0, 100.0, 20.0), PlatformKind::Ledge),
                ],
                player_spawn: (400.0, 300.0),
                // Rows are ledge tops; enemies stand on them, not at them
                enemies: EnemySpawn {
                    count: 5..=5,
                    rows: vec![500.0, 400.0, 250.0, 200.0],
                    speeds: vec![1.0, 2.0, 3.0],
                },
                coins: SpawnRule {
                    count: 10..=10,
                    x: 50.0..=750.0,
                    y: 50.0..=500.0,
                },
                megapixels: SpawnRule {
                    count: 3..=3,
                    x: 50.0..=750.0,
                    y: 50.0..=450.0,
                },
            },
            Variant::Deluxe => LevelLayout {
                platforms: vec![
                    (Aabb::new(0.0, 708.0, 1024.0, 60.0), PlatformKind::Ground),
                    (Aabb::new(200.0, 600.0, 300.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(600.0, 500.0, 200.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(150.0, 400.0, 250.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(500.0, 350.0, 180.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(800.0, 300.0, 150.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(300.0, 250.0, 200.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(700.0, 200.0, 180.0, 20.0), PlatformKind::Ledge),
                    (Aabb::new(100.0, 150.0, 150.0, 20.0), PlatformKind::Ledge),
                ],
                player_spawn: (256.0, 304.0),
                // Rows are ledge tops, as above
                enemies: EnemySpawn {
                    count: 6..=6,
                    rows: vec![600.0, 500.0, 400.0, 350.0],
                    speeds: vec![-2.0, -1.0, 1.0, 2.0],
                },
                coins: SpawnRule {
                    count: 15..=15,
                    x: 50.0..=974.0,
                    y: 50.0..=668.0,
                },
                megapixels: SpawnRule {
                    count: 4..=4,
                    x: 100.0..=924.0,
                    y: 100.0..=568.0,
                },
            },
        }
    }
}
