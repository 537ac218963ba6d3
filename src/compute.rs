/// Session-level game logic.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle) and returns a brand-new
/// `Session`.  Side effects are limited to the injected RNG.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::config::{EnemySpawn, FloatMotion, LevelLayout, SpawnRule, Tuning, Variant};
use crate::entities::{
    elapsed_ms, Aabb, Coin, Enemy, GameEvent, MegaPixel, Phase, Platform, PlatformKind, Player,
    Session,
};
use crate::input::InputSnapshot;
use crate::patrol::patrol_all;
use crate::physics::advance_player;

// ── Sampling helpers ─────────────────────────────────────────────────────────

/// Inverted or single-point ranges collapse to their start.
fn sample_f32(rng: &mut impl Rng, range: &RangeInclusive<f32>) -> f32 {
    let (lo, hi) = (*range.start(), *range.end());
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// Inverted ranges spawn nothing.
fn sample_count(rng: &mut impl Rng, range: &RangeInclusive<usize>) -> usize {
    if range.is_empty() {
        0
    } else {
        rng.gen_range(range.clone())
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

fn build_platforms(layout: &LevelLayout) -> Vec<Platform> {
    layout
        .platforms
        .iter()
        .map(|&(rect, kind)| Platform { rect, kind })
        .collect()
}

/// Stand each enemy on a ledge whose top is one of the spawn rows.
fn spawn_enemies(
    rule: &EnemySpawn,
    platforms: &[Platform],
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let size = tuning.enemy_size;
    let count = sample_count(rng, &rule.count);
    let mut enemies = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(&row) = rule.rows.choose(rng) else {
            break;
        };
        let speed = rule.speeds.choose(rng).copied().unwrap_or(1.0);

        let ledges: Vec<&Platform> = platforms
            .iter()
            .filter(|p| p.kind == PlatformKind::Ledge)
            .filter(|p| (p.rect.top() - row).abs() < f32::EPSILON && p.rect.w >= size)
            .collect();

        let x = match ledges.choose(rng) {
            Some(ledge) => sample_f32(rng, &(ledge.rect.left()..=ledge.rect.right() - size)),
            // No ledge on that row: the enemy floats and patrol keeps it pacing
            None => sample_f32(rng, &(50.0..=tuning.screen_width - 50.0 - size)),
        };
        enemies.push(Enemy::new(Aabb::new(x, row - size, size, size), speed));
    }
    enemies
}

fn spawn_points(rule: &SpawnRule, rng: &mut impl Rng) -> Vec<(f32, f32, f32)> {
    let count = sample_count(rng, &rule.count);
    (0..count)
        .map(|_| {
            let x = sample_f32(rng, &rule.x);
            let y = sample_f32(rng, &rule.y);
            let phase = rng.gen_range(0.0..TAU);
            (x, y, phase)
        })
        .collect()
}

fn spawn_coins(rule: &SpawnRule, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Coin> {
    spawn_points(rule, rng)
        .into_iter()
        .map(|(x, y, phase_offset)| Coin {
            body: Aabb::new(x, y, tuning.coin_size, tuning.coin_size),
            anchor_y: y,
            phase_offset,
        })
        .collect()
}

fn spawn_megapixels(rule: &SpawnRule, tuning: &Tuning, rng: &mut impl Rng) -> Vec<MegaPixel> {
    spawn_points(rule, rng)
        .into_iter()
        .map(|(x, y, phase_offset)| MegaPixel {
            body: Aabb::new(x, y, tuning.megapixel_size, tuning.megapixel_size),
            anchor_y: y,
            phase_offset,
        })
        .collect()
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a session from explicit tuning and layout.
pub fn new_session(
    variant: Variant,
    tuning: Tuning,
    layout: LevelLayout,
    rng: &mut impl Rng,
) -> Session {
    let platforms = build_platforms(&layout);
    let (sx, sy) = layout.player_spawn;
    let player = Player::spawn(sx, sy, &tuning);
    let enemies = spawn_enemies(&layout.enemies, &platforms, &tuning, rng);
    let coins = spawn_coins(&layout.coins, &tuning, rng);
    let megapixels = spawn_megapixels(&layout.megapixels, &tuning, rng);

    info!(
        variant = variant.title(),
        enemies = enemies.len(),
        coins = coins.len(),
        megapixels = megapixels.len(),
        "session started"
    );

    Session {
        variant,
        tuning,
        layout,
        platforms,
        player,
        enemies,
        coins,
        megapixels,
        phase: Phase::Running,
        tick: 0,
    }
}

/// Build the initial session for a variant with its stock tuning and level.
pub fn init_session(variant: Variant, rng: &mut impl Rng) -> Session {
    new_session(
        variant,
        Tuning::for_variant(variant),
        LevelLayout::for_variant(variant),
        rng,
    )
}

/// A fresh playthrough with the same rules, from any phase.
pub fn reset(session: &Session, rng: &mut impl Rng) -> Session {
    info!(phase = ?session.phase, score = session.player.score, "session reset");
    new_session(
        session.variant,
        session.tuning.clone(),
        session.layout.clone(),
        rng,
    )
}

/// Reset is always honoured once the game is over, and mid-game only when
/// the variant allows it.
pub fn accepts_reset(session: &Session) -> bool {
    session.phase != Phase::Running || session.tuning.reset_anytime
}

// ── Float animation ──────────────────────────────────────────────────────────

fn float_y(anchor_y: f32, phase_offset: f32, motion: &FloatMotion, time_ms: f32) -> f32 {
    if motion.period_ms <= 0.0 {
        return anchor_y;
    }
    anchor_y + motion.amplitude * (time_ms / motion.period_ms + phase_offset).sin()
}

/// Move coins to their bobbing position at `tick`.
pub fn float_coins(coins: &[Coin], motion: &FloatMotion, tick: u64) -> Vec<Coin> {
    let t = elapsed_ms(tick);
    coins
        .iter()
        .map(|c| {
            let mut coin = c.clone();
            coin.body.y = float_y(c.anchor_y, c.phase_offset, motion, t);
            coin
        })
        .collect()
}

/// Move MegaPixels to their bobbing position at `tick`.
pub fn float_megapixels(pixels: &[MegaPixel], motion: &FloatMotion, tick: u64) -> Vec<MegaPixel> {
    let t = elapsed_ms(tick);
    pixels
        .iter()
        .map(|m| {
            let mut pixel = m.clone();
            pixel.body.y = float_y(m.anchor_y, m.phase_offset, motion, t);
            pixel
        })
        .collect()
}

// ── Outcome ──────────────────────────────────────────────────────────────────

/// Win is checked before loss: reaching the threshold on the same tick that
/// health runs out still counts as a win.
pub fn resolve_phase(player: &Player, tuning: &Tuning) -> Phase {
    if player.score >= tuning.win_score {
        Phase::Won
    } else if player.health == 0 {
        Phase::Lost
    } else {
        Phase::Running
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

pub struct TickOutcome {
    pub session: Session,
    pub events: Vec<GameEvent>,
}

/// Advance the simulation by one tick.  A session that is no longer
/// running is returned unchanged.
pub fn tick(session: &Session, input: &InputSnapshot) -> TickOutcome {
    if session.phase != Phase::Running {
        return TickOutcome {
            session: session.clone(),
            events: Vec::new(),
        };
    }

    let tick = session.tick + 1;
    let tuning = &session.tuning;

    // ── 1. Collectibles bob before anything tests against them ───────────────
    let coins = float_coins(&session.coins, &tuning.coin_float, tick);
    let megapixels = float_megapixels(&session.megapixels, &tuning.megapixel_float, tick);

    // ── 2. Player: movement, platforms, enemy contact, collection ────────────
    let step = advance_player(
        &session.player,
        input,
        tuning,
        &session.platforms,
        &session.enemies,
        &coins,
        &megapixels,
    );
    let mut events = step.events;

    // ── 3. Surviving enemies patrol ──────────────────────────────────────────
    let enemies = patrol_all(
        &step.enemies,
        &session.platforms,
        tuning.screen_width,
        tuning.enemy_edge_margin,
    );

    // ── 4. Win / lose ────────────────────────────────────────────────────────
    let phase = resolve_phase(&step.player, tuning);
    match phase {
        Phase::Won => {
            info!(score = step.player.score, tick, "won");
            events.push(GameEvent::Victory);
        }
        Phase::Lost => {
            info!(score = step.player.score, tick, "lost");
            events.push(GameEvent::Defeat);
        }
        Phase::Running => {}
    }

    TickOutcome {
        session: Session {
            player: step.player,
            enemies,
            coins: step.coins,
            megapixels: step.megapixels,
            phase,
            tick,
            ..session.clone()
        },
        events,
    }
}
