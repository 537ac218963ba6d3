/// Player movement and every collision the player takes part in.
///
/// Each stage takes the current value and returns a new one, so the stages
/// compose in `advance_player` and can be exercised on their own in tests.

use tracing::debug;

use crate::config::Tuning;
use crate::entities::{
    Aabb, Bounded, Coin, Enemy, Facing, GameEvent, MegaPixel, Platform, Player, CONTACT_EPSILON,
};
use crate::input::InputSnapshot;

// ── Input & integration ──────────────────────────────────────────────────────

/// Set horizontal speed from the held keys and start a jump if grounded.
/// Returns the new player and whether a jump started.
pub fn apply_input(p: &Player, input: &InputSnapshot, tuning: &Tuning) -> (Player, bool) {
    let mut next = p.clone();

    // Right wins when both directions are held
    next.vx = 0.0;
    if input.left {
        next.vx = -tuning.run_speed;
        next.facing = Facing::Left;
    }
    if input.right {
        next.vx = tuning.run_speed;
        next.facing = Facing::Right;
    }

    let jumped = input.jump && p.on_ground;
    if jumped {
        next.vy = -tuning.jump_velocity;
        next.on_ground = false;
    }
    (next, jumped)
}

/// Accumulate gravity, clamped to the fall-speed cap when the variant has one.
pub fn apply_gravity(p: &Player, tuning: &Tuning) -> Player {
    let mut vy = p.vy + tuning.gravity;
    if let Some(max) = tuning.max_fall_speed {
        vy = vy.min(max);
    }
    Player { vy, ..p.clone() }
}

/// Integrate velocity, then resolve against the screen and the platforms.
///
/// Platforms are resolved vertically first and horizontally second, both
/// against the position the player had before this tick.  Landing therefore
/// beats side-blocking when a corner is approached diagonally.
pub fn move_and_collide(p: &Player, platforms: &[Platform], tuning: &Tuning) -> Player {
    let prev = p.body;
    let mut body = Aabb {
        x: prev.x + p.vx,
        y: prev.y + p.vy,
        ..prev
    };
    let mut vy = p.vy;
    let mut on_ground = false;
    let mut health = p.health;

    // ── 1. Screen bounds ─────────────────────────────────────────────────────
    if body.left() < 0.0 {
        body.x = 0.0;
    }
    if body.right() > tuning.screen_width {
        body.x = tuning.screen_width - body.w;
    }
    if body.top() < 0.0 {
        body.y = 0.0;
        vy = 0.0;
    }
    if body.bottom() > tuning.screen_height {
        body.y = tuning.screen_height - body.h;
        vy = 0.0;
        on_ground = true;
        health = health.saturating_sub(tuning.floor_penalty);
    }

    // ── 2. Vertical: land on tops, bonk on undersides ────────────────────────
    for rect in platforms.iter().map(Bounded::bounds) {
        if !body.overlaps(&rect) {
            continue;
        }
        if prev.bottom() <= rect.top() + CONTACT_EPSILON {
            body.y = rect.top() - body.h;
            vy = 0.0;
            on_ground = true;
        } else if prev.top() >= rect.bottom() - CONTACT_EPSILON {
            body.y = rect.bottom();
            vy = 0.0;
        } else if vy > 0.0 && prev.overlaps(&rect) && body.top() < rect.top() {
            // Already embedded (spawned or shoved into it): falling pops it on top
            body.y = rect.top() - body.h;
            vy = 0.0;
            on_ground = true;
        }
    }

    // ── 3. Horizontal: blocked by platform sides ─────────────────────────────
    body = block_sideways(&prev, body, platforms);

    // ── 4. Standing exactly on a top edge also counts as grounded ────────────
    if !on_ground && platforms.iter().any(|pl| body.rests_on(&pl.bounds())) {
        on_ground = true;
        vy = vy.min(0.0);
    }

    Player {
        body,
        vy,
        on_ground,
        health,
        ..p.clone()
    }
}

/// Push `body` back out of any platform side it crossed since `prev`.
pub fn block_sideways(prev: &Aabb, mut body: Aabb, platforms: &[Platform]) -> Aabb {
    for rect in platforms.iter().map(Bounded::bounds) {
        if !body.overlaps(&rect) {
            continue;
        }
        if prev.right() <= rect.left() + CONTACT_EPSILON {
            body.x = rect.left() - body.w;
        } else if prev.left() >= rect.right() - CONTACT_EPSILON {
            body.x = rect.right();
        }
    }
    body
}

// ── Enemy contact ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// Landed on the enemy from above.
    Stomp,
    /// Any other touch.
    SideHit,
}

/// Classify a player/enemy touch.  `None` when they do not overlap or the
/// player is still invincible.
pub fn classify_contact(
    prev: &Aabb,
    current: &Aabb,
    enemy: &Aabb,
    invincible_ticks: u32,
) -> Option<Contact> {
    if invincible_ticks > 0 || !current.overlaps(enemy) {
        return None;
    }
    if prev.bottom() <= enemy.top() + CONTACT_EPSILON && current.bottom() > enemy.top() {
        Some(Contact::Stomp)
    } else {
        Some(Contact::SideHit)
    }
}

pub struct ContactOutcome {
    pub player: Player,
    /// Enemies still alive after this tick.
    pub enemies: Vec<Enemy>,
    pub events: Vec<GameEvent>,
}

/// Stomp or get hurt by every enemy the player touches.
/// `prev` is the player's box before this tick's movement.
pub fn resolve_enemy_contacts(
    prev: &Aabb,
    player: &Player,
    enemies: &[Enemy],
    tuning: &Tuning,
) -> ContactOutcome {
    let mut player = player.clone();
    let mut survivors = Vec::with_capacity(enemies.len());
    let mut events = Vec::new();

    for enemy in enemies {
        match classify_contact(prev, &player.body, &enemy.body, player.invincible_ticks) {
            Some(Contact::Stomp) => {
                player.body.y = enemy.body.top() - player.body.h;
                player.vy = -tuning.stomp_bounce;
                player.on_ground = false;
                player.score = player.score.saturating_add(tuning.stomp_score);
                debug!(x = enemy.body.x, y = enemy.body.y, score = player.score, "enemy stomped");
                events.push(GameEvent::EnemyDefeated);
            }
            Some(Contact::SideHit) => {
                player.take_damage(tuning.contact_damage);
                player.invincible_ticks = tuning.invincibility_ticks;

                let away = if player.body.center_x() < enemy.body.center_x() {
                    -1.0
                } else {
                    1.0
                };
                let max_x = (tuning.screen_width - player.body.w).max(0.0);
                player.body.x = (player.body.x + away * tuning.knockback_distance).clamp(0.0, max_x);
                if tuning.knockback_lift > 0.0 {
                    player.vy = -tuning.knockback_lift;
                    player.on_ground = false;
                }

                debug!(health = player.health, "player hit");
                events.push(GameEvent::PlayerHit);
                survivors.push(enemy.clone());
            }
            None => survivors.push(enemy.clone()),
        }
    }

    ContactOutcome {
        player,
        enemies: survivors,
        events,
    }
}

// ── Collectibles ─────────────────────────────────────────────────────────────

/// Split `items` into the number touching `body` and the ones left over.
fn take_touching<T: Bounded + Clone>(body: &Aabb, items: &[T]) -> (u32, Vec<T>) {
    let mut taken = 0;
    let mut left = Vec::with_capacity(items.len());
    for item in items {
        if body.overlaps(&item.bounds()) {
            taken += 1;
        } else {
            left.push(item.clone());
        }
    }
    (taken, left)
}

pub struct CollectOutcome {
    pub player: Player,
    pub coins: Vec<Coin>,
    pub megapixels: Vec<MegaPixel>,
    pub events: Vec<GameEvent>,
}

/// Consume every coin and MegaPixel the player overlaps.
pub fn collect_items(
    player: &Player,
    coins: &[Coin],
    megapixels: &[MegaPixel],
    tuning: &Tuning,
) -> CollectOutcome {
    let mut player = player.clone();
    let mut events = Vec::new();

    let (coin_hits, coins) = take_touching(&player.body, coins);
    for _ in 0..coin_hits {
        player.score = player.score.saturating_add(tuning.coin_score);
        events.push(GameEvent::CoinCollected);
    }

    let (pixel_hits, megapixels) = take_touching(&player.body, megapixels);
    for _ in 0..pixel_hits {
        player.score = player.score.saturating_add(tuning.megapixel_score);
        player.heal(tuning.megapixel_heal);
        events.push(GameEvent::PickupCollected);
    }

    if coin_hits + pixel_hits > 0 {
        debug!(coin_hits, pixel_hits, score = player.score, health = player.health, "collected");
    }

    CollectOutcome {
        player,
        coins,
        megapixels,
        events,
    }
}

// ── Whole player step ────────────────────────────────────────────────────────

pub struct PlayerStep {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub megapixels: Vec<MegaPixel>,
    pub events: Vec<GameEvent>,
}

/// Advance the player by one tick: input, gravity, platform collision, enemy
/// contact and collection, in that order.
pub fn advance_player(
    player: &Player,
    input: &InputSnapshot,
    tuning: &Tuning,
    platforms: &[Platform],
    enemies: &[Enemy],
    coins: &[Coin],
    megapixels: &[MegaPixel],
) -> PlayerStep {
    let mut events = Vec::new();
    let prev = player.body;

    let ticking = Player {
        invincible_ticks: player.invincible_ticks.saturating_sub(1),
        ..player.clone()
    };
    let (moved, jumped) = apply_input(&ticking, input, tuning);
    if jumped {
        debug!(x = moved.body.x, y = moved.body.y, "jump");
        events.push(GameEvent::Jumped);
    }
    let moved = apply_gravity(&moved, tuning);
    let moved = move_and_collide(&moved, platforms, tuning);

    let mut contact = resolve_enemy_contacts(&prev, &moved, enemies, tuning);
    events.extend(contact.events);
    // Knockback never shoves the player into a wall
    contact.player.body = block_sideways(&moved.body, contact.player.body, platforms);

    let collect = collect_items(&contact.player, coins, megapixels, tuning);
    events.extend(collect.events);

    PlayerStep {
        player: collect.player,
        enemies: contact.enemies,
        coins: collect.coins,
        megapixels: collect.megapixels,
        events,
    }
}
