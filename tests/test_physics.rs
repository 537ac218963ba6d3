use megapixel::config::{Tuning, Variant};
use megapixel::entities::*;
use megapixel::input::InputSnapshot;
use megapixel::physics::*;

fn deluxe() -> Tuning {
    Tuning::for_variant(Variant::Deluxe)
}

fn classic() -> Tuning {
    Tuning::for_variant(Variant::Classic)
}

fn ledge(x: f32, y: f32, w: f32, h: f32) -> Platform {
    Platform {
        rect: Aabb::new(x, y, w, h),
        kind: PlatformKind::Ledge,
    }
}

fn ground(tuning: &Tuning) -> Platform {
    Platform {
        rect: Aabb::new(0.0, tuning.screen_height - 60.0, tuning.screen_width, 60.0),
        kind: PlatformKind::Ground,
    }
}

/// A player with an explicit box, at rest, full health.
fn player_box(x: f32, y: f32, w: f32, h: f32, tuning: &Tuning) -> Player {
    Player {
        body: Aabb::new(x, y, w, h),
        ..Player::spawn(x, y, tuning)
    }
}

/// A player standing on the `ground` strip at `x`.
fn grounded_player(x: f32, tuning: &Tuning) -> Player {
    let top = tuning.screen_height - 60.0;
    Player {
        on_ground: true,
        ..Player::spawn(x, top - tuning.player_height, tuning)
    }
}

fn enemy_on_ground(x: f32, tuning: &Tuning) -> Enemy {
    let top = tuning.screen_height - 60.0;
    Enemy::new(
        Aabb::new(x, top - tuning.enemy_size, tuning.enemy_size, tuning.enemy_size),
        1.0,
    )
}

fn no_input() -> InputSnapshot {
    InputSnapshot::default()
}

// ── apply_input ───────────────────────────────────────────────────────────────

#[test]
fn horizontal_speed_comes_straight_from_keys() {
    let t = deluxe();
    let p = grounded_player(100.0, &t);

    let (left, _) = apply_input(&p, &InputSnapshot { left: true, ..no_input() }, &t);
    assert_eq!(left.vx, -6.0);
    assert_eq!(left.facing, Facing::Left);

    let (idle, _) = apply_input(&left, &no_input(), &t);
    assert_eq!(idle.vx, 0.0);
    assert_eq!(idle.facing, Facing::Left);
}

#[test]
fn right_wins_when_both_directions_held() {
    let t = classic();
    let p = grounded_player(100.0, &t);
    let both = InputSnapshot { left: true, right: true, ..no_input() };
    let (next, _) = apply_input(&p, &both, &t);
    assert_eq!(next.vx, 5.0);
    assert_eq!(next.facing, Facing::Right);
}

#[test]
fn jump_only_from_the_ground() {
    let t = deluxe();
    let jump = InputSnapshot { jump: true, ..no_input() };

    let p = grounded_player(100.0, &t);
    let (up, jumped) = apply_input(&p, &jump, &t);
    assert!(jumped);
    assert_eq!(up.vy, -16.0);
    assert!(!up.on_ground);

    // Already airborne: the second press does nothing
    let (again, jumped_again) = apply_input(&up, &jump, &t);
    assert!(!jumped_again);
    assert_eq!(again.vy, -16.0);
}

// ── apply_gravity ─────────────────────────────────────────────────────────────

#[test]
fn gravity_is_capped_only_when_the_variant_caps_it() {
    let d = deluxe();
    let falling = Player { vy: 11.9, ..grounded_player(0.0, &d) };
    assert_eq!(apply_gravity(&falling, &d).vy, 12.0);

    let c = classic();
    let falling = Player { vy: 20.0, ..grounded_player(0.0, &c) };
    assert_eq!(apply_gravity(&falling, &c).vy, 20.5);
}

// ── move_and_collide ──────────────────────────────────────────────────────────

#[test]
fn falling_player_lands_on_platform() {
    let t = deluxe();
    let p = Player {
        vy: 5.0,
        ..player_box(100.0, 100.0, 32.0, 32.0, &t)
    };
    let platforms = [ledge(50.0, 132.0, 200.0, 20.0)];

    let step = advance_player(&p, &no_input(), &t, &platforms, &[], &[], &[]);
    assert_eq!(step.player.body.bottom(), 132.0);
    assert_eq!(step.player.vy, 0.0);
    assert!(step.player.on_ground);
}

#[test]
fn resting_player_stays_grounded() {
    let t = deluxe();
    let platforms = [ledge(50.0, 132.0, 200.0, 20.0)];
    let mut p = player_box(100.0, 100.0, 32.0, 32.0, &t);

    for _ in 0..120 {
        p = move_and_collide(&apply_gravity(&p, &t), &platforms, &t);
        assert_eq!(p.body.bottom(), 132.0);
        assert!(p.on_ground);
    }
}

#[test]
fn grounded_whenever_bottom_sits_on_a_platform_top() {
    let t = deluxe();
    let platforms = [ledge(50.0, 132.0, 200.0, 20.0)];
    // Zero velocity: nothing penetrates, only the resting check can ground
    let p = player_box(100.0, 100.0, 32.0, 32.0, &t);
    let next = move_and_collide(&p, &platforms, &t);
    assert!(next.body.rests_on(&platforms[0].rect));
    assert!(next.on_ground);
}

#[test]
fn head_bonks_on_platform_underside() {
    let t = deluxe();
    let platforms = [ledge(0.0, 100.0, 200.0, 20.0)];
    let p = Player {
        vy: -10.0,
        ..player_box(50.0, 125.0, 32.0, 32.0, &t)
    };
    let next = move_and_collide(&p, &platforms, &t);
    assert_eq!(next.body.top(), 120.0);
    assert_eq!(next.vy, 0.0);
    assert!(!next.on_ground);
}

#[test]
fn walking_into_a_wall_is_blocked() {
    let t = deluxe();
    let wall = [ledge(200.0, 300.0, 50.0, 100.0)];

    let moving_right = Player {
        vx: 10.0,
        ..player_box(160.0, 320.0, 32.0, 32.0, &t)
    };
    let next = move_and_collide(&moving_right, &wall, &t);
    assert_eq!(next.body.right(), 200.0);

    let moving_left = Player {
        vx: -10.0,
        ..player_box(255.0, 320.0, 32.0, 32.0, &t)
    };
    let next = move_and_collide(&moving_left, &wall, &t);
    assert_eq!(next.body.left(), 250.0);
}

#[test]
fn diagonal_corner_approach_lands_instead_of_snagging() {
    let t = deluxe();
    let platforms = [ledge(100.0, 200.0, 100.0, 20.0)];
    let p = Player {
        vx: 10.0,
        vy: 10.0,
        ..player_box(60.0, 160.0, 32.0, 32.0, &t)
    };
    let next = move_and_collide(&p, &platforms, &t);
    assert_eq!(next.body.x, 70.0);
    assert_eq!(next.body.bottom(), 200.0);
    assert!(next.on_ground);
}

#[test]
fn degenerate_platforms_are_ignored() {
    let t = deluxe();
    let platforms = [ledge(50.0, 132.0, 0.0, 20.0), ledge(50.0, 132.0, 200.0, -3.0)];
    let p = Player {
        vy: 5.0,
        ..player_box(100.0, 100.0, 32.0, 32.0, &t)
    };
    let next = move_and_collide(&p, &platforms, &t);
    assert_eq!(next.body.y, 105.0);
    assert!(!next.on_ground);
}

#[test]
fn falling_player_inside_a_ledge_pops_onto_it() {
    let t = deluxe();
    let platforms = [ledge(150.0, 400.0, 250.0, 20.0)];
    let p = Player {
        vy: 0.8,
        ..player_box(256.0, 384.0, 48.0, 96.0, &t)
    };
    let next = move_and_collide(&p, &platforms, &t);
    assert_eq!(next.body.bottom(), 400.0);
    assert_eq!(next.vy, 0.0);
    assert!(next.on_ground);

    // Rising through it is left alone
    let p = Player {
        vy: -5.0,
        ..player_box(256.0, 384.0, 48.0, 96.0, &t)
    };
    let next = move_and_collide(&p, &platforms, &t);
    assert_eq!(next.body.y, 379.0);
    assert!(!next.on_ground);
}

#[test]
fn screen_edges_clamp_the_player() {
    let t = deluxe();
    let p = Player {
        vx: -20.0,
        vy: -20.0,
        ..player_box(5.0, 5.0, 48.0, 96.0, &t)
    };
    let next = move_and_collide(&p, &[], &t);
    assert_eq!(next.body.x, 0.0);
    assert_eq!(next.body.y, 0.0);
    assert_eq!(next.vy, 0.0);

    let p = Player {
        vx: 20.0,
        ..player_box(t.screen_width - 50.0, 100.0, 48.0, 96.0, &t)
    };
    assert_eq!(move_and_collide(&p, &[], &t).body.right(), t.screen_width);
}

#[test]
fn screen_floor_grounds_and_only_hurts_when_configured() {
    let d = deluxe();
    let p = Player {
        vy: 12.0,
        ..player_box(100.0, d.screen_height - 100.0, 48.0, 96.0, &d)
    };
    let next = move_and_collide(&p, &[], &d);
    assert_eq!(next.body.bottom(), d.screen_height);
    assert!(next.on_ground);
    assert_eq!(next.health, 100);

    let c = classic();
    let p = Player {
        vy: 8.0,
        ..player_box(100.0, c.screen_height - 66.0, 32.0, 64.0, &c)
    };
    let next = move_and_collide(&p, &[], &c);
    assert!(next.on_ground);
    assert_eq!(next.health, 95);
}

// ── classify_contact ──────────────────────────────────────────────────────────

#[test]
fn landing_from_above_is_a_stomp() {
    let enemy = Aabb::new(100.0, 200.0, 32.0, 32.0);
    let prev = Aabb::new(100.0, 140.0, 32.0, 60.0); // bottom 200
    let now = Aabb::new(100.0, 150.0, 32.0, 60.0); // bottom 210
    assert_eq!(classify_contact(&prev, &now, &enemy, 0), Some(Contact::Stomp));
}

#[test]
fn touching_from_the_side_is_a_hit() {
    let enemy = Aabb::new(100.0, 200.0, 32.0, 32.0);
    let prev = Aabb::new(60.0, 180.0, 32.0, 52.0);
    let now = Aabb::new(70.0, 180.0, 32.0, 52.0);
    assert_eq!(classify_contact(&prev, &now, &enemy, 0), Some(Contact::SideHit));
}

#[test]
fn no_contact_when_apart_or_invincible() {
    let enemy = Aabb::new(100.0, 200.0, 32.0, 32.0);
    let prev = Aabb::new(60.0, 180.0, 32.0, 52.0);
    let touching = Aabb::new(70.0, 180.0, 32.0, 52.0);
    let apart = Aabb::new(0.0, 0.0, 32.0, 52.0);
    assert_eq!(classify_contact(&prev, &apart, &enemy, 0), None);
    assert_eq!(classify_contact(&prev, &touching, &enemy, 1), None);
}

#[test]
fn classification_is_deterministic() {
    let enemy = Aabb::new(100.0, 200.0, 32.0, 32.0);
    let cases = [
        (Aabb::new(100.0, 140.0, 32.0, 60.0), Aabb::new(100.0, 150.0, 32.0, 60.0)),
        (Aabb::new(60.0, 180.0, 32.0, 52.0), Aabb::new(70.0, 180.0, 32.0, 52.0)),
    ];
    for (prev, now) in cases {
        let first = classify_contact(&prev, &now, &enemy, 0);
        for _ in 0..10 {
            assert_eq!(classify_contact(&prev, &now, &enemy, 0), first);
        }
    }
}

// ── resolve_enemy_contacts ────────────────────────────────────────────────────

#[test]
fn side_hit_costs_health_and_starts_invincibility() {
    for (tuning, health, window) in [(deluxe(), 85, 60), (classic(), 90, 30)] {
        let p = grounded_player(500.0, &tuning);
        let enemies = [enemy_on_ground(510.0, &tuning)];

        let out = resolve_enemy_contacts(&p.body, &p, &enemies, &tuning);
        assert_eq!(out.player.health, health);
        assert_eq!(out.player.invincible_ticks, window);
        assert_eq!(out.player.score, 0);
        assert_eq!(out.enemies.len(), 1);
        assert_eq!(out.events, vec![GameEvent::PlayerHit]);
    }
}

#[test]
fn side_hit_knocks_player_away_from_enemy() {
    let t = classic();
    let p = grounded_player(500.0, &t);

    let enemy_right = [enemy_on_ground(510.0, &t)];
    let out = resolve_enemy_contacts(&p.body, &p, &enemy_right, &t);
    assert_eq!(out.player.body.x, 470.0);

    let enemy_left = [enemy_on_ground(490.0, &t)];
    let out = resolve_enemy_contacts(&p.body, &p, &enemy_left, &t);
    assert_eq!(out.player.body.x, 530.0);
}

#[test]
fn deluxe_side_hit_pops_the_player_up() {
    let t = deluxe();
    let p = grounded_player(500.0, &t);
    let out = resolve_enemy_contacts(&p.body, &p, &[enemy_on_ground(510.0, &t)], &t);
    assert_eq!(out.player.vy, -5.0);
    assert!(!out.player.on_ground);
}

#[test]
fn invincible_player_passes_through_enemies() {
    let t = deluxe();
    let p = Player {
        invincible_ticks: 10,
        ..grounded_player(500.0, &t)
    };
    let out = resolve_enemy_contacts(&p.body, &p, &[enemy_on_ground(510.0, &t)], &t);
    assert_eq!(out.player, p);
    assert!(out.events.is_empty());
}

#[test]
fn stomp_removes_enemy_and_scores() {
    let t = deluxe();
    let enemy = enemy_on_ground(500.0, &t);
    let prev = Aabb::new(500.0, enemy.body.top() - 96.0 - 4.0, 48.0, 96.0);
    let p = Player {
        body: Aabb { y: prev.y + 10.0, ..prev },
        vy: 10.0,
        ..grounded_player(500.0, &t)
    };

    let out = resolve_enemy_contacts(&prev, &p, &[enemy.clone()], &t);
    assert!(out.enemies.is_empty());
    assert_eq!(out.player.score, 5);
    assert_eq!(out.player.health, 100);
    assert_eq!(out.player.body.bottom(), enemy.body.top());
    assert!((out.player.vy + 11.2).abs() < 1e-4);
    assert_eq!(out.events, vec![GameEvent::EnemyDefeated]);
}

#[test]
fn classic_stomp_cancels_the_fall() {
    let t = classic();
    let enemy = enemy_on_ground(300.0, &t);
    let prev = Aabb::new(300.0, enemy.body.top() - 64.0, 32.0, 64.0);
    let p = Player {
        body: Aabb { y: prev.y + 6.0, ..prev },
        vy: 6.0,
        ..grounded_player(300.0, &t)
    };
    let out = resolve_enemy_contacts(&prev, &p, &[enemy], &t);
    assert_eq!(out.player.vy, 0.0);
    assert_eq!(out.player.score, 5);
}

// ── collect_items ─────────────────────────────────────────────────────────────

#[test]
fn pickup_heals_and_scores() {
    let t = deluxe();
    let p = Player {
        health: 90,
        ..grounded_player(500.0, &t)
    };
    let pixel = MegaPixel {
        body: Aabb::new(500.0, p.body.y, 48.0, 48.0),
        anchor_y: p.body.y,
        phase_offset: 0.0,
    };

    let out = collect_items(&p, &[], &[pixel], &t);
    assert_eq!(out.player.health, 100u32.min(90 + t.megapixel_heal));
    assert_eq!(out.player.score, 10);
    assert!(out.megapixels.is_empty());
    assert_eq!(out.events, vec![GameEvent::PickupCollected]);
}

#[test]
fn coins_add_one_each_and_vanish() {
    let t = classic();
    let p = grounded_player(100.0, &t);
    let coin_at = |x: f32| Coin {
        body: Aabb::new(x, p.body.y + 10.0, 16.0, 16.0),
        anchor_y: p.body.y + 10.0,
        phase_offset: 0.0,
    };
    let coins = [coin_at(105.0), coin_at(110.0), coin_at(400.0)];

    let out = collect_items(&p, &coins, &[], &t);
    assert_eq!(out.player.score, 2);
    assert_eq!(out.coins.len(), 1);
    assert_eq!(out.coins[0].body.x, 400.0);
    assert_eq!(out.events, vec![GameEvent::CoinCollected, GameEvent::CoinCollected]);
}

// ── advance_player ────────────────────────────────────────────────────────────

#[test]
fn jump_emits_event() {
    let t = deluxe();
    let platforms = [ground(&t)];
    let p = grounded_player(100.0, &t);
    let step = advance_player(
        &p,
        &InputSnapshot { jump: true, ..no_input() },
        &t,
        &platforms,
        &[],
        &[],
        &[],
    );
    assert_eq!(step.events, vec![GameEvent::Jumped]);
    assert!(step.player.body.y < p.body.y);
    assert!(!step.player.on_ground);
}

#[test]
fn no_damage_during_invincibility_window() {
    let t = deluxe();
    let platforms = [ground(&t)];
    let enemies = [enemy_on_ground(530.0, &t)];
    let mut p = grounded_player(500.0, &t);

    let step = advance_player(&p, &no_input(), &t, &platforms, &enemies, &[], &[]);
    assert_eq!(step.player.health, 85);
    assert_eq!(step.player.invincible_ticks, 60);
    p = step.player;

    for _ in 0..59 {
        // Drag the player back onto the enemy every tick
        p.body.x = 500.0;
        let step = advance_player(&p, &no_input(), &t, &platforms, &enemies, &[], &[]);
        assert!(!step.events.contains(&GameEvent::PlayerHit));
        assert_eq!(step.player.health, 85);
        p = step.player;
    }
    assert_eq!(p.invincible_ticks, 1);
}

#[test]
fn health_never_leaves_range_under_repeated_hits_and_heals() {
    let t = deluxe();
    let platforms = [ground(&t)];
    let enemies = [enemy_on_ground(530.0, &t)];
    let mut p = grounded_player(500.0, &t);

    for i in 0..400 {
        p.body.x = 500.0;
        p.invincible_ticks = 0;
        let pixels = if i % 3 == 0 {
            vec![MegaPixel {
                body: p.body,
                anchor_y: p.body.y,
                phase_offset: 0.0,
            }]
        } else {
            Vec::new()
        };
        let step = advance_player(&p, &no_input(), &t, &platforms, &enemies, &[], &pixels);
        assert!(step.player.health <= step.player.max_health);
        p = step.player;
    }
}

#[test]
fn knockback_stops_at_a_wall() {
    let t = classic();
    let wall = ledge(440.0, 480.0, 40.0, 60.0);
    let platforms = [ground(&t), wall];
    let p = grounded_player(480.0, &t);
    let enemies = [enemy_on_ground(490.0, &t)];

    let step = advance_player(&p, &no_input(), &t, &platforms, &enemies, &[], &[]);
    assert_eq!(step.events, vec![GameEvent::PlayerHit]);
    assert_eq!(step.player.health, 90);
    assert_eq!(step.player.body.x, 480.0);
    assert!(!step.player.body.overlaps(&wall.rect));
}
