/// Enemy patrol: walk back and forth along a ledge, blind to the player.

use tracing::trace;

use crate::entities::{Bounded, Enemy, Facing, Platform};

/// Advance one enemy by one tick.
///
/// The enemy turns around when it is about to walk off the ledge it stands
/// on (within `edge_margin`), when it stands on nothing at all, and at the
/// screen edges.  Enemies never fall: an unsupported enemy just reverses.
pub fn patrol(enemy: &Enemy, platforms: &[Platform], screen_width: f32, edge_margin: f32) -> Enemy {
    let mut next = enemy.clone();
    next.body.x += next.speed;

    let support = platforms
        .iter()
        .map(Bounded::bounds)
        .find(|rect| next.body.rests_on(rect));

    match support {
        Some(ledge) => {
            let at_right_end = next.speed > 0.0 && next.body.right() >= ledge.right() - edge_margin;
            let at_left_end = next.speed < 0.0 && next.body.left() <= ledge.left() + edge_margin;
            if at_right_end || at_left_end {
                trace!(x = next.body.x, "enemy reached ledge end");
                next.turn_around();
            }
        }
        None => {
            trace!(x = next.body.x, y = next.body.y, "enemy unsupported");
            next.turn_around();
        }
    }

    if next.body.left() < 0.0 {
        next.head(Facing::Right);
    } else if next.body.right() > screen_width {
        next.head(Facing::Left);
    }

    next
}

/// Advance every enemy by one tick.
pub fn patrol_all(
    enemies: &[Enemy],
    platforms: &[Platform],
    screen_width: f32,
    edge_margin: f32,
) -> Vec<Enemy> {
    enemies
        .iter()
        .map(|e| patrol(e, platforms, screen_width, edge_margin))
        .collect()
}
