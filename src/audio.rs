/// Audio sink: the terminal bell is the only speaker a terminal has, so only
/// the events worth interrupting for ring it.  Fire-and-forget.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use megapixel::entities::GameEvent;
use tracing::trace;

fn rings_bell(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::PlayerHit | GameEvent::Victory | GameEvent::Defeat
    )
}

/// Queue one bell for the frame if any event asks for it.  A failed write
/// just means silence.
pub fn play<W: Write>(out: &mut W, events: &[GameEvent]) {
    for event in events {
        trace!(?event, "cue");
    }
    if events.iter().any(rings_bell) {
        let _ = out.queue(Print('\u{7}'));
    }
}
