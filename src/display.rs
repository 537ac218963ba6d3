/// Terminal renderer for a running session.
///
/// Draw functions take a writer and a read-only `Session`, scale world
/// pixels onto terminal cells and queue crossterm commands.  Nothing here
/// changes game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use megapixel::entities::{Aabb, Facing, MegaPixel, Phase, PlatformKind, Session};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_TEXT: Color = Color::White;
const C_HEALTH_FULL: Color = Color::Green;
const C_HEALTH_EMPTY: Color = Color::DarkGrey;
const C_SCORE: Color = Color::Yellow;
const C_GROUND: Color = Color::DarkYellow;
const C_LEDGE: Color = Color::Rgb { r: 139, g: 115, b: 85 };
const C_PLAYER: Color = Color::Rgb { r: 65, g: 105, b: 225 };
const C_ENEMY: Color = Color::Rgb { r: 220, g: 20, b: 60 };
const C_COIN: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const C_MEGAPIXEL: Color = Color::Rgb { r: 138, g: 43, b: 226 };
const C_HINT: Color = Color::DarkGrey;
const C_VICTORY: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const C_DEFEAT: Color = Color::Rgb { r: 200, g: 0, b: 0 };

const HEALTH_BAR_CELLS: u32 = 20;

/// Terminal area the world is scaled onto.  Row 0 is the HUD and the last
/// row the controls hint; everything between is playfield.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(2).max(1)
    }

    /// Cell range covered by a world rectangle, at least one cell each way.
    fn cells(&self, rect: &Aabb, session: &Session) -> (u16, u16, u16, u16) {
        let sx = self.cols as f32 / session.tuning.screen_width;
        let sy = self.field_rows() as f32 / session.tuning.screen_height;
        let max_col = self.cols.saturating_sub(1) as f32;
        let max_row = self.field_rows().saturating_sub(1) as f32;

        let c0 = (rect.left() * sx).floor().clamp(0.0, max_col) as u16;
        let c1 = ((rect.right() * sx).ceil() - 1.0).clamp(c0 as f32, max_col) as u16;
        let r0 = (rect.top() * sy).floor().clamp(0.0, max_row) as u16;
        let r1 = ((rect.bottom() * sy).ceil() - 1.0).clamp(r0 as f32, max_row) as u16;
        (c0, c1, r0 + 1, r1 + 1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for platform in &session.platforms {
        draw_platform(out, session, view, &platform.rect, platform.kind)?;
    }
    for coin in &session.coins {
        draw_coin(out, session, view, &coin.body)?;
    }
    for pixel in &session.megapixels {
        draw_megapixel(out, session, view, &pixel.body)?;
    }
    for enemy in &session.enemies {
        draw_enemy(out, session, view, &enemy.body, enemy.facing)?;
    }
    draw_player(out, session, view)?;

    draw_hud(out, session, view)?;
    draw_controls_hint(out, session, view)?;

    if session.phase != Phase::Running {
        draw_game_over(out, session, view)?;
    }

    // Park the cursor on the hint row
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn fill<W: Write>(
    out: &mut W,
    cells: (u16, u16, u16, u16),
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let (c0, c1, r0, r1) = cells;
    let run = glyph.repeat((c1 - c0 + 1) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&run))?;
    }
    Ok(())
}

// ── Level ─────────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(
    out: &mut W,
    session: &Session,
    view: Viewport,
    rect: &Aabb,
    kind: PlatformKind,
) -> std::io::Result<()> {
    let cells = view.cells(rect, session);
    match kind {
        PlatformKind::Ground => fill(out, cells, "█", C_GROUND),
        PlatformKind::Ledge => {
            // Ledges are thinner than a cell: only the top row is drawn
            let (c0, c1, r0, _) = cells;
            fill(out, (c0, c1, r0, r0), "▀", C_LEDGE)
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    let player = &session.player;
    if player.is_flashing() {
        return Ok(());
    }
    let cells = view.cells(&player.body, session);
    fill(out, cells, "█", C_PLAYER)?;

    // Face on the top row, looking the way the player moves
    let (c0, c1, r0, _) = cells;
    let face_col = match player.facing {
        Facing::Left => c0,
        Facing::Right => c1,
    };
    out.queue(cursor::MoveTo(face_col, r0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("☻"))?;
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    session: &Session,
    view: Viewport,
    body: &Aabb,
    facing: Facing,
) -> std::io::Result<()> {
    let cells = view.cells(body, session);
    fill(out, cells, "▓", C_ENEMY)?;

    let (c0, c1, r0, _) = cells;
    let eye_col = match facing {
        Facing::Left => c0,
        Facing::Right => c1,
    };
    out.queue(cursor::MoveTo(eye_col, r0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("◉"))?;
    Ok(())
}

fn draw_coin<W: Write>(
    out: &mut W,
    session: &Session,
    view: Viewport,
    body: &Aabb,
) -> std::io::Result<()> {
    let (c0, _, r0, _) = view.cells(body, session);
    out.queue(cursor::MoveTo(c0, r0))?;
    out.queue(style::SetForegroundColor(C_COIN))?;
    out.queue(Print("●"))?;
    Ok(())
}

/// Purple pickup, drawn larger while its glow pulses outward.
fn draw_megapixel<W: Write>(
    out: &mut W,
    session: &Session,
    view: Viewport,
    body: &Aabb,
) -> std::io::Result<()> {
    let glyph = if MegaPixel::pulse(session.tick) > 0.0 {
        "◈"
    } else {
        "◆"
    };
    let cells = view.cells(body, session);
    fill(out, cells, glyph, C_MEGAPIXEL)
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    let player = &session.player;

    // Health bar, left
    let filled = if player.max_health == 0 {
        0
    } else {
        (player.health * HEALTH_BAR_CELLS / player.max_health).min(HEALTH_BAR_CELLS)
    };
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    out.queue(Print("["))?;
    out.queue(style::SetForegroundColor(C_HEALTH_FULL))?;
    out.queue(Print("█".repeat(filled as usize)))?;
    out.queue(style::SetForegroundColor(C_HEALTH_EMPTY))?;
    out.queue(Print("░".repeat((HEALTH_BAR_CELLS - filled) as usize)))?;
    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    out.queue(Print(format!("] {}/{}", player.health, player.max_health)))?;

    // Title, centre
    let title = session.variant.title();
    let tx = (view.cols / 2).saturating_sub(title.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(Print(title))?;

    // Coins, right
    let coins = format!("Coins: {}/{}", player.score, session.tuning.win_score);
    let cx = view.cols.saturating_sub(coins.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&coins))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    session: &Session,
    view: Viewport,
) -> std::io::Result<()> {
    let hint = if session.tuning.reset_anytime {
        "← → / A D : Move   ↑ W SPACE : Jump   R : Restart   Q : Quit"
    } else {
        "← → / A D : Move   ↑ W SPACE : Jump   Q : Quit"
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, session: &Session, view: Viewport) -> std::io::Result<()> {
    let (title, color) = match session.phase {
        Phase::Won => ("║      VICTORY!      ║", C_VICTORY),
        _ => ("║     GAME  OVER     ║", C_DEFEAT),
    };
    let lines = ["╔════════════════════╗", title, "╚════════════════════╝"];
    let score_line = format!("Score: {:>4}", session.player.score);
    let hint = "R - Play Again  Q - Quit";

    let cx = view.cols / 2;
    let total_rows = lines.len() + 2;
    let start_row = (view.rows / 2).saturating_sub(total_rows as u16 / 2);

    out.queue(style::SetForegroundColor(color))?;
    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    out.queue(cursor::MoveTo(
        cx.saturating_sub(score_line.chars().count() as u16 / 2),
        score_row,
    ))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&score_line))?;

    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        score_row + 1,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
