//! Half-block terminal renderer for game snapshots.

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::game::{GameState, Snapshot};
use crate::geometry::Rect;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const LETTERBOX: Rgb = Rgb(12, 12, 14);
const BACKGROUND: Rgb = Rgb(33, 37, 43);
const EMBER: Rgb = Rgb(70, 30, 28);
const ROCK_DARK: Rgb = Rgb(90, 20, 16);
const ROCK_MID: Rgb = Rgb(150, 40, 24);
const ROCK_HI: Rgb = Rgb(215, 90, 40);
const ROCK_EDGE: Rgb = Rgb(60, 12, 10);
const JUMPER: Rgb = Rgb(235, 235, 240);
const JUMPER_SHADE: Rgb = Rgb(170, 170, 185);
const HORN: Rgb = Rgb(230, 60, 40);
const EYE: Rgb = Rgb(20, 20, 20);
const GOLD: Rgb = Rgb(245, 200, 66);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL: Rgb = Rgb(60, 44, 40);
const PANEL_EDGE: Rgb = Rgb(110, 60, 45);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    /// Writes the buffer as `▀` cells: top pixel in the foreground, bottom in the background.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── World to buffer mapping ─────────────────────────────────────────────────

/// Fits the fixed world (y up) into the pixel buffer (y down), keeping aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
    pub world_w: f64,
    pub world_h: f64,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, world_w: f64, world_h: f64) -> Self {
        let scale = (pw as f64 / world_w).min(ph as f64 / world_h);
        Self {
            scale,
            ox: (pw as f64 - world_w * scale) / 2.0,
            oy: (ph as f64 - world_h * scale) / 2.0,
            world_w,
            world_h,
        }
    }

    pub fn to_buf(&self, x: f64, y: f64) -> (i32, i32) {
        let bx = self.ox + x * self.scale;
        let by = self.oy + (self.world_h - y) * self.scale;
        (bx.round() as i32, by.round() as i32)
    }

    /// Buffer-space `(x, y, w, h)` of a world rectangle, clipped to the world area.
    pub fn rect_to_buf(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let left = r.left().max(0.0);
        let right = r.right().min(self.world_w);
        let bottom = r.bottom().max(0.0);
        let top = r.top().min(self.world_h);
        if left >= right || bottom >= top {
            return (0, 0, 0, 0);
        }
        let (x0, y0) = self.to_buf(left, top);
        let (x1, y1) = self.to_buf(right, bottom);
        (x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
    }

    fn px(&self, world_len: f64) -> i32 {
        (world_len * self.scale).round().max(1.0) as i32
    }
}

// ── 3x5 bitmap glyphs ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn letter(ch: char) -> Option<[u8; 15]> {
    Some(match ch {
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'B' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0],
        'C' => [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1],
        'G' => [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1],
        'H' => [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'J' => [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0],
        'L' => [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        'P' => [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0],
        'T' => [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0],
        'U' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        d @ '0'..='9' => DIGITS[(d as u8 - b'0') as usize],
        _ => return None,
    })
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb, px: i32) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let gx = x + col as i32 * px;
                let gy = y + row as i32 * px;
                buf.fill_rect(gx + px.max(2) / 2, gy + px.max(2) / 2, px, px, SHADOW);
                buf.fill_rect(gx, gy, px, px, fg);
            }
        }
    }
}

/// Draws `text` centered on `cx`, each glyph cell `px` buffer pixels wide.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb, px: i32) {
    let advance = 4 * px;
    let total_w = text.chars().count() as i32 * advance - px;
    let start_x = cx - total_w / 2;
    for (i, ch) in text.chars().enumerate() {
        if let Some(glyph) = letter(ch) {
            draw_glyph(buf, start_x + i as i32 * advance, y, &glyph, fg, px);
        }
    }
}

fn text_scale(view: &Viewport) -> i32 {
    (view.scale * 8.0).round().clamp(1.0, 4.0) as i32
}

// ── Scene ───────────────────────────────────────────────────────────────────

pub fn draw(buf: &mut PixelBuf, snap: &Snapshot, view: &Viewport) {
    buf.clear(LETTERBOX);
    draw_background(buf, view, snap.frame);
    for barrier in &snap.barriers {
        draw_barrier(buf, view, barrier);
    }
    draw_jumper(buf, view, snap);

    match snap.state {
        GameState::Start => draw_title(buf, view),
        GameState::Playing => draw_score(buf, view, snap.score),
        GameState::GameOver => draw_game_over(buf, view, snap),
    }
}

fn draw_background(buf: &mut PixelBuf, view: &Viewport, frame: u64) {
    let (x0, y0) = view.to_buf(0.0, view.world_h);
    let (x1, y1) = view.to_buf(view.world_w, 0.0);
    let h = (y1 - y0).max(1);
    for y in y0..y1 {
        // Embers glow up from the bottom fifth.
        let depth = ((y - y0) * 256 / h) as u16;
        let c = if depth > 205 {
            let t = ((depth - 205) * 5).min(256);
            Rgb::lerp(BACKGROUND, EMBER, t)
        } else {
            BACKGROUND
        };
        for x in x0..x1 {
            buf.set(x, y, c);
        }
    }
    // Drifting sparks.
    for i in 0..12u64 {
        let sx = ((i * 97 + frame / 2) % view.world_w as u64) as f64;
        let sy = ((i * 53 + frame) % (view.world_h as u64 / 3)) as f64;
        let (bx, by) = view.to_buf(view.world_w - sx, sy);
        buf.set(bx, by, ROCK_HI);
    }
}

fn draw_barrier(buf: &mut PixelBuf, view: &Viewport, barrier: &Rect) {
    let (x, y, w, h) = view.rect_to_buf(barrier);
    if w == 0 {
        return;
    }
    for dx in 0..w {
        let c = rock_shade(dx, w);
        for dy in 0..h {
            buf.set(x + dx, y + dy, c);
        }
    }
    // Darken the edge facing the gap and the outline.
    for dx in 0..w {
        buf.set(x + dx, y, ROCK_EDGE);
        buf.set(x + dx, y + h - 1, ROCK_EDGE);
    }
    for dy in 0..h {
        buf.set(x, y + dy, ROCK_EDGE);
        buf.set(x + w - 1, y + dy, ROCK_EDGE);
    }
}

fn rock_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return ROCK_MID;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(ROCK_DARK, ROCK_MID, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(ROCK_MID, ROCK_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(ROCK_HI, ROCK_MID, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(ROCK_MID, ROCK_DARK, ((t - 160) * 3).min(256))
    }
}

fn draw_jumper(buf: &mut PixelBuf, view: &Viewport, snap: &Snapshot) {
    let (x, y, w, h) = view.rect_to_buf(&snap.player);
    if w == 0 {
        return;
    }
    // Lean with vertical speed.
    let tilt = (-snap.player_vy / 8.0).clamp(-1.0, 1.0) as i32;

    buf.fill_rect(x, y, w, h, JUMPER);
    buf.fill_rect(x, y + h - (h / 3).max(1), w, (h / 3).max(1), JUMPER_SHADE);

    // Horns
    let horn = view.px(6.0);
    buf.fill_rect(x, y - horn, horn, horn, HORN);
    buf.fill_rect(x + w - horn, y - horn, horn, horn, HORN);

    // Eye
    let eye = view.px(5.0);
    buf.fill_rect(x + w - eye * 2, y + h / 3 + tilt, eye, eye, EYE);
}

fn draw_score(buf: &mut PixelBuf, view: &Viewport, score: u32) {
    let (cx, top) = view.to_buf(view.world_w / 2.0, view.world_h);
    draw_text(buf, cx, top + 3, &score.to_string(), WHITE, text_scale(view));
}

fn draw_title(buf: &mut PixelBuf, view: &Viewport) {
    let px = text_scale(view);
    let (cx, cy) = view.to_buf(view.world_w / 2.0, view.world_h * 0.75);
    draw_text(buf, cx, cy, "HELL JUMPER", HORN, px);
    let (_, sub_y) = view.to_buf(0.0, view.world_h * 0.3);
    draw_text(buf, cx, sub_y, "PRESS SPACE", WHITE, (px / 2).max(1));
}

fn draw_game_over(buf: &mut PixelBuf, view: &Viewport, snap: &Snapshot) {
    // Dim the scene.
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dim());
        }
    }

    let px = text_scale(view);
    let panel = Rect::new(
        view.world_w / 2.0,
        view.world_h / 2.0,
        view.world_w * 0.6,
        view.world_h * 0.4,
    );
    let (x, y, w, h) = view.rect_to_buf(&panel);
    buf.fill_rect(x - 1, y - 1, w + 2, h + 2, SHADOW);
    buf.fill_rect(x, y, w, h, PANEL_EDGE);
    buf.fill_rect(x + 1, y + 1, w - 2, h - 2, PANEL);

    let cx = x + w / 2;
    let line = 7 * px;
    draw_text(buf, cx, y + px * 2, "GAME OVER", HORN, px);
    draw_text(buf, cx, y + px * 2 + line, &snap.score.to_string(), WHITE, px);
    let small = (px / 2).max(1);
    draw_text(buf, cx, y + px * 2 + line * 2, "BEST", GOLD, small);
    draw_text(
        buf,
        cx,
        y + px * 2 + line * 2 + 7 * small,
        &snap.best.to_string(),
        GOLD,
        small,
    );
    draw_text(buf, cx, y + h - 7 * small, "PRESS SPACE", WHITE, small);
}
