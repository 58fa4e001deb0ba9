/// Terminal framebuffer with half-block pixels.
///
/// Every character cell holds two vertically stacked pixels drawn with `▀`
/// (foreground = top, background = bottom).  Text is kept in a separate
/// glyph layer on top of the pixels.  Logical coordinates are scaled to the
/// current terminal size.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color},
};
use glam::Vec2;

use super::art::Art;
use super::Surface;
use crate::entities::{Anchor, Band, Sprite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Blend `a` towards `b`; `t_256` runs from 0 (all `a`) to 256 (all `b`).
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn color(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const CLEAR: Rgb = Rgb(0, 0, 0);

pub fn band_color(band: Band) -> Rgb {
    match band {
        Band::Normal => Rgb(255, 255, 255),
        Band::Warning => Rgb(255, 255, 0),
        Band::Critical => Rgb(255, 0, 0),
    }
}

pub struct FrameBuffer {
    cols: usize,
    rows: usize,
    /// `cols` × `rows * 2` pixels.
    px: Vec<Rgb>,
    glyphs: Vec<Option<(char, Rgb)>>,
    logical: Vec2,
    art: Art,
}

impl FrameBuffer {
    pub fn new(cols: u16, rows: u16, logical: Vec2, art: Art) -> Self {
        let (cols, rows) = (cols as usize, rows as usize);
        Self {
            cols,
            rows,
            px: vec![CLEAR; cols * rows * 2],
            glyphs: vec![None; cols * rows],
            logical,
            art,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols as usize;
        self.rows = rows as usize;
        self.px = vec![CLEAR; self.cols * self.rows * 2];
        self.glyphs = vec![None; self.cols * self.rows];
    }

    pub fn clear(&mut self) {
        self.px.fill(CLEAR);
        self.glyphs.fill(None);
    }

    /// Pixel dimensions.
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows * 2)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let (w, h) = self.size();
        if x < w && y < h {
            self.px[y * w + x]
        } else {
            CLEAR
        }
    }

    pub fn glyph(&self, col: usize, row: usize) -> Option<(char, Rgb)> {
        if col < self.cols && row < self.rows {
            self.glyphs[row * self.cols + col]
        } else {
            None
        }
    }

    /// Pixels per logical unit.
    fn scale(&self) -> Vec2 {
        let (w, h) = self.size();
        Vec2::new(w as f32 / self.logical.x, h as f32 / self.logical.y)
    }

    /// Logical size of one character cell.
    fn cell(&self) -> Vec2 {
        Vec2::new(
            self.logical.x / self.cols.max(1) as f32,
            self.logical.y / self.rows.max(1) as f32,
        )
    }

    /// Write the frame to the terminal.
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.pixel(col, row * 2);
                let bottom = self.pixel(col, row * 2 + 1);

                let (ch, want_fg, want_bg) = match self.glyph(col, row) {
                    Some((ch, color)) => (ch, color, Rgb::lerp(top, bottom, 128)),
                    None if top == bottom => (' ', fg.unwrap_or(top), top),
                    None => ('\u{2580}', top, bottom), // ▀
                };

                if fg != Some(want_fg) {
                    queue!(out, style::SetForegroundColor(want_fg.color()))?;
                    fg = Some(want_fg);
                }
                if bg != Some(want_bg) {
                    queue!(out, style::SetBackgroundColor(want_bg.color()))?;
                    bg = Some(want_bg);
                }
                queue!(out, style::Print(ch))?;
            }
            if row + 1 < self.rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl Surface for FrameBuffer {
    fn image_size(&self, sprite: Sprite) -> Vec2 {
        self.art.get(sprite).map_or(Vec2::ZERO, |image| image.size)
    }

    /// Nearest-neighbour scale of the image onto the pixel grid, clipped.
    fn blit(&mut self, sprite: Sprite, top_left: Vec2) {
        let scale = self.scale();
        let (w, h) = self.size();
        let Some(image) = self.art.get(sprite) else {
            return;
        };
        let (iw, ih) = image.dims();
        if iw == 0 || ih == 0 {
            return;
        }

        let x0 = (top_left.x * scale.x).floor() as i32;
        let y0 = (top_left.y * scale.y).floor() as i32;
        let dw = ((image.size.x * scale.x).round() as i32).max(1);
        let dh = ((image.size.y * scale.y).round() as i32).max(1);

        for py in y0.max(0)..(y0 + dh).min(h as i32) {
            let sy = ((py - y0) as usize * ih) / dh as usize;
            for px in x0.max(0)..(x0 + dw).min(w as i32) {
                let sx = ((px - x0) as usize * iw) / dw as usize;
                if let Some(c) = image.get(sx, sy) {
                    self.px[py as usize * w + px as usize] = c;
                }
            }
        }
    }

    fn text(&mut self, text: &str, band: Band, pos: Vec2, anchor: Anchor) {
        let cell = self.cell();
        let len = text.chars().count();
        let size = Vec2::new(len as f32 * cell.x, cell.y);
        let top_left = anchor.top_left(pos, size);

        let row = (top_left.y / cell.y).round() as i32;
        let col0 = (top_left.x / cell.x).round() as i32;
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let color = band_color(band);
        for (i, ch) in text.chars().enumerate() {
            let col = col0 + i as i32;
            if col >= 0 && (col as usize) < self.cols {
                self.glyphs[row as usize * self.cols + col as usize] = Some((ch, color));
            }
        }
    }
}
