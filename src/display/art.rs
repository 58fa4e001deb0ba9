/// Procedural pixel art for every `Sprite`.
///
/// Small sprites are drawn from character maps; the two scenery layers are
/// generated.  Each image keeps its logical size separately from its bitmap,
/// the framebuffer scales one onto the other.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;

use super::fb::Rgb;
use crate::compute::chimneys;
use crate::entities::Sprite;

// ── Palette ───────────────────────────────────────────────────────────────────

const RED: Rgb = Rgb(200, 30, 40);
const DARK_RED: Rgb = Rgb(130, 20, 25);
const WHITE: Rgb = Rgb(245, 245, 250);
const SKIN: Rgb = Rgb(240, 190, 150);
const BLACK: Rgb = Rgb(20, 20, 20);
const GOLD: Rgb = Rgb(240, 200, 60);
const GREEN: Rgb = Rgb(40, 140, 60);
const DARK_GREEN: Rgb = Rgb(20, 90, 40);
const ICE: Rgb = Rgb(170, 220, 255);
const BROWN: Rgb = Rgb(110, 70, 40);

const SKY_TOP: Rgb = Rgb(8, 12, 40);
const SKY_BOTTOM: Rgb = Rgb(40, 60, 110);
const ROCK: Rgb = Rgb(70, 80, 105);
const SNOW: Rgb = Rgb(225, 232, 245);
const BRICK: Rgb = Rgb(150, 60, 45);
const SOOT: Rgb = Rgb(30, 25, 25);
const WALL: Rgb = Rgb(190, 160, 120);
const ROOF: Rgb = Rgb(95, 45, 40);
const WINDOW: Rgb = Rgb(255, 220, 110);

fn palette(c: char) -> Option<Rgb> {
    match c {
        'R' => Some(RED),
        'r' => Some(DARK_RED),
        'w' => Some(WHITE),
        's' => Some(SKIN),
        'k' => Some(BLACK),
        'y' => Some(GOLD),
        'g' => Some(GREEN),
        'G' => Some(DARK_GREEN),
        'c' => Some(ICE),
        'b' => Some(BROWN),
        _ => None,
    }
}

#[rustfmt::skip]
const SLEDGE: &[&str] = &[
    "..............RR........",
    ".............RRRw.......",
    "............wsssw.......",
    "............wsksw.......",
    "..gg.........www........",
    ".gGGg.......RRRRR.......",
    "gGGGGg..rRRRRRRRRRRRR...",
    "gGGGGg..rRwwwwwwwwwRRR..",
    ".gGGg...rRRRRRRRRRRRRR..",
    "........rrRRRRRRRRRRR...",
    ".........b.........b....",
    "..yyyyyyyyyyyyyyyyyyyyy.",
    ".y....................yy",
];

#[rustfmt::skip]
const GIFT: &[&str] = &[
    "..y.y..",
    "...y...",
    "RRRyRRR",
    "RRRyRRR",
    "yyyyyyy",
    "RRRyRRR",
    "RRRyRRR",
];

#[rustfmt::skip]
const TWINKLE: &[&str] = &[
    ".y.",
    "ywy",
    ".y.",
];

#[rustfmt::skip]
const STAR: &[&str] = &[
    "...y...",
    "...y...",
    "yyyyyyy",
    ".yyyyy.",
    "..yyy..",
    ".yy.yy.",
    "y.....y",
];

#[rustfmt::skip]
const FLAKE: &[&str] = &[
    "c..c..c",
    ".c.c.c.",
    "..ccc..",
    "ccccccc",
    "..ccc..",
    ".c.c.c.",
    "c..c..c",
];

// ── Images ────────────────────────────────────────────────────────────────────

/// A bitmap with a logical size.  `None` pixels are transparent.
#[derive(Clone, Debug)]
pub struct Image {
    pub size: Vec2,
    width: usize,
    height: usize,
    px: Vec<Option<Rgb>>,
}

impl Image {
    pub fn blank(size: Vec2, width: usize, height: usize) -> Self {
        Self {
            size,
            width,
            height,
            px: vec![None; width * height],
        }
    }

    /// Build from a character map; every row must be as wide as the first.
    pub fn from_rows(size: Vec2, rows: &[&str]) -> Self {
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut image = Self::blank(size, width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate().take(width) {
                image.set(x as i32, y as i32, palette(c));
            }
        }
        image
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.px[y * self.width + x]
        } else {
            None
        }
    }

    fn set(&mut self, x: i32, y: i32, c: Option<Rgb>) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.px[y as usize * self.width + x as usize] = c;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, Some(c));
            }
        }
    }
}

/// Bitmap resolution of the scenery layers, relative to logical pixels.
const SCENERY_SCALE: f32 = 4.0;

/// Night sky over snowy mountains.  Ridge frequencies are whole multiples of
/// the image width so the left and right edges meet.
fn landscape(size: Vec2) -> Image {
    let w = (size.x / SCENERY_SCALE) as usize;
    let h = (size.y / SCENERY_SCALE) as usize;
    let mut image = Image::blank(size, w, h);

    for y in 0..h {
        let t = ((y * 256) / h.max(1)) as u16;
        let sky = Rgb::lerp(SKY_TOP, SKY_BOTTOM, t);
        for x in 0..w {
            image.set(x as i32, y as i32, Some(sky));
        }
    }
    // Fixed star field
    for i in 0..40usize {
        let x = (i * 97 + 13) % w.max(1);
        let y = (i * 53 + 7) % (h / 2).max(1);
        image.set(x as i32, y as i32, Some(WHITE));
    }

    for x in 0..w {
        let u = x as f32 / w as f32;
        let ridge = 0.45
            + 0.08 * (TAU * 2.0 * u).sin()
            + 0.05 * (TAU * 5.0 * u + 1.0).sin()
            + 0.03 * (TAU * 11.0 * u + 2.0).sin();
        let top = (ridge * h as f32) as usize;
        for y in top.min(h)..h {
            let c = if y < top + 4 { SNOW } else { ROCK };
            image.set(x as i32, y as i32, Some(c));
        }
    }
    image
}

/// Houses built under the chimney targets.  The upper part of the image is
/// transparent so the mountains show through.
fn town(size: Vec2) -> Image {
    let w = (size.x / SCENERY_SCALE) as i32;
    let h = (size.y / SCENERY_SCALE) as i32;
    let mut image = Image::blank(size, w as usize, h as usize);
    let ground = h * 5 / 12;

    for target in chimneys() {
        let cx = (target.x / SCENERY_SCALE) as i32;
        let cy = (target.y / SCENERY_SCALE) as i32;
        let cw = ((target.w / SCENERY_SCALE) as i32).max(2);
        let ch = ((target.h / SCENERY_SCALE) as i32).max(2);

        let eaves = cy + ch;
        let left = cx - 14;
        let right = cx + cw + 16;

        // Roof slopes in from the eaves over four rows, snow on top
        for row in 0..4 {
            let inset = 3 - row;
            image.fill_rect(left + inset, eaves - 3 + row, right - left - 2 * inset, 1, ROOF);
        }
        image.fill_rect(left + 3, eaves - 4, right - left - 6, 1, SNOW);
        image.fill_rect(left, eaves + 1, right - left, ground - eaves - 1, WALL);

        let mut wx = left + 3;
        while wx + 3 < right {
            let mut wy = eaves + 4;
            while wy + 3 < ground {
                image.fill_rect(wx, wy, 3, 3, WINDOW);
                wy += 7;
            }
            wx += 7;
        }

        image.fill_rect(cx, cy, cw, eaves - cy, BRICK);
        image.fill_rect(cx, cy, cw, 1, SOOT);
    }

    image.fill_rect(0, ground, w, h - ground, SNOW);
    image
}

// ── Asset table ───────────────────────────────────────────────────────────────

/// All images, generated once at startup.
#[derive(Clone, Debug)]
pub struct Art {
    images: HashMap<Sprite, Image>,
}

impl Art {
    /// Generate every sprite at its logical size for a `width`×`height` screen.
    pub fn load(width: f32, height: f32) -> Self {
        let images = Sprite::ALL
            .iter()
            .map(|&sprite| {
                let size = sprite.size(width, height);
                let image = match sprite {
                    Sprite::Sledge => Image::from_rows(size, SLEDGE),
                    Sprite::Landscape => landscape(size),
                    Sprite::Town => town(size),
                    Sprite::Gift | Sprite::GiftIcon => Image::from_rows(size, GIFT),
                    Sprite::Twinkle => Image::from_rows(size, TWINKLE),
                    Sprite::Star | Sprite::StarIcon => Image::from_rows(size, STAR),
                    Sprite::Flake => Image::from_rows(size, FLAKE),
                };
                (sprite, image)
            })
            .collect();
        Self { images }
    }

    pub fn get(&self, sprite: Sprite) -> Option<&Image> {
        self.images.get(&sprite)
    }
}
