/// Rendering layer.
///
/// `draw_game` walks the scene tree and issues image and text draws against
/// a `Surface`.  No game logic is performed here; the terminal framebuffer in
/// `fb` is one implementation of `Surface`, tests use a recording one.

pub mod art;
pub mod fb;

use glam::Vec2;

use crate::consts::{
    FROZEN_CRITICAL_MS, FUEL_CRITICAL, FUEL_WARNING, TIME_CRITICAL_MS, TIME_WARNING_MS,
};
use crate::entities::{Anchor, Band, Game, Item, Kind, Sprite};

/// Something the scene can be drawn onto.
pub trait Surface {
    /// Logical size of an image, used for anchoring.
    fn image_size(&self, sprite: Sprite) -> Vec2;
    fn blit(&mut self, sprite: Sprite, top_left: Vec2);
    fn text(&mut self, text: &str, band: Band, pos: Vec2, anchor: Anchor);
}

// ── HUD ───────────────────────────────────────────────────────────────────────

pub const GAME_OVER_TEXT: &str = "GAME OVER - press ENTER to start";

/// Pre-formatted overlay texts with their colour bands.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub fuel: String,
    pub fuel_band: Band,
    pub time: String,
    pub time_band: Band,
    pub score: String,
    /// The score turns red/yellow while the drop action is frozen.
    pub score_band: Band,
}

impl Hud {
    pub fn of(game: &Game) -> Self {
        let (fuel, frozen) = game
            .player()
            .and_then(Item::player)
            .map_or((0.0, 0.0), |p| (p.fuel, p.frozen));
        Self {
            fuel: format_fuel(fuel),
            fuel_band: fuel_band(fuel),
            time: format_time(game.time),
            time_band: time_band(game.time),
            score: format!("{:>3}", game.score),
            score_band: frozen_band(frozen),
        }
    }
}

pub fn fuel_band(fuel: f32) -> Band {
    if fuel < FUEL_CRITICAL {
        Band::Critical
    } else if fuel < FUEL_WARNING {
        Band::Warning
    } else {
        Band::Normal
    }
}

pub fn time_band(time: f32) -> Band {
    if time < TIME_CRITICAL_MS {
        Band::Critical
    } else if time < TIME_WARNING_MS {
        Band::Warning
    } else {
        Band::Normal
    }
}

pub fn frozen_band(frozen: f32) -> Band {
    if frozen > FROZEN_CRITICAL_MS {
        Band::Critical
    } else if frozen > 0.0 {
        Band::Warning
    } else {
        Band::Normal
    }
}

/// Fuel in steps of five, right aligned.
pub fn format_fuel(fuel: f32) -> String {
    format!("{:>2}", (fuel / 5.0) as i32 * 5)
}

/// `MM:SS`, or the game-over prompt once the clock has run out.
pub fn format_time(time: f32) -> String {
    if time <= 0.0 {
        return GAME_OVER_TEXT.to_string();
    }
    let minutes = (time / 60_000.0) as i32;
    let seconds = (time / 1000.0) as i32 % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ── Scene traversal ───────────────────────────────────────────────────────────

/// Render one complete frame of `game`.
pub fn draw_game<S: Surface + ?Sized>(game: &Game, surface: &mut S) {
    let hud = Hud::of(game);
    draw_item(&game.root, surface, game.width, &hud);
}

/// Draw a node, then its children in insertion order.  `width` is the
/// screen width scenery wraps around.
pub fn draw_item<S: Surface + ?Sized>(item: &Item, surface: &mut S, width: f32, hud: &Hud) {
    if !item.active {
        return;
    }

    if item.kind == Kind::Ui {
        draw_hud(surface, width, hud);
        return;
    }

    if let Some(sprite) = item.sprite {
        blit_anchored(surface, sprite, item.pos, item.anchor);
    }
    for child in &item.items {
        draw_item(child, surface, width, hud);
    }

    // Second copy one screen to the left closes the seam of the scroll
    if let (Kind::Scenery(_), Some(sprite)) = (&item.kind, item.sprite) {
        blit_anchored(surface, sprite, item.pos - Vec2::new(width, 0.0), item.anchor);
    }
}

fn blit_anchored<S: Surface + ?Sized>(surface: &mut S, sprite: Sprite, pos: Vec2, anchor: Anchor) {
    let size = surface.image_size(sprite);
    surface.blit(sprite, anchor.top_left(pos, size));
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, width: f32, hud: &Hud) {
    surface.text(&hud.fuel, hud.fuel_band, Vec2::new(80.0, 40.0), Anchor::LeftCenter);
    surface.text(&hud.time, hud.time_band, Vec2::new(width / 2.0, 50.0), Anchor::Center);
    surface.text(
        &hud.score,
        hud.score_band,
        Vec2::new(width - 80.0, 40.0),
        Anchor::RightCenter,
    );

    blit_anchored(surface, Sprite::StarIcon, Vec2::new(40.0, 40.0), Anchor::Center);
    blit_anchored(surface, Sprite::GiftIcon, Vec2::new(width - 40.0, 40.0), Anchor::Center);
}
