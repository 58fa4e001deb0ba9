use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use santa_sled::compute::init_game;
use santa_sled::display::art::Art;
use santa_sled::display::fb::{band_color, FrameBuffer, Rgb};
use santa_sled::display::*;
use santa_sled::entities::*;

const W: f32 = 1280.0;
const H: f32 = 720.0;

#[derive(Debug, Clone, PartialEq)]
enum Draw {
    Blit(Sprite, Vec2),
    Text(String, Band, Vec2, Anchor),
}

/// Surface that records every call instead of drawing.
#[derive(Default)]
struct Recorder {
    draws: Vec<Draw>,
}

impl Surface for Recorder {
    fn image_size(&self, sprite: Sprite) -> Vec2 {
        sprite.size(W, H)
    }

    fn blit(&mut self, sprite: Sprite, top_left: Vec2) {
        self.draws.push(Draw::Blit(sprite, top_left));
    }

    fn text(&mut self, text: &str, band: Band, pos: Vec2, anchor: Anchor) {
        self.draws.push(Draw::Text(text.to_string(), band, pos, anchor));
    }
}

impl Recorder {
    fn blits_of(&self, sprite: Sprite) -> Vec<Vec2> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Blit(s, p) if *s == sprite => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn texts(&self) -> Vec<String> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Text(t, ..) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }
}

fn new_game() -> Game {
    let mut rng = StdRng::seed_from_u64(42);
    init_game(W, H, &mut rng)
}

fn small_fb() -> FrameBuffer {
    FrameBuffer::new(64, 18, Vec2::new(W, H), Art::load(W, H))
}

// ── formatting ────────────────────────────────────────────────────────────────

#[test]
fn format_time_minutes_and_seconds() {
    assert_eq!(format_time(120_000.0), "02:00");
    assert_eq!(format_time(65_500.0), "01:05");
    assert_eq!(format_time(999.0), "00:00");
}

#[test]
fn format_time_game_over_at_zero_or_below() {
    assert_eq!(format_time(0.0), GAME_OVER_TEXT);
    assert_eq!(format_time(-33.0), GAME_OVER_TEXT);
}

#[test]
fn format_fuel_steps_of_five() {
    assert_eq!(format_fuel(100.0), "100");
    assert_eq!(format_fuel(72.4), "70");
    assert_eq!(format_fuel(4.9), " 0");
}

#[test]
fn band_thresholds() {
    assert_eq!(fuel_band(9.9), Band::Critical);
    assert_eq!(fuel_band(10.0), Band::Warning);
    assert_eq!(fuel_band(24.9), Band::Warning);
    assert_eq!(fuel_band(25.0), Band::Normal);

    assert_eq!(time_band(9_999.0), Band::Critical);
    assert_eq!(time_band(10_000.0), Band::Warning);
    assert_eq!(time_band(20_000.0), Band::Normal);

    assert_eq!(frozen_band(0.0), Band::Normal);
    assert_eq!(frozen_band(500.0), Band::Warning);
    assert_eq!(frozen_band(1_000.0), Band::Warning);
    assert_eq!(frozen_band(1_001.0), Band::Critical);
}

#[test]
fn hud_reflects_player_and_round() {
    let mut game = new_game();
    game.time = 15_000.0;
    game.score = 7;
    if let Some(p) = game.player_mut().and_then(Item::player_mut) {
        p.fuel = 22.0;
        p.frozen = 3_000.0;
    }

    let hud = Hud::of(&game);
    assert_eq!(hud.fuel, "20");
    assert_eq!(hud.fuel_band, Band::Warning);
    assert_eq!(hud.time, "00:15");
    assert_eq!(hud.time_band, Band::Warning);
    assert_eq!(hud.score, "  7");
    assert_eq!(hud.score_band, Band::Critical);
}

// ── draw traversal ────────────────────────────────────────────────────────────

#[test]
fn scenery_drawn_twice_one_screen_apart() {
    let game = new_game();
    let mut rec = Recorder::default();
    draw_game(&game, &mut rec);

    assert_eq!(
        rec.blits_of(Sprite::Landscape),
        vec![Vec2::ZERO, Vec2::new(-W, 0.0)]
    );
    assert_eq!(
        rec.blits_of(Sprite::Town),
        vec![Vec2::new(0.0, H / 2.0), Vec2::new(-W, H / 2.0)]
    );
}

#[test]
fn player_drawn_centered() {
    let game = new_game();
    let mut rec = Recorder::default();
    draw_game(&game, &mut rec);
    assert_eq!(rec.blits_of(Sprite::Sledge), vec![Vec2::new(480.0, 270.0)]);
}

#[test]
fn draw_order_follows_tree() {
    let game = new_game();
    let mut rec = Recorder::default();
    draw_game(&game, &mut rec);

    let order: Vec<Sprite> = rec
        .draws
        .iter()
        .filter_map(|d| match d {
            Draw::Blit(s, _) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(
        order,
        vec![
            Sprite::Landscape,
            Sprite::Landscape,
            Sprite::Sledge,
            Sprite::Town,
            Sprite::Town,
            Sprite::StarIcon,
            Sprite::GiftIcon,
        ]
    );
}

#[test]
fn children_drawn_after_parent() {
    let mut parent = Item::new(Kind::Group)
        .at(Vec2::new(10.0, 10.0))
        .with_sprite(Sprite::Star, Anchor::TopLeft);
    parent.add(
        Item::new(Kind::Twinkle)
            .at(Vec2::new(20.0, 20.0))
            .with_sprite(Sprite::Twinkle, Anchor::Center),
    );

    let mut rec = Recorder::default();
    let hud = Hud::of(&new_game());
    draw_item(&parent, &mut rec, W, &hud);
    assert_eq!(
        rec.draws,
        vec![
            Draw::Blit(Sprite::Star, Vec2::new(10.0, 10.0)),
            Draw::Blit(Sprite::Twinkle, Vec2::new(15.0, 15.0)),
        ]
    );
}

#[test]
fn inactive_subtree_skipped() {
    let mut parent = Item::new(Kind::Group).with_sprite(Sprite::Star, Anchor::TopLeft);
    parent.add(Item::new(Kind::Gift).with_sprite(Sprite::Gift, Anchor::Center));
    parent.active = false;

    let mut rec = Recorder::default();
    let hud = Hud::of(&new_game());
    draw_item(&parent, &mut rec, W, &hud);
    assert!(rec.draws.is_empty());
}

#[test]
fn hud_texts_and_icons() {
    let mut game = new_game();
    game.time = 120_000.0;
    let mut rec = Recorder::default();
    draw_game(&game, &mut rec);

    assert_eq!(rec.texts(), vec!["100", "02:00", "  0"]);
    assert_eq!(rec.blits_of(Sprite::StarIcon), vec![Vec2::new(20.0, 20.0)]);
    assert_eq!(rec.blits_of(Sprite::GiftIcon), vec![Vec2::new(W - 60.0, 20.0)]);
    assert!(rec.draws.contains(&Draw::Text(
        "02:00".to_string(),
        Band::Normal,
        Vec2::new(W / 2.0, 50.0),
        Anchor::Center,
    )));
}

// ── framebuffer ───────────────────────────────────────────────────────────────

#[test]
fn framebuffer_has_two_pixels_per_row() {
    let fb = small_fb();
    assert_eq!(fb.size(), (64, 36));
}

#[test]
fn full_screen_blit_fills_every_pixel() {
    let mut fb = small_fb();
    fb.blit(Sprite::Landscape, Vec2::ZERO);
    for y in 0..36 {
        for x in 0..64 {
            assert_ne!(fb.pixel(x, y), Rgb(0, 0, 0), "pixel {x},{y}");
        }
    }
}

#[test]
fn offscreen_blit_is_clipped() {
    let mut fb = small_fb();
    fb.blit(Sprite::Landscape, Vec2::new(-W, 0.0));
    for y in 0..36 {
        for x in 0..64 {
            assert_eq!(fb.pixel(x, y), Rgb(0, 0, 0));
        }
    }
}

#[test]
fn half_offset_blit_covers_right_half_only() {
    let mut fb = small_fb();
    fb.blit(Sprite::Landscape, Vec2::new(W / 2.0, 0.0));
    assert_eq!(fb.pixel(31, 10), Rgb(0, 0, 0));
    assert_ne!(fb.pixel(32, 10), Rgb(0, 0, 0));
    assert_ne!(fb.pixel(63, 35), Rgb(0, 0, 0));
}

#[test]
fn text_lands_on_cell_grid() {
    let mut fb = small_fb();
    fb.text("HI", Band::Warning, Vec2::new(100.0, 80.0), Anchor::TopLeft);
    assert_eq!(fb.glyph(5, 2), Some(('H', band_color(Band::Warning))));
    assert_eq!(fb.glyph(6, 2), Some(('I', band_color(Band::Warning))));
    assert_eq!(fb.glyph(7, 2), None);
}

#[test]
fn offscreen_text_ignored() {
    let mut fb = small_fb();
    fb.text("X", Band::Normal, Vec2::new(100.0, H + 100.0), Anchor::TopLeft);
    fb.text("Y", Band::Normal, Vec2::new(100.0, -200.0), Anchor::TopLeft);
    for row in 0..18 {
        for col in 0..64 {
            assert_eq!(fb.glyph(col, row), None);
        }
    }
}

#[test]
fn clear_resets_pixels_and_glyphs() {
    let mut fb = small_fb();
    fb.blit(Sprite::Landscape, Vec2::ZERO);
    fb.text("HI", Band::Normal, Vec2::new(100.0, 80.0), Anchor::TopLeft);
    fb.clear();
    assert_eq!(fb.pixel(10, 10), Rgb(0, 0, 0));
    assert_eq!(fb.glyph(5, 2), None);
}

#[test]
fn present_writes_glyphs() {
    let mut fb = small_fb();
    fb.text("HI", Band::Normal, Vec2::new(100.0, 80.0), Anchor::TopLeft);
    let mut out: Vec<u8> = Vec::new();
    fb.present(&mut out).expect("write to vec");
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("HI"));
}

#[test]
fn game_over_prompt_shown_before_first_round() {
    let game = new_game();
    let mut fb = small_fb();
    draw_game(&game, &mut fb);

    let row: String = (16..48)
        .filter_map(|col| fb.glyph(col, 1).map(|(ch, _)| ch))
        .collect();
    assert_eq!(row, GAME_OVER_TEXT);
}

#[test]
fn resize_changes_pixel_grid() {
    let mut fb = small_fb();
    fb.resize(80, 24);
    assert_eq!(fb.size(), (80, 48));
    fb.blit(Sprite::Landscape, Vec2::ZERO);
    assert_ne!(fb.pixel(79, 47), Rgb(0, 0, 0));
}
