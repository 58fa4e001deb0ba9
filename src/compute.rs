/// Game-logic functions.
///
/// The scene tree is advanced in place by `tick`.  Everything an entity needs
/// to know about the rest of the game (input, timer, where the player and the
/// town are) arrives through a `Frame`; anything it wants to change outside
/// its own subtree goes back out as an `Effect`.  Randomness is injected.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::consts::*;
use crate::entities::{
    Anchor, Cue, EmitterState, Game, Item, Keys, Kind, Layer, PlayerPhase, PlayerState, Rect,
    Spawn, Sprite,
};

// ── Per-frame context ─────────────────────────────────────────────────────────

/// Something an entity did that `tick` settles once the tree pass is over.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Scored,
    /// The falling sled hit the ground.
    Landed,
    Sound(Cue),
}

/// Shared state for one pass over the tree.  Player and foreground publish
/// their positions here as soon as they have moved, so entities later in the
/// tree see the current frame's values.
///
/// Pickups and drops are handed over through `refuel`, `freeze` and `drops`.
/// The player and the gift container take them on their own turn, so an
/// entity updated later in the same pass sees the change at once; whatever
/// is left over is settled by `tick`.
pub struct Frame<'a, R: Rng> {
    pub width: f32,
    pub height: f32,
    pub keys: Keys,
    pub time: f32,
    pub targets: &'a [Rect],
    pub player_pos: Vec2,
    pub fg_pos: Vec2,
    pub fg_vel: Vec2,
    pub rng: &'a mut R,
    /// Fuel caught since the player's last update.
    pub refuel: f32,
    /// Freeze caught since the player's last update.
    pub freeze: Option<f32>,
    /// Gifts dropped but not yet placed in the gift container.
    pub drops: Vec<Item>,
    pub effects: Vec<Effect>,
}

impl<'a, R: Rng> Frame<'a, R> {
    /// A context with no input, no targets and a stopped clock.
    pub fn new(width: f32, height: f32, rng: &'a mut R) -> Self {
        Self {
            width,
            height,
            keys: Keys::default(),
            time: 0.0,
            targets: &[],
            player_pos: Vec2::new(width / 2.0, height / 2.0),
            fg_pos: Vec2::ZERO,
            fg_vel: Vec2::ZERO,
            rng,
            refuel: 0.0,
            freeze: None,
            drops: Vec::new(),
            effects: Vec::new(),
        }
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Chimney openings in the town image, in the foreground's own frame.
pub fn chimneys() -> Vec<Rect> {
    vec![
        Rect::new(91.0, 232.0, 29.0, 33.0),
        Rect::new(314.0, 233.0, 29.0, 31.0),
        Rect::new(449.0, 227.0, 29.0, 38.0),
        Rect::new(590.0, 114.0, 28.0, 31.0),
        Rect::new(638.0, 119.0, 29.0, 24.0),
        Rect::new(689.0, 105.0, 32.0, 40.0),
        Rect::new(818.0, 135.0, 30.0, 32.0),
        Rect::new(1111.0, 235.0, 30.0, 31.0),
    ]
}

pub fn new_player(pos: Vec2) -> Item {
    Item::new(Kind::Player(PlayerState {
        fuel: FUEL_MAX,
        cooldown: 0.0,
        frozen: 0.0,
        max_speed: PLAYER_MAX_SPEED,
        phase: PlayerPhase::Flying,
    }))
    .at(pos)
    .with_sprite(Sprite::Sledge, Anchor::Center)
}

pub fn new_gift(pos: Vec2, vel: Vec2) -> Item {
    Item::new(Kind::Gift)
        .at(pos)
        .moving(vel)
        .accelerating(Vec2::new(0.0, GIFT_GRAVITY))
        .with_timeout(GIFT_TIMEOUT_MS)
        .with_sprite(Sprite::Gift, Anchor::Center)
}

pub fn new_twinkle(pos: Vec2, vel: Vec2) -> Item {
    Item::new(Kind::Twinkle)
        .at(pos)
        .moving(vel)
        .with_timeout(TWINKLE_TIMEOUT_MS)
        .with_sprite(Sprite::Twinkle, Anchor::Center)
}

pub fn new_pickup(spawn: Spawn, pos: Vec2, vel: Vec2) -> Item {
    let (kind, sprite) = match spawn {
        Spawn::Star => (Kind::Star, Sprite::Star),
        Spawn::Flake => (Kind::Flake, Sprite::Flake),
    };
    Item::new(kind)
        .at(pos)
        .moving(vel)
        .with_timeout(PICKUP_TIMEOUT_MS)
        .with_sprite(sprite, Anchor::Center)
}

pub fn new_scenery(layer: Layer, pos: Vec2, vel: Vec2) -> Item {
    let sprite = match layer {
        Layer::Background => Sprite::Landscape,
        Layer::Foreground => Sprite::Town,
    };
    Item::new(Kind::Scenery(layer))
        .at(pos)
        .moving(vel)
        .with_sprite(sprite, Anchor::TopLeft)
}

/// Emitter whose first spawn comes after a random delay in `[min, max]` ms.
pub fn new_emitter(
    pos: Vec2,
    speed: Vec2,
    spawn: Spawn,
    min: u32,
    max: u32,
    rng: &mut impl Rng,
) -> Item {
    Item::new(Kind::Emitter(EmitterState {
        speed,
        spawn,
        min,
        max,
        cooldown: rng.gen_range(min..=max) as f32,
    }))
    .at(pos)
}

/// Build the scene in its draw order.  The round starts over: the timer is
/// at zero and the player has to press confirm to begin.
pub fn init_game(width: f32, height: f32, rng: &mut impl Rng) -> Game {
    let mut root = Item::new(Kind::Group);
    root.add(new_scenery(
        Layer::Background,
        Vec2::ZERO,
        Vec2::new(BACKGROUND_SPEED, 0.0),
    ));
    root.add(new_emitter(
        Vec2::new(width, 0.0),
        Vec2::from(STAR_SPEED),
        Spawn::Star,
        STAR_INTERVAL_MS.0,
        STAR_INTERVAL_MS.1,
        rng,
    ));
    root.add(new_player(Vec2::new(width / 2.0, height / 2.0)));
    root.add(new_emitter(
        Vec2::new(width, 0.0),
        Vec2::from(FLAKE_SPEED),
        Spawn::Flake,
        FLAKE_INTERVAL_MS.0,
        FLAKE_INTERVAL_MS.1,
        rng,
    ));
    root.add(new_scenery(
        Layer::Foreground,
        Vec2::new(0.0, height / 2.0),
        Vec2::new(FOREGROUND_SPEED, 0.0),
    ));
    root.add(Item::new(Kind::Gifts));
    root.add(Item::new(Kind::Ui));

    Game {
        root,
        width,
        height,
        keys: Keys::default(),
        time: 0.0,
        score: 0,
        targets: chimneys(),
    }
}

// ── Tree update ───────────────────────────────────────────────────────────────

/// Advance one node and its subtree by `delta` milliseconds.  Inactive nodes
/// are left untouched.
pub fn update_item<R: Rng>(item: &mut Item, delta: f32, frame: &mut Frame<'_, R>) {
    if !item.active {
        return;
    }

    match item.kind {
        Kind::Player(_) => steer_player(item, delta, frame),
        Kind::Gifts => item.items.append(&mut frame.drops),
        _ => {}
    }

    advance(item, delta, frame);

    if let Kind::Player(_) = item.kind {
        frame.player_pos = item.pos;
    }

    // Collision hooks still run on the frame an item times out
    match item.kind {
        Kind::Gift => deliver_gift(item, frame),
        Kind::Star | Kind::Flake => collect_pickup(item, frame),
        Kind::Scenery(layer) => {
            item.pos.x = wrap(item.pos.x, frame.width);
            if layer == Layer::Foreground {
                frame.fg_pos = item.pos;
                frame.fg_vel = item.vel;
            }
        }
        Kind::Emitter(_) => emit(item, delta, frame),
        _ => {}
    }
}

/// Timeout, Euler step, prune, recurse.
fn advance<R: Rng>(item: &mut Item, delta: f32, frame: &mut Frame<'_, R>) {
    if item.timeout > 0.0 {
        item.timeout -= delta;
        if item.timeout <= 0.0 {
            item.active = false;
        }
    }

    item.vel += item.acc * delta;
    item.pos += item.vel * delta;

    item.items.retain(|child| child.active);
    for child in &mut item.items {
        update_item(child, delta, frame);
    }
}

/// Wrap a horizontal coordinate into `[0, width)`.
pub fn wrap(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to exactly `width` for tiny negative inputs
    if wrapped >= width {
        0.0
    } else {
        wrapped
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

fn steer_player<R: Rng>(item: &mut Item, delta: f32, frame: &mut Frame<'_, R>) {
    let Kind::Player(state) = &mut item.kind else {
        return;
    };
    let (width, height) = (frame.width, frame.height);

    catch_pickups(state, frame);

    if state.fuel > 0.0 && frame.time > 0.0 {
        state.phase = PlayerPhase::Flying;
        state.fuel = (state.fuel - FUEL_DRAIN_PER_MS * delta).max(0.0);

        // Keys set the velocity directly; no momentum while flying
        item.acc = Vec2::ZERO;
        item.vel = Vec2::ZERO;
        let keys = frame.keys;
        if keys.left && item.pos.x > width / 8.0 {
            item.vel.x -= state.max_speed;
        }
        if keys.right && item.pos.x < 7.0 / 8.0 * width {
            item.vel.x += state.max_speed;
        }
        if keys.up && item.pos.y > height / 8.0 {
            item.vel.y -= state.max_speed;
        }
        if keys.down && item.pos.y < 5.0 / 8.0 * height {
            item.vel.y += state.max_speed;
        }

        let jitter = Vec2::new(
            frame.rng.gen::<f32>() - 0.5,
            frame.rng.gen::<f32>() - 0.5,
        ) * TWINKLE_JITTER;
        item.items.push(new_twinkle(
            item.pos + Vec2::from(TWINKLE_OFFSET),
            frame.fg_vel + jitter,
        ));
    } else {
        item.acc = Vec2::new(0.0, FALL_ACCEL);
        if state.phase == PlayerPhase::Flying {
            info!(
                "sled falling (fuel {:.1}, time {:.0} ms)",
                state.fuel, frame.time
            );
            state.phase = PlayerPhase::Falling;
        }

        if item.pos.y > GROUND_FACTOR * height {
            item.acc = Vec2::ZERO;
            frame.time = 0.0;
            frame.effects.push(Effect::Landed);
            if state.phase != PlayerPhase::Landed {
                info!("sled landed at y={:.0}", item.pos.y);
                state.phase = PlayerPhase::Landed;
            }
        }
    }

    if state.cooldown > 0.0 {
        state.cooldown -= delta;
    }
    if state.frozen > 0.0 {
        state.frozen -= delta;
    }

    if frame.keys.drop && frame.time > 0.0 && state.cooldown <= 0.0 && state.frozen <= 0.0 {
        state.cooldown = DROP_COOLDOWN_MS;
        frame.effects.push(Effect::Sound(Cue::Drop));
        frame
            .drops
            .push(new_gift(item.pos, item.vel + Vec2::from(GIFT_LAUNCH)));
    }
}

/// Take over the fuel and freeze caught so far this frame.
fn catch_pickups<R: Rng>(state: &mut PlayerState, frame: &mut Frame<'_, R>) {
    if frame.refuel > 0.0 {
        state.fuel = (state.fuel + frame.refuel).min(FUEL_MAX);
        frame.refuel = 0.0;
    }
    if let Some(ms) = frame.freeze.take() {
        state.frozen = ms;
    }
}

// ── Gifts and pickups ─────────────────────────────────────────────────────────

/// Chimneys live in the foreground's frame, so the gift is tested at its
/// position relative to the scrolled town.
fn deliver_gift<R: Rng>(item: &mut Item, frame: &mut Frame<'_, R>) {
    let mut local = item.pos - frame.fg_pos;
    local.x = wrap(local.x, frame.width);
    if frame.targets.iter().any(|target| target.contains(local)) {
        debug!("gift delivered at ({:.0}, {:.0})", local.x, local.y);
        item.active = false;
        frame.effects.push(Effect::Sound(Cue::Bling));
        frame.effects.push(Effect::Scored);
    }
}

/// Pickups are caught by a box centred on the player, in screen space.
fn collect_pickup<R: Rng>(item: &mut Item, frame: &mut Frame<'_, R>) {
    let (w, h) = (frame.width, frame.height);
    let zone = match item.kind {
        Kind::Star => Rect::centered(frame.player_pos, w / 4.0, h / 4.0),
        Kind::Flake => Rect::centered(frame.player_pos, w / 8.0, h / 8.0),
        _ => return,
    };
    if !zone.contains(item.pos) {
        return;
    }
    debug!("{:?} collected", item.kind);
    item.active = false;
    if item.kind == Kind::Star {
        frame.refuel += STAR_FUEL;
        frame.effects.push(Effect::Sound(Cue::Bling));
    } else {
        frame.freeze = Some(FREEZE_MS);
    }
}

// ── Emitters ──────────────────────────────────────────────────────────────────

fn emit<R: Rng>(item: &mut Item, delta: f32, frame: &mut Frame<'_, R>) {
    let Kind::Emitter(state) = &mut item.kind else {
        return;
    };

    if state.cooldown > 0.0 {
        state.cooldown -= delta;
        return;
    }

    state.cooldown = frame.rng.gen_range(state.min..=state.max) as f32;
    let band = (frame.height / 8.0) as i32..=(frame.height / 2.0) as i32;
    let offset = frame.rng.gen_range(band) as f32;
    let pos = item.pos + Vec2::new(0.0, offset);
    debug!("{:?} spawned at y={:.0}", state.spawn, pos.y);
    item.items.push(new_pickup(state.spawn, pos, state.speed));
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the whole game by `delta` milliseconds and return the sounds to
/// play.  While the round is over, `keys.confirm` starts a new one.
pub fn tick(game: &mut Game, keys: Keys, delta: f32, rng: &mut impl Rng) -> Vec<Cue> {
    game.keys = keys;
    let was_running = !game.is_over();

    let player_pos = game
        .player()
        .map_or(Vec2::new(game.width / 2.0, game.height / 2.0), |p| p.pos);
    let (fg_pos, fg_vel) = game
        .foreground()
        .map_or((Vec2::ZERO, Vec2::ZERO), |fg| (fg.pos, fg.vel));

    let mut frame = Frame {
        width: game.width,
        height: game.height,
        keys,
        time: game.time,
        targets: &game.targets,
        player_pos,
        fg_pos,
        fg_vel,
        rng,
        refuel: 0.0,
        freeze: None,
        drops: Vec::new(),
        effects: Vec::new(),
    };
    update_item(&mut game.root, delta, &mut frame);
    let Frame {
        refuel,
        freeze,
        drops,
        effects,
        ..
    } = frame;

    settle_leftovers(game, refuel, freeze, drops);
    let cues = apply_effects(game, effects);

    if game.time >= 0.0 {
        game.time -= delta;
    }
    if was_running && game.is_over() {
        info!("round over, {} gifts delivered", game.score);
    }

    if game.time < 0.0 && keys.confirm {
        restart(game);
    }

    cues
}

/// Pickups caught after the player's turn and gifts dropped after the gift
/// container's turn take effect before the next frame.
fn settle_leftovers(game: &mut Game, refuel: f32, freeze: Option<f32>, drops: Vec<Item>) {
    if let Some(state) = game.player_mut().and_then(Item::player_mut) {
        if refuel > 0.0 {
            state.fuel = (state.fuel + refuel).min(FUEL_MAX);
        }
        if let Some(ms) = freeze {
            state.frozen = ms;
        }
    }
    if let Some(gifts) = game.gifts_mut() {
        gifts.items.extend(drops);
    }
}

fn apply_effects(game: &mut Game, effects: Vec<Effect>) -> Vec<Cue> {
    let mut cues = Vec::new();
    for effect in effects {
        match effect {
            Effect::Scored => game.score += 1,
            Effect::Landed => game.time = 0.0,
            Effect::Sound(cue) => cues.push(cue),
        }
    }
    cues
}

/// Start a new round: full timer, zero score, sled back in the middle.
pub fn restart(game: &mut Game) {
    info!("new round");
    game.time = ROUND_MS;
    game.score = 0;
    let center = Vec2::new(game.width / 2.0, game.height / 2.0);
    if let Some(player) = game.player_mut() {
        player.pos = center;
        player.vel = Vec2::ZERO;
        player.acc = Vec2::ZERO;
        if let Some(state) = player.player_mut() {
            state.fuel = FUEL_MAX;
            state.phase = PlayerPhase::Flying;
        }
    }
}
