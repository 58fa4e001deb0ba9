/// Scene tree and game state. Pure data, no logic.
///
/// Every visual or physical object is an `Item`.  What distinguishes a gift
/// from a star or the player is its `Kind`; the update rules for each kind
/// live in `compute`.

use glam::Vec2;

// ── Drawing vocabulary ────────────────────────────────────────────────────────

/// Which point of an image (or text) lines up with its logical position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    Center,
    LeftCenter,
    RightCenter,
}

impl Anchor {
    /// Top-left corner of a box of `size` anchored at `pos`.
    pub fn top_left(self, pos: Vec2, size: Vec2) -> Vec2 {
        match self {
            Anchor::TopLeft => pos,
            Anchor::Center => pos - size / 2.0,
            Anchor::LeftCenter => Vec2::new(pos.x, pos.y - size.y / 2.0),
            Anchor::RightCenter => Vec2::new(pos.x - size.x, pos.y - size.y / 2.0),
        }
    }
}

/// Handle to an image asset.  Sizes and pixels are owned by the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Sledge,
    Landscape,
    Town,
    Gift,
    Twinkle,
    Star,
    Flake,
    /// 40×40 HUD copies of the star and the gift.
    StarIcon,
    GiftIcon,
}

impl Sprite {
    pub const ALL: [Sprite; 9] = [
        Sprite::Sledge,
        Sprite::Landscape,
        Sprite::Town,
        Sprite::Gift,
        Sprite::Twinkle,
        Sprite::Star,
        Sprite::Flake,
        Sprite::StarIcon,
        Sprite::GiftIcon,
    ];

    /// Logical size the image is scaled to at load time.
    pub fn size(self, width: f32, height: f32) -> Vec2 {
        match self {
            Sprite::Sledge => Vec2::new(width / 4.0, height / 4.0),
            Sprite::Landscape | Sprite::Town => Vec2::new(width, height),
            Sprite::Gift => Vec2::splat(25.0),
            Sprite::Twinkle => Vec2::splat(10.0),
            Sprite::Star => Vec2::splat(32.0),
            Sprite::Flake => Vec2::splat(48.0),
            Sprite::StarIcon | Sprite::GiftIcon => Vec2::splat(40.0),
        }
    }
}

/// HUD colour band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Normal,
    Warning,
    Critical,
}

/// Sound effects raised by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Drop,
    Bling,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle; contains its top/left edges, excludes bottom/right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keyboard snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub drop: bool,
    pub confirm: bool,
}

// ── Per-kind state ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Fuel and time left: steering and dropping.
    Flying,
    /// Out of fuel or time: gravity takes over.
    Falling,
    /// Hit the ground while falling; the round is over.
    Landed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub fuel: f32,
    /// Milliseconds until the next gift may be dropped.
    pub cooldown: f32,
    /// Milliseconds the drop action stays blocked after catching a flake.
    pub frozen: f32,
    pub max_speed: f32,
    pub phase: PlayerPhase,
}

/// What an emitter produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    Star,
    Flake,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmitterState {
    /// Velocity handed to every spawned item.
    pub speed: Vec2,
    pub spawn: Spawn,
    pub min: u32,
    pub max: u32,
    /// Milliseconds until the next spawn.
    pub cooldown: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Background,
    /// The town; chimney targets are defined in this layer's frame.
    Foreground,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// Plain container or physics body without extra behaviour.
    Group,
    /// Container the player drops gifts into.
    Gifts,
    Player(PlayerState),
    Gift,
    Twinkle,
    Star,
    Flake,
    Scenery(Layer),
    Emitter(EmitterState),
    Ui,
}

// ── Scene node ────────────────────────────────────────────────────────────────

/// A node in the scene tree.  Children are owned and kept in insertion
/// order; an inactive child is dropped on its parent's next update.
#[derive(Clone, Debug)]
pub struct Item {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub active: bool,
    /// Milliseconds left to live; `<= 0` never expires.
    pub timeout: f32,
    pub sprite: Option<Sprite>,
    pub anchor: Anchor,
    pub kind: Kind,
    pub items: Vec<Item>,
}

impl Item {
    pub fn new(kind: Kind) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            active: true,
            timeout: 0.0,
            sprite: None,
            anchor: Anchor::TopLeft,
            kind,
            items: Vec::new(),
        }
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn moving(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn accelerating(mut self, acc: Vec2) -> Self {
        self.acc = acc;
        self
    }

    pub fn with_timeout(mut self, timeout: f32) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite, anchor: Anchor) -> Self {
        self.sprite = Some(sprite);
        self.anchor = anchor;
        self
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn player(&self) -> Option<&PlayerState> {
        match &self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            Kind::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Number of items in this subtree, excluding `self`.
    pub fn descendants(&self) -> usize {
        self.items.iter().map(|i| 1 + i.descendants()).sum()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The whole game: the scene root plus the global state every entity may
/// consult through the per-frame context.
#[derive(Clone, Debug)]
pub struct Game {
    pub root: Item,
    pub width: f32,
    pub height: f32,
    pub keys: Keys,
    /// Round countdown in milliseconds; negative means game over.
    pub time: f32,
    pub score: u32,
    /// Chimneys, in the foreground layer's own coordinates.
    pub targets: Vec<Rect>,
}

impl Game {
    pub fn player(&self) -> Option<&Item> {
        self.root.items.iter().find(|i| matches!(i.kind, Kind::Player(_)))
    }

    pub fn player_mut(&mut self) -> Option<&mut Item> {
        self.root
            .items
            .iter_mut()
            .find(|i| matches!(i.kind, Kind::Player(_)))
    }

    pub fn foreground(&self) -> Option<&Item> {
        self.root
            .items
            .iter()
            .find(|i| i.kind == Kind::Scenery(Layer::Foreground))
    }

    pub fn gifts(&self) -> Option<&Item> {
        self.root.items.iter().find(|i| i.kind == Kind::Gifts)
    }

    pub fn gifts_mut(&mut self) -> Option<&mut Item> {
        self.root.items.iter_mut().find(|i| i.kind == Kind::Gifts)
    }

    pub fn is_over(&self) -> bool {
        self.time <= 0.0
    }
}
