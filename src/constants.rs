//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Legacy tick units
//!
//! The destruction tuning (impact thresholds, fragment scatter, tool speeds)
//! was calibrated against a fixed 60 Hz step where speeds were measured in
//! units *per tick*.  Rapier velocities are units *per second*, so any constant
//! documented as "per tick" is multiplied by [`TICK_RATE`] at the Rapier
//! boundary.  Do not fold the conversion into the constants themselves: the
//! raw values are load-bearing for game balance.

// ── Timebase ──────────────────────────────────────────────────────────────────

/// Legacy fixed-step rate (ticks per second) the destruction tuning assumes.
///
/// Impact magnitudes compare per-tick speeds against material thresholds;
/// the collision monitor divides Rapier's per-second speeds by this value
/// before the comparison.  Tool launch speeds multiply by it.
pub const TICK_RATE: f32 = 60.0;

// ── World ─────────────────────────────────────────────────────────────────────

/// Width of the static ground slab (world units).  Wide enough that nothing
/// built on screen can slide off the edge.
pub const GROUND_WIDTH: f32 = 3000.0;

/// Height of the static ground slab.
pub const GROUND_HEIGHT: f32 = 40.0;

/// Y position of the ground slab centre.  Near the bottom of the default
/// 720-high window so most of the view is buildable space.
pub const GROUND_Y: f32 = -300.0;

/// Friction coefficient of the ground surface.  High so stacked structures
/// don't creep sideways while settling.
pub const GROUND_FRICTION: f32 = 0.8;

/// Downward gravity acceleration (u/s²).
///
/// 1 unit/tick² at the legacy 60 Hz step = 1 × 60² = 3600 u/s².  A block
/// dropped from the top of the view hits the ground in roughly 0.6 s, matching
/// the snappy feel the destruction thresholds were tuned against.
pub const GRAVITY_ACCEL: f32 = 3600.0;

/// Gravity multiplier bounds for the runtime gravity adjustment keys.
pub const GRAVITY_SCALE_MIN: f32 = 0.0;
pub const GRAVITY_SCALE_MAX: f32 = 3.0;

/// Gravity multiplier change per key press.
pub const GRAVITY_SCALE_STEP: f32 = 0.1;

// ── Fracture ──────────────────────────────────────────────────────────────────

/// Bounding-box area (u²) per debris fragment: a body shatters into
/// `floor(w·h / 400)` pieces before clamping.
pub const FRACTURE_AREA_PER_FRAGMENT: f32 = 400.0;

/// Fragment count bounds.  Two pieces minimum so a fracture is always visible;
/// four maximum keeps chain-reaction body counts cheap.
pub const FRAGMENT_COUNT_MIN: u32 = 2;
pub const FRAGMENT_COUNT_MAX: u32 = 4;

/// Minimum fragment half-size floor (u).  Also the degenerate-geometry clamp:
/// a zero-area bounding box still yields fragments of this size.
pub const FRAGMENT_MIN_SIZE: f32 = 5.0;

/// Fragment spawn offset range as a fraction of the source extent:
/// each fragment lands within ±this × width (and height) of the source centre.
pub const FRAGMENT_POSITION_JITTER: f32 = 0.25;

/// Per-axis fragment velocity scatter (units per tick, ± range).
/// Multiplied by [`TICK_RATE`] when written into Rapier velocities.
pub const FRAGMENT_VELOCITY_JITTER: f32 = 2.5;

/// Number of dust particles emitted at the fracture site.
pub const FRACTURE_BURST_COUNT: u32 = 10;

// ── Debris material ───────────────────────────────────────────────────────────

/// Debris fragments use one generic material regardless of what they broke
/// off from; light and bouncy so rubble piles read as loose.
pub const DEBRIS_DENSITY: f32 = 0.002;
pub const DEBRIS_FRICTION: f32 = 0.3;
pub const DEBRIS_RESTITUTION: f32 = 0.2;

// ── Impact ────────────────────────────────────────────────────────────────────

/// Minimum impact magnitude (per-tick speed × mass) below which a contact
/// emits no sparks.  Filters out settling noise from resting stacks.
pub const SPARK_IMPACT_FLOOR: f32 = 1.0;

// ── Bomb ──────────────────────────────────────────────────────────────────────

/// Blast radius (u) of the bomb tool.
pub const BOMB_RADIUS: f32 = 120.0;

/// Blast strength in legacy force units.  Fed through the linear falloff
/// (`force × (1 − d/radius)`) before scaling; see [`EXPLOSION_IMPULSE_SCALE`].
pub const BOMB_FORCE: f32 = 0.05;

/// Converts legacy blast force into a Rapier impulse.
///
/// At 60 000, a centre hit of `BOMB_FORCE` on a default brick block
/// (mass ≈ 19) changes its speed by ≈ 160 u/s, enough to visibly throw
/// blocks without launching whole structures off screen.
pub const EXPLOSION_IMPULSE_SCALE: f32 = 60_000.0;

// ── Cannon ────────────────────────────────────────────────────────────────────

/// Cannonball collider radius (u).
pub const CANNON_BALL_RADIUS: f32 = 15.0;

/// Cannonball density.  Heavy for its size so a hit carries enough impact to
/// crack brick and stone.
pub const CANNON_BALL_DENSITY: f32 = 0.05;

pub const CANNON_BALL_FRICTION: f32 = 0.3;
pub const CANNON_BALL_RESTITUTION: f32 = 0.3;

/// Muzzle speed (units per tick).  Multiplied by [`TICK_RATE`] at spawn.
pub const CANNON_BALL_SPEED: f32 = 30.0;

// ── Wrecking ball ─────────────────────────────────────────────────────────────

/// Wrecking ball collider radius (u).
pub const WRECKING_BALL_RADIUS: f32 = 30.0;

/// Wrecking ball density; the heaviest object in the sandbox.
pub const WRECKING_BALL_DENSITY: f32 = 0.1;

pub const WRECKING_BALL_FRICTION: f32 = 0.5;
pub const WRECKING_BALL_RESTITUTION: f32 = 0.1;

/// Spawn height margin (u) above the top of the visible view.  The ball drops
/// into frame under gravity rather than popping into existence.
pub const WRECKING_BALL_DROP_MARGIN: f32 = 100.0;

// ── Building ──────────────────────────────────────────────────────────────────

/// Default rectangle block dimensions (u).
pub const BLOCK_RECT_WIDTH: f32 = 80.0;
pub const BLOCK_RECT_HEIGHT: f32 = 30.0;

/// Default circle block radius (u).
pub const BLOCK_CIRCLE_RADIUS: f32 = 15.0;

/// Default triangle block circumradius (u); triangles are equilateral,
/// point-up.
pub const BLOCK_TRIANGLE_RADIUS: f32 = 30.0;

/// Segment count used to approximate circle blocks as polygons for the cut
/// test.  12 keeps the edge walk cheap while a beam through any part of the
/// disc still registers.
pub const CIRCLE_CUT_SEGMENTS: u32 = 12;

/// Snap-grid spacing (u) when grid placement is enabled.
pub const GRID_SPACING: f32 = 20.0;

/// Half-extent cap (u) on the drawn snap-grid region around the view centre.
/// Bounds the per-frame line count when the camera is zoomed far out.
pub const GRID_DRAW_EXTENT: f32 = 700.0;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Hard cap on live particles.  Oldest are dropped first when a burst would
/// exceed it; prevents unbounded growth during chain destructions.
pub const PARTICLE_CAP: usize = 2000;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Minimum camera zoom scale (zoom *out*).
pub const MIN_ZOOM: f32 = 0.2;

/// Maximum camera zoom scale (zoom *in*).
pub const MAX_ZOOM: f32 = 5.0;

/// Multiplier applied to the zoom scale per scroll-wheel notch
/// (inverted for the opposite direction).
pub const ZOOM_STEP_FACTOR: f32 = 1.1;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Font size for the status line in the top-left corner.
pub const HUD_FONT_SIZE: f32 = 16.0;
