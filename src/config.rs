//! Application-level configuration constants.

// Counters
pub const INITIAL_BAG_COUNT: u32 = 50;
pub const INITIAL_CHASE_COUNT: u32 = 8;

// Bounty defaults
pub const DEFAULT_BOUNTY_DURATION_SEC: u32 = 5;
pub const DEFAULT_BOUNTY_INTERVAL_SEC: u32 = 10;

// Min/Max limits for the bounty sliders
pub const MIN_BOUNTY_DURATION_SEC: u32 = 1;
pub const MAX_BOUNTY_DURATION_SEC: u32 = 10;
pub const MIN_BOUNTY_INTERVAL_SEC: u32 = 5;
pub const MAX_BOUNTY_INTERVAL_SEC: u32 = 30;

// Delay before a running bounty is restarted after its settings change
pub const BOUNTY_RESTART_DELAY_MS: u32 = 100;

// UI Behavior
pub const CONTROLS_IDLE_MS: u32 = 3_000;

// Pan/zoom viewport
pub const ZOOM_INITIAL: f64 = 1.0;
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 4.0;
pub const ZOOM_STEP: f64 = 1.1;

// Sprite
pub const SPRITE_BASE_PATH: &str = "/";
pub const SPRITE_TOGGLE_ICON: &str = "384.gif";
pub const SPRITE_PALETTE: [&str; 7] = [
    "149.gif",
    "163.gif",
    "175.gif",
    "242.gif",
    "master-ball.png",
    "razz-berry.png",
    "heal-ball.png",
];
pub const SPRITE_SIZE_PX: f64 = 100.0;
pub const SPRITE_INITIAL_SPEED: f64 = 5.0;
pub const SPRITE_MAX_SPEED: f64 = 5.0;
pub const SPRITE_JITTER_PROBABILITY: f64 = 0.02;
pub const PLACEHOLDER_GLYPH: &str = "🎮";
