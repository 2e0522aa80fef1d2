//! Bouncing decorative sprite.
//!
//! Pure physics: the animator is stepped once per frame with the current
//! viewport size and a caller-supplied RNG, so tests can pin every random
//! choice with a seeded generator.

use crate::config::{
    SPRITE_BASE_PATH, SPRITE_INITIAL_SPEED, SPRITE_JITTER_PROBABILITY, SPRITE_MAX_SPEED,
    SPRITE_PALETTE, SPRITE_SIZE_PX,
};
use log::debug;
use rand::Rng;

/// Pick a palette entry uniformly at random.
pub fn choose_sprite<R: Rng + ?Sized>(rng: &mut R) -> usize {
    let index = rng.random_range(0..SPRITE_PALETTE.len());
    debug!("🎮 Sprite chosen: {}", SPRITE_PALETTE[index]);
    index
}

/// Asset URL of palette entry `index` (wraps around if out of range).
pub fn sprite_url(index: usize) -> String {
    format!(
        "{}{}",
        SPRITE_BASE_PATH,
        SPRITE_PALETTE[index % SPRITE_PALETTE.len()]
    )
}

/// Position (top-left, px), velocity (px/frame) and rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteState {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub rotation: f64,
}

impl SpriteState {
    /// Start in the middle of the viewport, heading down-right.
    pub fn centered(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            x: viewport_width / 2.0,
            y: viewport_height / 2.0,
            dx: SPRITE_INITIAL_SPEED,
            dy: SPRITE_INITIAL_SPEED,
            rotation: 0.0,
        }
    }

    /// CSS `transform` value placing the sprite element.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px) rotate({:.1}deg)",
            self.x, self.y, self.rotation
        )
    }
}

/// Which axes bounced during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone)]
pub struct SpriteAnimator {
    pub state: SpriteState,
    pub sprite_size: f64,
    jitter_probability: f64,
    spin_on_bounce: bool,
}

impl SpriteAnimator {
    pub fn new(state: SpriteState) -> Self {
        Self {
            state,
            sprite_size: SPRITE_SIZE_PX,
            jitter_probability: SPRITE_JITTER_PROBABILITY,
            spin_on_bounce: true,
        }
    }

    /// Per-frame chance of a random velocity change, clamped to [0, 1].
    pub fn with_jitter_probability(mut self, probability: f64) -> Self {
        self.jitter_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn with_spin_on_bounce(mut self, spin: bool) -> Self {
        self.spin_on_bounce = spin;
        self
    }

    /// Advance one frame inside a `viewport_width` x `viewport_height` area.
    ///
    /// The sprite never leaves `[0, viewport - sprite_size]`: on crossing an
    /// edge it is put back on the edge and that velocity component is turned
    /// inward, so each crossing flips the sign exactly once.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        rng: &mut R,
    ) -> Bounce {
        let max_x = (viewport_width - self.sprite_size).max(0.0);
        let max_y = (viewport_height - self.sprite_size).max(0.0);
        let s = &mut self.state;

        s.x += s.dx;
        s.y += s.dy;

        let bounce = Bounce {
            x: bounce_axis(&mut s.x, &mut s.dx, max_x),
            y: bounce_axis(&mut s.y, &mut s.dy, max_y),
        };
        if self.spin_on_bounce && (bounce.x || bounce.y) {
            s.rotation = rng.random_range(0.0..360.0);
        }

        if rng.random_bool(self.jitter_probability) {
            s.dx = rng.random_range(-SPRITE_MAX_SPEED..=SPRITE_MAX_SPEED);
            s.dy = rng.random_range(-SPRITE_MAX_SPEED..=SPRITE_MAX_SPEED);
        }
        bounce
    }
}

fn bounce_axis(position: &mut f64, velocity: &mut f64, max: f64) -> bool {
    if *position <= 0.0 {
        *position = 0.0;
        if *velocity < 0.0 {
            *velocity = -*velocity;
            return true;
        }
    } else if *position >= max {
        *position = max;
        if *velocity > 0.0 {
            *velocity = -*velocity;
            return true;
        }
    }
    false
}
