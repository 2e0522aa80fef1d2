//! Core state and scheduling for the Chase Overlay stream tool.
//!
//! Everything in this crate except the Yew shell in `main.rs` is plain Rust
//! that runs on the native target, so the counters, mark lists, bounty
//! scheduler and sprite physics are unit tested without a browser.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod bounty;
pub mod config;
pub mod frames;
pub mod images;
pub mod marks;
pub mod sprite;
pub mod state;
pub mod timers;
pub mod utils;
pub mod viewport;

use config::{INITIAL_BAG_COUNT, INITIAL_CHASE_COUNT};

/// Identifies one of the overlay's running counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterId {
    Bags,
    Chases,
    SectionChases,
    SectionA,
    SectionB,
    SectionC,
}

impl CounterId {
    /// Counters shown as sections in the Sections view, in display order.
    pub const SECTIONS: [CounterId; 3] = [CounterId::SectionA, CounterId::SectionB, CounterId::SectionC];

    pub fn label(self) -> &'static str {
        match self {
            CounterId::Bags => "Bags",
            CounterId::Chases => "Chases",
            CounterId::SectionChases => "Chases",
            CounterId::SectionA => "Section A",
            CounterId::SectionB => "Section B",
            CounterId::SectionC => "Section C",
        }
    }
}

impl fmt::Display for CounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All counters of the overlay. Values are unsigned, so a counter can never
/// go below zero; decrementing at zero leaves it at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub bags: u32,
    pub chases: u32,
    pub section_chases: u32,
    pub section_a: u32,
    pub section_b: u32,
    pub section_c: u32,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            bags: INITIAL_BAG_COUNT,
            chases: INITIAL_CHASE_COUNT,
            section_chases: 0,
            section_a: 0,
            section_b: 0,
            section_c: 0,
        }
    }
}

impl Counters {
    pub fn get(&self, id: CounterId) -> u32 {
        match id {
            CounterId::Bags => self.bags,
            CounterId::Chases => self.chases,
            CounterId::SectionChases => self.section_chases,
            CounterId::SectionA => self.section_a,
            CounterId::SectionB => self.section_b,
            CounterId::SectionC => self.section_c,
        }
    }

    fn slot_mut(&mut self, id: CounterId) -> &mut u32 {
        match id {
            CounterId::Bags => &mut self.bags,
            CounterId::Chases => &mut self.chases,
            CounterId::SectionChases => &mut self.section_chases,
            CounterId::SectionA => &mut self.section_a,
            CounterId::SectionB => &mut self.section_b,
            CounterId::SectionC => &mut self.section_c,
        }
    }

    /// Add one to `id` and return the new value.
    pub fn increment(&mut self, id: CounterId) -> u32 {
        let slot = self.slot_mut(id);
        *slot = slot.saturating_add(1);
        debug!("{} -> {}", id, *slot);
        *slot
    }

    /// Subtract one from `id`, clamped at zero, and return the new value.
    pub fn decrement(&mut self, id: CounterId) -> u32 {
        let slot = self.slot_mut(id);
        *slot = slot.saturating_sub(1);
        debug!("{} -> {}", id, *slot);
        *slot
    }

    /// Sum of the three section counters.
    pub fn section_total(&self) -> u32 {
        CounterId::SECTIONS.iter().map(|&id| self.get(id)).sum()
    }
}

/// Format `numerator / denominator` as a percentage with one decimal place.
///
/// A zero denominator yields `"0%"` (no decimal), matching what the overlay
/// shows before any bag has been counted. Ties round up (1/16 is `"6.3%"`).
///
/// # Examples
/// ```
/// use chase_overlay::hit_ratio;
/// assert_eq!(hit_ratio(8, 50), "16.0%");
/// assert_eq!(hit_ratio(3, 0), "0%");
/// ```
pub fn hit_ratio(numerator: u32, denominator: u32) -> String {
    if denominator == 0 {
        return "0%".to_string();
    }
    let ratio = numerator as f64 / denominator as f64 * 100.0;
    // `{:.1}` alone would round 6.25 to the even digit.
    format!("{:.1}%", (ratio * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CounterId; 6] = [
        CounterId::Bags,
        CounterId::Chases,
        CounterId::SectionChases,
        CounterId::SectionA,
        CounterId::SectionB,
        CounterId::SectionC,
    ];

    #[test]
    fn test_decrement_at_zero_stays_zero() {
        let mut counters = Counters {
            bags: 0,
            chases: 0,
            ..Counters::default()
        };
        for id in ALL {
            assert_eq!(counters.decrement(id), 0);
            assert_eq!(counters.get(id), 0);
        }
    }

    #[test]
    fn test_increment_then_decrement_is_identity() {
        let mut counters = Counters::default();
        for id in ALL {
            let before = counters.get(id);
            assert_eq!(counters.increment(id), before + 1);
            assert_eq!(counters.decrement(id), before);
        }
    }

    #[test]
    fn test_counters_are_independent() {
        let mut counters = Counters::default();
        counters.increment(CounterId::SectionB);
        counters.increment(CounterId::SectionB);
        counters.increment(CounterId::SectionC);
        assert_eq!(counters.section_a, 0);
        assert_eq!(counters.section_b, 2);
        assert_eq!(counters.section_total(), 3);
        assert_eq!(counters.bags, INITIAL_BAG_COUNT);
    }

    #[test]
    fn test_hit_ratio_zero_denominator() {
        for n in [0, 1, 8, 1000] {
            assert_eq!(hit_ratio(n, 0), "0%");
        }
    }

    #[test]
    fn test_hit_ratio_formatting() {
        assert_eq!(hit_ratio(8, 50), "16.0%");
        assert_eq!(hit_ratio(0, 50), "0.0%");
        assert_eq!(hit_ratio(1, 3), "33.3%");
        assert_eq!(hit_ratio(3, 3), "100.0%");
    }

    #[test]
    fn test_hit_ratio_rounds_ties_up() {
        assert_eq!(hit_ratio(1, 16), "6.3%");
        assert_eq!(hit_ratio(5, 16), "31.3%");
        assert_eq!(hit_ratio(9, 16), "56.3%");
        assert_eq!(hit_ratio(1, 8), "12.5%");
    }
}
