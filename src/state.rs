//! Interaction state for a single mounted card.
//!
//! Two monotonic counters (candles lit, balloons popped) plus a one-way
//! `celebrating` flag. Nothing outside this module touches the fields; the
//! browser layer only calls the action methods and reads [`CardView`]
//! snapshots. Invalid actions are silently ignored and report `false`.

use crate::config::CardConfig;

/// Window inner size as last reported by the resize listener.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Celebration phase. `Complete` is inferred from the candle counter; the
/// `celebrating` flag itself never goes back to false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Celebrating,
    Complete,
}

#[derive(Clone, Debug)]
pub struct InteractionState {
    total_candles: u32,
    total_balloons: u32,
    candles_lit: u32,
    balloons_popped: u32,
    celebrating: bool,
    viewport: Viewport,
}

/// Confetti shows once everything is lit and popped, or as soon as the user
/// celebrates. All inputs only move forward, so once true it stays true.
pub fn confetti_visible(
    candles_lit: u32,
    total_candles: u32,
    balloons_popped: u32,
    total_balloons: u32,
    celebrating: bool,
) -> bool {
    celebrating || (candles_lit == total_candles && balloons_popped == total_balloons)
}

/// While celebrating the next candle is drawn lit ahead of the counter
/// (`<=`); in manual mode only candles already counted are lit (`<`).
pub fn candle_lit(index: u32, candles_lit: u32, celebrating: bool) -> bool {
    if celebrating {
        index <= candles_lit
    } else {
        index < candles_lit
    }
}

impl InteractionState {
    pub fn new(total_candles: u32, total_balloons: u32) -> Self {
        Self {
            total_candles,
            total_balloons,
            candles_lit: 0,
            balloons_popped: 0,
            celebrating: false,
            viewport: Viewport::default(),
        }
    }

    pub fn from_config(cfg: &CardConfig) -> Self {
        Self::new(cfg.total_candles, cfg.total_balloons)
    }

    pub fn total_candles(&self) -> u32 {
        self.total_candles
    }

    pub fn total_balloons(&self) -> u32 {
        self.total_balloons
    }

    pub fn candles_lit(&self) -> u32 {
        self.candles_lit
    }

    pub fn balloons_popped(&self) -> u32 {
        self.balloons_popped
    }

    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Light the candle at `index`. Only the next unlit candle responds.
    pub fn light_candle(&mut self, index: u32) -> bool {
        if index != self.candles_lit || self.candles_lit >= self.total_candles {
            return false;
        }
        self.candles_lit += 1;
        true
    }

    /// Pop the balloon at `index`. Only the next unpopped balloon responds.
    pub fn pop_balloon(&mut self, index: u32) -> bool {
        if index != self.balloons_popped || self.balloons_popped >= self.total_balloons {
            return false;
        }
        self.balloons_popped += 1;
        true
    }

    /// Start the celebration. Returns `false` if it was already started, in
    /// which case nothing changes and no new timer must be scheduled.
    pub fn celebrate(&mut self) -> bool {
        if self.celebrating {
            return false;
        }
        self.celebrating = true;
        true
    }

    /// Whether the celebration timer still has candles to light.
    pub fn celebration_pending(&self) -> bool {
        self.celebrating && self.candles_lit < self.total_candles
    }

    /// One tick of the celebration timer: lights the next candle regardless
    /// of click order. Returns whether the timer should keep running.
    pub fn celebration_tick(&mut self) -> bool {
        if !self.celebration_pending() {
            return false;
        }
        self.candles_lit += 1;
        self.celebration_pending()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
    }

    pub fn is_complete(&self) -> bool {
        self.candles_lit == self.total_candles && self.balloons_popped == self.total_balloons
    }

    pub fn confetti_visible(&self) -> bool {
        confetti_visible(
            self.candles_lit,
            self.total_candles,
            self.balloons_popped,
            self.total_balloons,
            self.celebrating,
        )
    }

    pub fn phase(&self) -> Phase {
        match (self.celebrating, self.candles_lit >= self.total_candles) {
            (false, _) => Phase::Idle,
            (true, false) => Phase::Celebrating,
            (true, true) => Phase::Complete,
        }
    }

    pub fn candle_is_lit(&self, index: u32) -> bool {
        candle_lit(index, self.candles_lit, self.celebrating)
    }

    pub fn balloon_is_popped(&self, index: u32) -> bool {
        index < self.balloons_popped
    }

    /// Snapshot of everything the renderer needs.
    pub fn view(&self, cfg: &CardConfig) -> CardView {
        let candles = (0..self.total_candles)
            .map(|i| {
                let lit = self.candle_is_lit(i);
                ItemView {
                    active: lit,
                    color: if lit { cfg.candle_color(i) } else { cfg.inactive_color.as_str() }.to_string(),
                }
            })
            .collect();
        let balloons = (0..self.total_balloons)
            .map(|i| {
                let popped = self.balloon_is_popped(i);
                ItemView {
                    active: popped,
                    color: if popped { cfg.inactive_color.as_str() } else { cfg.balloon_color(i) }.to_string(),
                }
            })
            .collect();
        CardView {
            candles,
            balloons,
            celebrate_enabled: !self.celebrating,
            confetti_visible: self.confetti_visible(),
            viewport: self.viewport,
        }
    }
}

/// One candle or balloon. `active` means lit for candles, popped for balloons.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemView {
    pub active: bool,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub candles: Vec<ItemView>,
    pub balloons: Vec<ItemView>,
    pub celebrate_enabled: bool,
    pub confetti_visible: bool,
    pub viewport: Viewport,
}
