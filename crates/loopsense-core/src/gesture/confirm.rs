use tracing::debug;

use crate::config::ConfirmConfig;
use crate::consts::CONFIRM_STREAK_HEADROOM;

/// Gate output after one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Not enough net positive frames.
    Idle,
    /// Confirmed and being held; `progress` runs 0..=100 toward triggering.
    Holding { progress: u8 },
    /// The hold completed. Latched until [`ConfirmationGate::reset`].
    Triggered,
}

/// Turns noisy per-frame detections into a confirmed, held gesture.
///
/// Positive frames raise a streak counter (saturating a little above the
/// confirmation level), negative frames lower it. While the streak is at or
/// above `confirm_streak` the gesture is confirmed and a hold timer runs from
/// the first confirmed frame; after `hold_ms` the gate triggers.
#[derive(Clone, Debug)]
pub struct ConfirmationGate {
    config: ConfirmConfig,
    streak: u32,
    hold_started_ms: Option<u64>,
    triggered: bool,
}

impl ConfirmationGate {
    pub fn new(config: ConfirmConfig) -> Self {
        Self {
            config,
            streak: 0,
            hold_started_ms: None,
            triggered: false,
        }
    }

    /// Feed one frame's detection result, stamped in caller milliseconds.
    pub fn update(&mut self, detected: bool, now_ms: u64) -> GateState {
        if self.triggered {
            return GateState::Triggered;
        }

        let cap = self
            .config
            .confirm_streak
            .saturating_add(CONFIRM_STREAK_HEADROOM);
        self.streak = if detected {
            self.streak.saturating_add(1).min(cap)
        } else {
            self.streak.saturating_sub(1)
        };

        if !self.is_confirmed() {
            if self.hold_started_ms.take().is_some() {
                debug!(streak = self.streak, "Gesture confirmation lost");
            }
            return GateState::Idle;
        }

        let started = *self.hold_started_ms.get_or_insert_with(|| {
            debug!(at_ms = now_ms, "Gesture confirmed, hold started");
            now_ms
        });
        let elapsed = now_ms.saturating_sub(started);

        if elapsed >= self.config.hold_ms {
            debug!(elapsed_ms = elapsed, "Gesture hold complete");
            self.triggered = true;
            return GateState::Triggered;
        }

        let progress =
            (u128::from(elapsed) * 100 / u128::from(self.config.hold_ms)).min(100) as u8;
        GateState::Holding { progress }
    }

    pub fn is_confirmed(&self) -> bool {
        self.streak >= self.config.confirm_streak
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn reset(&mut self) {
        self.streak = 0;
        self.hold_started_ms = None;
        self.triggered = false;
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new(ConfirmConfig::default())
    }
}
