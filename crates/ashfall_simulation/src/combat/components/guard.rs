//! Guard components: block, parry window, stun.

use bevy::prelude::*;

use super::meter::{ResourceMeter, Stat};
use crate::config::GuardTuning;

// ============================================================================
// Guard State Component
// ============================================================================

/// Guard phases.
///
/// `Parrying` is a sub-state of `Blocking`: the defender still blocks while
/// the successful parry plays out, and returns to `Blocking` when the parry
/// window expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum GuardPhase {
    Idle,
    Blocking,
    Parrying,
    Stunned,
}

/// Result of the block check on overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockCheck {
    /// Hit goes through at full damage
    NotReduced,
    /// Block held: stamina spent, damage scaled by the reduction factor
    Reduced,
}

/// Stun to apply to an attacker after a successful parry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StunRequest {
    pub target: Entity,
    pub duration: f32,
}

/// Defender guard state machine.
///
/// ```text
/// Idle --start_blocking--> Blocking(window open, parry armed)
///      --window expiry--> Blocking(window closed) --stop_blocking--> Idle
/// ```
///
/// The parry flag is one-shot per block activation: `start_blocking` arms it
/// and opens a fresh window, a successful parry disarms it. Releasing the
/// block closes the window and drops its timer.
#[derive(Component, Clone, Debug)]
pub struct GuardState {
    pub phase: GuardPhase,
    /// Simulation time (seconds) of the current block activation
    pub block_started_at: f32,
    pub parry_window_open: bool,
    /// Last check failed for lack of stamina (still shows a hit effect)
    pub last_block_failed: bool,
    parry_armed: bool,
    window_timer: Option<f32>,
    stamina_cost: f32,
    parry_window: f32,
    stun_duration: f32,
    frontal_threshold: f32,
    reduction_factor: f32,
}

impl Default for GuardState {
    fn default() -> Self {
        Self::new(&GuardTuning::default())
    }
}

impl GuardState {
    pub fn new(tuning: &GuardTuning) -> Self {
        Self {
            phase: GuardPhase::Idle,
            block_started_at: 0.0,
            parry_window_open: false,
            last_block_failed: false,
            parry_armed: true,
            window_timer: None,
            stamina_cost: tuning.stamina_cost,
            parry_window: tuning.parry_window,
            stun_duration: tuning.parry_stun_duration,
            frontal_threshold: tuning.frontal_threshold,
            reduction_factor: tuning.reduction_factor,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.phase, GuardPhase::Blocking | GuardPhase::Parrying)
    }

    pub fn is_parrying(&self) -> bool {
        self.phase == GuardPhase::Parrying
    }

    pub fn is_stunned(&self) -> bool {
        self.phase == GuardPhase::Stunned
    }

    pub fn parry_armed(&self) -> bool {
        self.parry_armed
    }

    /// Start a block at simulation time `now`.
    ///
    /// Returns false (no-op) while already blocking or stunned.
    pub fn start_blocking(&mut self, now: f32) -> bool {
        if self.phase != GuardPhase::Idle {
            return false;
        }

        self.phase = GuardPhase::Blocking;
        self.block_started_at = now;
        self.parry_window_open = true;
        self.parry_armed = true;
        self.window_timer = Some(self.parry_window);
        true
    }

    /// Release the block: the parry window ends with it.
    pub fn stop_blocking(&mut self) -> bool {
        if !self.is_blocking() {
            return false;
        }

        self.phase = GuardPhase::Idle;
        self.parry_window_open = false;
        self.window_timer = None;
        true
    }

    /// Advance the parry window timer. Expiry closes the window; an unused
    /// parry stays armed but can no longer fire in this activation.
    pub fn tick(&mut self, delta: f32) {
        let Some(remaining) = self.window_timer.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.window_timer = None;
            self.parry_window_open = false;
            if self.phase == GuardPhase::Parrying {
                self.phase = GuardPhase::Blocking;
            }
        }
    }

    /// Try to parry an incoming attack at simulation time `now`.
    ///
    /// Succeeds only while Blocking, within the window of the block start,
    /// and with the one-shot flag armed. A failed attempt changes nothing.
    pub fn attempt_parry(&mut self, now: f32) -> bool {
        let in_window =
            self.parry_window_open && now - self.block_started_at <= self.parry_window;

        if self.phase != GuardPhase::Blocking || !in_window || !self.parry_armed {
            return false;
        }

        self.parry_armed = false;
        self.phase = GuardPhase::Parrying;
        true
    }

    /// Block check for an overlapping hit.
    ///
    /// Order: blocking → stamina → angle. Only when both stamina and angle
    /// pass is stamina consumed and the hit reduced.
    pub fn check(
        &mut self,
        meter: &mut ResourceMeter,
        opponent_forward: Vec3,
        self_forward: Vec3,
    ) -> BlockCheck {
        self.last_block_failed = false;

        if !self.is_blocking() {
            return BlockCheck::NotReduced;
        }

        if !meter.has_enough(Stat::Stamina, self.stamina_cost) {
            self.last_block_failed = true;
            return BlockCheck::NotReduced;
        }

        // Facing each other → dot ≈ -1. Flank/rear hits bypass the block.
        if opponent_forward.dot(self_forward) > self.frontal_threshold {
            return BlockCheck::NotReduced;
        }

        meter.reduce(Stat::Stamina, self.stamina_cost);
        BlockCheck::Reduced
    }

    pub fn reduced_damage(&self, incoming: f32) -> f32 {
        incoming * self.reduction_factor
    }

    pub fn on_successful_parry(&self, attacker: Entity) -> StunRequest {
        StunRequest {
            target: attacker,
            duration: self.stun_duration,
        }
    }

    /// Enter stun: any block is dropped.
    pub fn enter_stun(&mut self) {
        self.phase = GuardPhase::Stunned;
        self.parry_window_open = false;
        self.window_timer = None;
    }

    pub fn leave_stun(&mut self) {
        if self.phase == GuardPhase::Stunned {
            self.phase = GuardPhase::Idle;
        }
    }
}

// ============================================================================
// Stun Component
// ============================================================================

/// Stun after being parried.
///
/// Suppresses the actor's AI tasks, movement and attacks until `timer` runs out.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct Stunned {
    /// Time remaining in stun (seconds)
    pub timer: f32,
    /// Entity who parried us
    pub parried_by: Entity,
}

impl Stunned {
    pub fn new(duration: f32, parried_by: Entity) -> Self {
        Self {
            timer: duration,
            parried_by,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.timer > 0.0
    }
}
