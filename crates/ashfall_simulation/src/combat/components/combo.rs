//! ComboSequencer — attack sequencing (player combo + AI random attack).

use bevy::prelude::*;
use rand::{Rng, RngCore};

use super::meter::{ResourceMeter, Stat};
use crate::animation::{AnimationClip, Animator};
use crate::config::ComboTuning;

/// Successful `combo_attack`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComboAttackOutcome {
    /// Index of the variant that was played
    pub index: usize,
    pub duration: f32,
    /// Stamina cost to apply (AttackPerformed event)
    pub cost: f32,
}

/// Attack sequencing state.
///
/// Invariants:
/// - `index` ∈ [0, variants.len()), wraps modulo the variant count
/// - `can_attack` is false exactly while an attack animation locks the attacker
#[derive(Component, Clone, Debug)]
pub struct ComboSequencer {
    pub variants: Vec<AnimationClip>,
    pub stamina_cost: f32,
    /// Duration of the last attack started through `random_attack`
    pub anim_duration: f32,
    index: usize,
    can_attack: bool,
    reset_time: f32,
    reset_timer: Option<f32>,
}

impl ComboSequencer {
    pub fn new(tuning: &ComboTuning) -> Self {
        Self::with_variants(tuning, tuning.variants.clone())
    }

    /// Same timing/cost rules, different clip set (AI attacks).
    pub fn with_variants(tuning: &ComboTuning, variants: Vec<AnimationClip>) -> Self {
        Self {
            variants,
            stamina_cost: tuning.stamina_cost,
            anim_duration: 0.0,
            index: 0,
            can_attack: true,
            reset_time: tuning.reset_time,
            reset_timer: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_timer.is_some()
    }

    /// Play the combo-indexed variant.
    ///
    /// No-op (None) when stamina is short, the gate is closed, or the clip is invalid.
    pub fn combo_attack(
        &mut self,
        meter: &ResourceMeter,
        animator: &mut Animator,
    ) -> Option<ComboAttackOutcome> {
        if !self.can_attack || !meter.has_enough(Stat::Stamina, self.stamina_cost) {
            return None;
        }

        let clip = self.variants.get(self.index)?;
        let duration = animator.play(clip);
        if duration <= 0.0 {
            return None;
        }

        let played = self.index;
        self.reset_timer = None;
        self.can_attack = false;
        self.index = (self.index + 1) % self.variants.len();

        Some(ComboAttackOutcome {
            index: played,
            duration,
            cost: self.stamina_cost,
        })
    }

    /// AttackWindowEnd: reopen the gate and (re)start the combo reset timer.
    pub fn handle_window_end(&mut self) {
        self.can_attack = true;
        self.reset_timer = Some(self.reset_time);
    }

    /// Advance the reset timer; on expiry the combo restarts from the first variant.
    pub fn tick(&mut self, delta: f32) {
        let Some(remaining) = self.reset_timer.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.reset_timer = None;
            self.index = 0;
        }
    }

    /// AI entry point: uniformly random variant, ignores index and gate.
    ///
    /// Returns the clip duration (0.0 if there is nothing valid to play).
    pub fn random_attack(&mut self, animator: &mut Animator, rng: &mut dyn RngCore) -> f32 {
        if self.variants.is_empty() {
            return 0.0;
        }

        let pick = rng.gen_range(0..self.variants.len());
        self.anim_duration = animator.play(&self.variants[pick]);
        self.anim_duration
    }
}
