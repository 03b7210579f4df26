//! Player movement actions: sprint, walk, roll.

use bevy::prelude::*;

use super::meter::{ResourceMeter, Stat};
use crate::animation::{AnimationClip, Animator};
use crate::config::PlayerTuning;
use crate::movement::Locomotion;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect)]
pub enum Gait {
    #[default]
    Walk,
    Sprint,
}

/// Sprint/walk/roll state of the player.
#[derive(Component, Clone, Debug)]
pub struct PlayerActions {
    pub gait: Gait,
    pub is_rolling: bool,
    roll_timer: Option<f32>,
    walk_speed: f32,
    sprint_speed: f32,
    sprint_cost: f32,
    roll_cost: f32,
    roll_clip: AnimationClip,
}

impl Default for PlayerActions {
    fn default() -> Self {
        Self::new(&PlayerTuning::default())
    }
}

impl PlayerActions {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            gait: Gait::Walk,
            is_rolling: false,
            roll_timer: None,
            walk_speed: tuning.walk_speed,
            sprint_speed: tuning.sprint_speed,
            sprint_cost: tuning.sprint_cost,
            roll_cost: tuning.roll_cost,
            roll_clip: tuning.roll.clone(),
        }
    }

    /// Sprint while moving. Short on stamina → degrade to walk.
    ///
    /// Returns the stamina cost to apply.
    pub fn sprint(
        &mut self,
        meter: &ResourceMeter,
        moving: bool,
        locomotion: &mut Locomotion,
    ) -> Option<f32> {
        if !meter.has_enough(Stat::Stamina, self.sprint_cost) {
            self.walk(locomotion);
            return None;
        }

        if !moving {
            return None;
        }

        self.gait = Gait::Sprint;
        locomotion.max_speed = self.sprint_speed;
        Some(self.sprint_cost)
    }

    pub fn walk(&mut self, locomotion: &mut Locomotion) {
        self.gait = Gait::Walk;
        locomotion.max_speed = self.walk_speed;
    }

    /// Start a roll. No-op while already rolling or short on stamina.
    pub fn roll(&mut self, meter: &ResourceMeter, animator: &mut Animator) -> Option<f32> {
        if self.is_rolling || !meter.has_enough(Stat::Stamina, self.roll_cost) {
            return None;
        }

        let duration = animator.play(&self.roll_clip);
        if duration <= 0.0 {
            return None;
        }

        self.is_rolling = true;
        self.roll_timer = Some(duration);
        Some(self.roll_cost)
    }

    pub fn tick(&mut self, delta: f32) {
        let Some(remaining) = self.roll_timer.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.roll_timer = None;
            self.is_rolling = false;
        }
    }
}
