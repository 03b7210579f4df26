//! AI Events

use bevy::prelude::*;

/// Perception: наблюдатель заметил pawn
///
/// Генерируется внешним perception (sight cone) или тестами.
/// Обрабатывается handle_target_detected: Idle босс, увидевший свою цель → Range.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetDetected {
    /// AI актор, который увидел
    pub observer: Entity,
    /// Кого увидел
    pub target: Entity,
}
