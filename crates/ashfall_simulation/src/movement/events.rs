//! Movement events

use bevy::prelude::*;

use super::components::MoveRequestId;

/// Чем закончился запрос движения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Достигли acceptance radius
    Success,
    /// StopMovement, новый запрос поверх старого или цель пропала
    Aborted,
}

/// Event: запрос движения завершён
///
/// Генерируется:
/// - drive_locomotion (прибытие / пропавшая цель)
/// - flush_cancelled_moves (StopMovement, перезапись запроса)
///
/// Обрабатывается:
/// - AI task scheduler: доставляет в активную задачу ТОЛЬКО если
///   `Locomotion::is_listening(request)` (отписка = гарантия, что
///   поздний callback после abort ничего не сделает)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MoveCompleted {
    pub entity: Entity,
    pub request: MoveRequestId,
    pub result: MoveResult,
}
