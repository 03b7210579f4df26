//! Movement компоненты: команда движения, фокус, скорость, подписка на завершение

use bevy::prelude::*;

/// Команда движения для актора (исполняется drive_locomotion)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Следовать за entity (target обновляется каждый тик)
    FollowEntity { target: Entity },
}

/// Куда двигаться
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveGoal {
    Position(Vec3),
    Entity(Entity),
}

/// Id запроса движения (уникален в пределах одного Locomotion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequestId(pub u32);

/// Движение актора: MoveTo / StopMovement / SetFocus / completion listener.
///
/// Логика подписки:
/// - `register_listener(id)` — активная задача хочет узнать о завершении `id`
/// - `unregister_listener()` — после этого MoveCompleted для задачи игнорируется
/// - новый `move_to` отменяет предыдущий запрос (MoveCompleted { Aborted })
#[derive(Component, Debug, Clone)]
pub struct Locomotion {
    pub command: MovementCommand,
    /// Метры/сек (читается и переписывается charge task и спринтом)
    pub max_speed: f32,
    pub acceptance_radius: f32,
    pub use_pathfinding: bool,
    /// Актор поворачивается к focus, а не по направлению движения
    pub focus: Option<Entity>,
    active_request: Option<MoveRequestId>,
    listener: Option<MoveRequestId>,
    next_request: u32,
    cancelled: Vec<MoveRequestId>,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl Locomotion {
    pub fn new(max_speed: f32) -> Self {
        Self {
            command: MovementCommand::Idle,
            max_speed,
            acceptance_radius: 0.0,
            use_pathfinding: true,
            focus: None,
            active_request: None,
            listener: None,
            next_request: 0,
            cancelled: Vec::new(),
        }
    }

    /// Начать движение к цели. Предыдущий незавершённый запрос отменяется.
    pub fn move_to(
        &mut self,
        goal: MoveGoal,
        use_pathfinding: bool,
        acceptance_radius: f32,
    ) -> MoveRequestId {
        if let Some(previous) = self.active_request.take() {
            self.cancelled.push(previous);
        }

        let id = MoveRequestId(self.next_request);
        self.next_request = self.next_request.wrapping_add(1);

        self.command = match goal {
            MoveGoal::Position(target) => MovementCommand::MoveToPosition { target },
            MoveGoal::Entity(target) => MovementCommand::FollowEntity { target },
        };
        self.use_pathfinding = use_pathfinding;
        self.acceptance_radius = acceptance_radius;
        self.active_request = Some(id);
        id
    }

    /// Остановиться немедленно. Активный запрос завершается как Aborted.
    pub fn stop_movement(&mut self) {
        if let Some(active) = self.active_request.take() {
            self.cancelled.push(active);
        }
        self.command = MovementCommand::Idle;
    }

    /// Запрос завершён навигацией (drive_locomotion).
    pub fn finish_active(&mut self) -> Option<MoveRequestId> {
        self.command = MovementCommand::Idle;
        self.active_request.take()
    }

    pub fn active_request(&self) -> Option<MoveRequestId> {
        self.active_request
    }

    pub fn is_moving(&self) -> bool {
        self.active_request.is_some()
    }

    pub fn set_focus(&mut self, target: Entity) {
        self.focus = Some(target);
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn register_listener(&mut self, request: MoveRequestId) {
        self.listener = Some(request);
    }

    pub fn unregister_listener(&mut self) {
        self.listener = None;
    }

    pub fn is_listening(&self, request: MoveRequestId) -> bool {
        self.listener == Some(request)
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Отменённые запросы с прошлого вызова (публикуются как MoveCompleted { Aborted }).
    pub fn drain_cancelled(&mut self) -> Vec<MoveRequestId> {
        std::mem::take(&mut self.cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_supersedes_old() {
        let mut locomotion = Locomotion::default();
        let first = locomotion.move_to(MoveGoal::Position(Vec3::X), true, 0.5);
        let second = locomotion.move_to(MoveGoal::Position(Vec3::Z), true, 0.5);

        assert_ne!(first, second);
        assert_eq!(locomotion.active_request(), Some(second));
        assert_eq!(locomotion.drain_cancelled(), vec![first]);
        assert!(locomotion.drain_cancelled().is_empty());
    }

    #[test]
    fn test_stop_movement_cancels_active() {
        let mut locomotion = Locomotion::default();
        let request = locomotion.move_to(MoveGoal::Entity(Entity::from_raw(3)), true, 2.5);

        locomotion.stop_movement();
        assert!(!locomotion.is_moving());
        assert_eq!(locomotion.command, MovementCommand::Idle);
        assert_eq!(locomotion.drain_cancelled(), vec![request]);

        // Повторный stop — no-op
        locomotion.stop_movement();
        assert!(locomotion.drain_cancelled().is_empty());
    }

    #[test]
    fn test_listener_registration() {
        let mut locomotion = Locomotion::default();
        let request = locomotion.move_to(MoveGoal::Position(Vec3::X), true, 0.5);

        assert!(!locomotion.is_listening(request));
        locomotion.register_listener(request);
        assert!(locomotion.is_listening(request));

        locomotion.unregister_listener();
        assert!(!locomotion.is_listening(request));
    }
}
