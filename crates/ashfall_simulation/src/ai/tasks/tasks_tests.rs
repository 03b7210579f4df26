//! Tests for AI combat tasks and the per-actor scheduler.

#[cfg(test)]
mod tests {
    use crate::ai::components::{keys, EnemyState, EnemyStateRegister};
    use crate::ai::tasks::*;
    use crate::animation::Animator;
    use crate::combat::{ComboSequencer, ResourceMeter};
    use crate::config::{AiTuning, ComboTuning, MeterTuning};
    use crate::movement::{Locomotion, MoveResult, MovementCommand};
    use crate::shared::TimerService;
    use bevy::prelude::*;
    use rand::rngs::mock::StepRng;

    /// Всё состояние актора, из которого собирается TaskContext
    struct Harness {
        register: EnemyStateRegister,
        locomotion: Locomotion,
        timers: TimerService<TaskTimer>,
        animator: Animator,
        combo: ComboSequencer,
        meter: ResourceMeter,
        tuning: AiTuning,
        rng: StepRng,
        target: Option<Entity>,
        target_position: Option<Vec3>,
    }

    impl Harness {
        fn new(state: EnemyState, distance: f32) -> Self {
            let tuning = AiTuning::default();
            let mut register = EnemyStateRegister::new(state);
            register.set_float(keys::DISTANCE, distance);

            Self {
                register,
                locomotion: Locomotion::new(tuning.walk_speed),
                timers: TimerService::new(),
                animator: Animator::default(),
                combo: ComboSequencer::with_variants(
                    &ComboTuning::default(),
                    tuning.attack_variants.clone(),
                ),
                meter: ResourceMeter::new(&MeterTuning::default()),
                tuning,
                // gen_range → 0, gen::<f32>() → 0.0
                rng: StepRng::new(0, 0),
                target: Some(Entity::from_raw(7)),
                target_position: Some(Vec3::new(0.0, 0.0, -10.0)),
            }
        }

        fn ctx(&mut self) -> TaskContext<'_> {
            TaskContext {
                entity: Entity::PLACEHOLDER,
                target: self.target,
                target_position: self.target_position,
                register: &mut self.register,
                locomotion: &mut self.locomotion,
                timers: &mut self.timers,
                animator: &mut self.animator,
                combo: &mut self.combo,
                meter: &self.meter,
                tuning: &self.tuning,
                rng: &mut self.rng,
            }
        }
    }

    // ========================================================================
    // MeleeAttackTask
    // ========================================================================

    #[test]
    fn test_melee_far_target_moves_and_succeeds_on_arrival() {
        let mut h = Harness::new(EnemyState::Melee, 4.0);
        let mut task = MeleeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::InProgress);
        let request = task.move_request().expect("move issued");
        assert!(h.locomotion.is_listening(request));
        assert_eq!(h.locomotion.focus, h.target);
        assert_eq!(h.locomotion.acceptance_radius, 2.5);
        assert!(h.animator.last_played().is_none());

        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);

        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Succeeded);
        assert!(!h.locomotion.has_listener());
    }

    #[test]
    fn test_melee_close_target_attacks_and_waits_for_animation() {
        let mut h = Harness::new(EnemyState::Melee, 2.0);
        let mut task = MeleeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::InProgress);
        assert_eq!(h.animator.current_clip(), Some("boss_swing"));
        assert!(!h.locomotion.is_moving());
        assert_eq!(h.timers.pending_count(), 1);

        assert!(h.timers.advance(1.0).is_empty());
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);

        let fired = h.timers.advance(0.4);
        assert_eq!(fired.len(), 1);
        task.on_event(TaskEvent::TimerFired(fired[0].1), &mut h.ctx());
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Succeeded);
    }

    #[test]
    fn test_melee_aborts_when_target_leaves_melee_range() {
        let mut h = Harness::new(EnemyState::Melee, 4.0);
        let mut task = MeleeAttackTask::default();
        task.execute(&mut h.ctx());
        let request = task.move_request().expect("move issued");

        h.register.set_float(keys::DISTANCE, 6.0);
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Aborted);

        assert_eq!(h.register.get_state(), EnemyState::Range);
        assert!(!h.locomotion.is_listening(request));
        assert!(!h.locomotion.is_moving());
        assert_eq!(h.locomotion.focus, None);
        assert_eq!(h.locomotion.command, MovementCommand::Idle);
    }

    #[test]
    fn test_melee_abort_cancels_attack_timer() {
        let mut h = Harness::new(EnemyState::Melee, 2.0);
        let mut task = MeleeAttackTask::default();
        task.execute(&mut h.ctx());
        assert_eq!(h.timers.pending_count(), 1);

        h.register.set_float(keys::DISTANCE, 5.5);
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Aborted);
        assert_eq!(h.timers.pending_count(), 0);
        assert!(h.timers.advance(5.0).is_empty());
    }

    #[test]
    fn test_melee_without_target_fails() {
        let mut h = Harness::new(EnemyState::Melee, 4.0);
        h.target = None;
        let mut task = MeleeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Failed);
        assert!(!h.locomotion.is_moving());
    }

    #[test]
    fn test_melee_ignores_callbacks_for_other_phase() {
        let mut h = Harness::new(EnemyState::Melee, 4.0);
        let mut task = MeleeAttackTask::default();
        task.execute(&mut h.ctx());
        let request = task.move_request().expect("move issued");

        // Идём к цели: таймер атаки не про нас
        task.on_event(TaskEvent::TimerFired(TaskTimer::AttackFinished), &mut h.ctx());
        assert_eq!(task.phase(), melee::MeleePhase::Approaching(request));
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);

        let mut h = Harness::new(EnemyState::Melee, 2.0);
        let mut task = MeleeAttackTask::default();
        task.execute(&mut h.ctx());
        assert!(matches!(task.phase(), melee::MeleePhase::Attacking(_)));

        // Бьём: MoveCompleted не завершает анимацию
        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert!(!task.is_finished());
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);
        assert_eq!(h.timers.pending_count(), 1);
    }

    #[test]
    fn test_late_move_callback_after_abort_does_not_succeed() {
        let mut h = Harness::new(EnemyState::Melee, 4.0);
        let mut tasks = CombatTasks::default();

        assert_eq!(tasks.step(1.0 / 60.0, &mut h.ctx()), None);
        assert_eq!(tasks.active(), Some(TaskKind::Melee));
        let request = tasks.melee.move_request().expect("move issued");

        h.register.set_float(keys::DISTANCE, 8.0);
        assert_eq!(
            tasks.step(1.0 / 60.0, &mut h.ctx()),
            Some((TaskKind::Melee, TaskStatus::Aborted))
        );

        // Движение отменено, но подписки уже нет: scheduler не доставит callback
        assert!(!h.locomotion.is_listening(request));
        tasks.deliver(TaskEvent::MoveCompleted(MoveResult::Aborted), &mut h.ctx());
        assert!(!tasks.melee.is_finished());

        // Следующий шаг выбирает Range, а не "успешный" melee
        assert_eq!(
            tasks.step(1.0 / 60.0, &mut h.ctx()),
            Some((TaskKind::Range, TaskStatus::Succeeded))
        );
    }

    // ========================================================================
    // RangeAttackTask
    // ========================================================================

    #[test]
    fn test_range_attack_plays_and_decays_threshold() {
        let mut h = Harness::new(EnemyState::Range, 12.0);
        let mut task = RangeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Succeeded);
        assert_eq!(h.animator.current_clip(), Some("boss_throw"));
        assert_eq!(h.register.get_state(), EnemyState::Range);
        assert!((task.threshold() - 0.8).abs() < 1e-6);

        task.execute(&mut h.ctx());
        assert!((task.threshold() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_range_roll_above_threshold_switches_to_charge() {
        let mut h = Harness::new(EnemyState::Range, 12.0);
        let mut task = RangeAttackTask::default();
        task.execute(&mut h.ctx());
        assert!((task.threshold() - 0.8).abs() < 1e-6);

        // gen::<f32>() ≈ 1.0
        h.rng = StepRng::new(u64::MAX, 0);
        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Succeeded);
        assert_eq!(h.register.get_state(), EnemyState::Charge);
        assert_eq!(task.threshold(), 0.9);
    }

    #[test]
    fn test_range_fails_without_target_or_clip() {
        let mut h = Harness::new(EnemyState::Range, 12.0);
        let mut task = RangeAttackTask::default();

        h.target = None;
        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Failed);

        h.target = Some(Entity::from_raw(7));
        task.clip.duration = 0.0;
        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Failed);
        assert_eq!(task.threshold(), 0.9);
    }

    // ========================================================================
    // ChargeAttackTask
    // ========================================================================

    #[test]
    fn test_charge_full_flow() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        let mut task = ChargeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::InProgress);
        assert!(h.animator.charging);
        assert!(!h.register.get_bool(keys::IS_READY_TO_CHARGE));
        assert_eq!(h.animator.current_clip(), Some("boss_charge_windup"));

        // Wind-up ещё идёт
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);
        assert!(!h.locomotion.is_moving());

        h.register.set_bool(keys::IS_READY_TO_CHARGE, true);
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);
        assert!(!h.register.get_bool(keys::IS_READY_TO_CHARGE));
        assert!(task.is_dashing());
        assert_eq!(h.locomotion.max_speed, 20.0);
        assert_eq!(
            h.locomotion.command,
            MovementCommand::MoveToPosition {
                target: Vec3::new(0.0, 0.0, -10.0)
            }
        );
        let request = task.move_request().expect("dash issued");
        assert!(h.locomotion.is_listening(request));

        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert!(!h.animator.charging);
        assert_eq!(h.locomotion.max_speed, 5.0);
        assert_eq!(h.timers.pending_count(), 1);
        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::InProgress);

        let fired = h.timers.advance(1.0);
        assert_eq!(fired.len(), 1);
        task.on_event(TaskEvent::TimerFired(fired[0].1), &mut h.ctx());
        assert!(task.is_finished());
        // Состояние меняется только на следующем tick
        assert_eq!(h.register.get_state(), EnemyState::Charge);

        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Succeeded);
        assert_eq!(h.register.get_state(), EnemyState::Melee);
        assert!(!h.locomotion.has_listener());
    }

    #[test]
    fn test_charge_abort_mid_dash_restores_speed() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        let mut task = ChargeAttackTask::default();
        task.execute(&mut h.ctx());
        h.register.set_bool(keys::IS_READY_TO_CHARGE, true);
        task.tick(&mut h.ctx());
        assert_eq!(h.locomotion.max_speed, 20.0);

        task.abort(&mut h.ctx());

        assert_eq!(h.locomotion.max_speed, 5.0);
        assert!(!h.locomotion.is_moving());
        assert!(!h.locomotion.has_listener());
        assert!(!h.animator.charging);
        assert!(!task.is_dashing());
    }

    #[test]
    fn test_charge_without_target_fails_fast() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        h.target = None;
        h.target_position = None;
        let mut task = ChargeAttackTask::default();

        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::Failed);
        assert!(h.animator.last_played().is_none());
        assert!(!h.animator.charging);
        assert_eq!(task.phase(), charge::ChargePhase::Idle);
    }

    #[test]
    fn test_charge_target_lost_during_windup_fails() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        let mut task = ChargeAttackTask::default();
        assert_eq!(task.execute(&mut h.ctx()), TaskStatus::InProgress);

        h.target = None;
        h.target_position = None;
        h.register.set_bool(keys::IS_READY_TO_CHARGE, true);

        assert_eq!(task.tick(&mut h.ctx()), TaskStatus::Failed);
        assert!(!h.animator.charging);
        assert!(!h.locomotion.is_moving());
        assert!(!h.locomotion.has_listener());
        assert_eq!(h.locomotion.max_speed, 5.0);
        assert!(!h.register.get_bool(keys::IS_READY_TO_CHARGE));
        assert_eq!(task.phase(), charge::ChargePhase::Idle);
    }

    #[test]
    fn test_scheduler_charge_without_target_does_not_hang() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        h.target = None;
        h.target_position = None;
        let mut tasks = CombatTasks::default();

        assert_eq!(
            tasks.step(1.0 / 60.0, &mut h.ctx()),
            Some((TaskKind::Charge, TaskStatus::Failed))
        );
        assert_eq!(tasks.active(), None);
    }

    #[test]
    fn test_charge_ignores_callbacks_for_other_phase() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        let mut task = ChargeAttackTask::default();
        task.execute(&mut h.ctx());

        // Wind-up: MoveCompleted от чужого движения ничего не трогает
        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert_eq!(task.phase(), charge::ChargePhase::WindingUp);
        assert!(h.animator.charging);
        assert_eq!(h.timers.pending_count(), 0);

        h.register.set_bool(keys::IS_READY_TO_CHARGE, true);
        task.tick(&mut h.ctx());
        assert!(task.is_dashing());

        // Рывок: пауза ещё не запускалась
        task.on_event(TaskEvent::TimerFired(TaskTimer::PostChargePause), &mut h.ctx());
        assert!(task.is_dashing());
        assert!(!task.is_finished());
        assert_eq!(h.locomotion.max_speed, 20.0);

        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert!(matches!(task.phase(), charge::ChargePhase::CoolingDown(_)));

        // Пауза: повторный MoveCompleted не планирует второй таймер
        task.on_event(TaskEvent::MoveCompleted(MoveResult::Success), &mut h.ctx());
        assert_eq!(h.timers.pending_count(), 1);
    }

    // ========================================================================
    // CombatTasks scheduler
    // ========================================================================

    #[test]
    fn test_scheduler_rests_after_range_attack() {
        let mut h = Harness::new(EnemyState::Range, 12.0);
        let mut tasks = CombatTasks::default();

        assert_eq!(
            tasks.step(0.5, &mut h.ctx()),
            Some((TaskKind::Range, TaskStatus::Succeeded))
        );
        assert!(tasks.is_resting());

        for _ in 0..3 {
            assert_eq!(tasks.step(0.5, &mut h.ctx()), None);
        }
        assert!(!tasks.is_resting());

        assert_eq!(
            tasks.step(0.5, &mut h.ctx()),
            Some((TaskKind::Range, TaskStatus::Succeeded))
        );
    }

    #[test]
    fn test_scheduler_selects_nothing_in_idle_or_game_over() {
        for state in [EnemyState::Idle, EnemyState::GameOver] {
            let mut h = Harness::new(state, 2.0);
            let mut tasks = CombatTasks::default();

            assert_eq!(tasks.step(0.5, &mut h.ctx()), None);
            assert_eq!(tasks.active(), None);
            assert!(h.animator.last_played().is_none());
        }
    }

    #[test]
    fn test_abort_active_cleans_up_task() {
        let mut h = Harness::new(EnemyState::Charge, 10.0);
        let mut tasks = CombatTasks::default();
        tasks.step(0.5, &mut h.ctx());
        assert_eq!(tasks.active(), Some(TaskKind::Charge));

        assert_eq!(tasks.abort_active(&mut h.ctx()), Some(TaskKind::Charge));
        assert_eq!(tasks.active(), None);
        assert!(!h.animator.charging);
        assert_eq!(tasks.abort_active(&mut h.ctx()), None);
    }
}
