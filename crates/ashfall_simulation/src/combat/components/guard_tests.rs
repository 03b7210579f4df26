//! Tests for GuardState.

#[cfg(test)]
mod tests {
    use crate::combat::components::guard::{BlockCheck, GuardPhase, GuardState};
    use crate::combat::components::meter::{ResourceMeter, Stat};
    use crate::config::{GuardTuning, MeterTuning};
    use bevy::prelude::*;

    fn guard() -> GuardState {
        GuardState::new(&GuardTuning::default())
    }

    fn meter() -> ResourceMeter {
        ResourceMeter::new(&MeterTuning::default())
    }

    /// Атакующий смотрит на защитника (-Z), защитник — на атакующего (+Z)
    const ATTACKER_FACING: Vec3 = Vec3::NEG_Z;
    const DEFENDER_FACING: Vec3 = Vec3::Z;

    #[test]
    fn test_block_lifecycle() {
        let mut guard = guard();
        assert!(guard.start_blocking(1.0));
        assert_eq!(guard.phase, GuardPhase::Blocking);
        assert!(guard.parry_window_open);

        // Повторный start — идемпотентный no-op
        assert!(!guard.start_blocking(1.05));
        assert_eq!(guard.block_started_at, 1.0);

        guard.tick(0.25);
        assert!(!guard.parry_window_open);
        assert!(guard.is_blocking());

        assert!(guard.stop_blocking());
        assert_eq!(guard.phase, GuardPhase::Idle);
    }

    #[test]
    fn test_parry_inside_window_succeeds() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        guard.tick(0.1);

        assert!(guard.attempt_parry(0.1));
        assert_eq!(guard.phase, GuardPhase::Parrying);
        assert!(guard.is_blocking());
    }

    #[test]
    fn test_parry_after_window_fails() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        guard.tick(0.3);

        assert!(!guard.attempt_parry(0.3));
        assert_eq!(guard.phase, GuardPhase::Blocking);
    }

    #[test]
    fn test_second_parry_in_same_window_fails() {
        let mut guard = guard();
        guard.start_blocking(0.0);

        assert!(guard.attempt_parry(0.05));
        assert!(!guard.attempt_parry(0.1));
    }

    #[test]
    fn test_each_block_activation_gets_one_parry() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        assert!(guard.attempt_parry(0.05));
        assert!(!guard.parry_armed());

        // Re-block сразу после parry — новая активация, свежее окно
        guard.stop_blocking();
        guard.start_blocking(0.1);
        assert!(guard.parry_armed());
        assert!(guard.parry_window_open);

        guard.tick(0.1);
        assert!(guard.attempt_parry(0.2));
        assert!(!guard.attempt_parry(0.25));
    }

    #[test]
    fn test_window_expiry_returns_parrying_to_blocking() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        assert!(guard.attempt_parry(0.05));

        guard.tick(0.25);
        assert!(!guard.parry_window_open);
        assert_eq!(guard.phase, GuardPhase::Blocking);
    }

    #[test]
    fn test_release_drops_window_timer() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        guard.tick(0.15);
        guard.stop_blocking();

        // Старый таймер не закрывает окно нового блока раньше срока
        guard.start_blocking(0.2);
        guard.tick(0.1);
        assert!(guard.parry_window_open);
        assert!(guard.attempt_parry(0.3));
    }

    #[test]
    fn test_parry_requires_blocking() {
        let mut guard = guard();
        assert!(!guard.attempt_parry(0.0));
    }

    #[test]
    fn test_check_not_blocking() {
        let mut guard = guard();
        let mut meter = meter();
        assert_eq!(
            guard.check(&mut meter, ATTACKER_FACING, DEFENDER_FACING),
            BlockCheck::NotReduced
        );
        assert_eq!(meter.get(Stat::Stamina), 100.0);
    }

    #[test]
    fn test_check_frontal_block_consumes_stamina() {
        let mut guard = guard();
        let mut meter = meter();
        guard.start_blocking(0.0);

        assert_eq!(
            guard.check(&mut meter, ATTACKER_FACING, DEFENDER_FACING),
            BlockCheck::Reduced
        );
        assert_eq!(meter.get(Stat::Stamina), 90.0);
        assert!(!guard.last_block_failed);
    }

    #[test]
    fn test_check_low_stamina_fails_even_at_valid_angle() {
        let mut guard = guard();
        let mut meter = meter();
        meter.set(Stat::Stamina, 5.0);
        guard.start_blocking(0.0);

        assert_eq!(
            guard.check(&mut meter, ATTACKER_FACING, DEFENDER_FACING),
            BlockCheck::NotReduced
        );
        assert_eq!(meter.get(Stat::Stamina), 5.0); // не списана
        assert!(guard.last_block_failed);
    }

    #[test]
    fn test_check_rear_hit_bypasses_block() {
        let mut guard = guard();
        let mut meter = meter();
        guard.start_blocking(0.0);

        // Атакующий за спиной: оба смотрят в одну сторону
        assert_eq!(
            guard.check(&mut meter, DEFENDER_FACING, DEFENDER_FACING),
            BlockCheck::NotReduced
        );
        assert_eq!(meter.get(Stat::Stamina), 100.0);
        assert!(!guard.last_block_failed);
    }

    #[test]
    fn test_reduced_damage_and_stun_request() {
        let guard = guard();
        assert!((guard.reduced_damage(20.0) - 6.0).abs() < 1e-5);

        let attacker = Entity::from_raw(7);
        let stun = guard.on_successful_parry(attacker);
        assert_eq!(stun.target, attacker);
        assert_eq!(stun.duration, 2.0);
    }

    #[test]
    fn test_stunned_guard_cannot_block() {
        let mut guard = guard();
        guard.start_blocking(0.0);
        guard.enter_stun();

        assert!(!guard.is_blocking());
        assert!(!guard.start_blocking(0.5));

        guard.leave_stun();
        assert!(guard.start_blocking(1.0));
    }
}
