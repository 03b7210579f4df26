//! Animation collaborator (headless stand-in)
//!
//! Реальный движок проигрывает montage и шлёт notifies со своей timeline.
//! Здесь `Animator` делает то же самое по данным `AnimationClip`:
//! - `play(clip)` → duration (как PlayAnimMontage)
//! - hit window open/close → включает/выключает HitVolumeTracer
//! - end notify (AttackWindowEnd, ChargeReady) → сброс ledger/combo, charge readiness
//! - timed notify (SpawnProjectile) → точка выпуска снаряда внутри клипа

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Notify с timeline анимации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimNotify {
    /// Начало окна трассировки оружия
    HitWindowOpen,
    /// Конец окна трассировки оружия
    HitWindowClose,
    /// Конец атаки: ledger сбрасывается, combo gate открывается
    AttackWindowEnd,
    /// Charge wind-up доигран — босс готов к рывку
    ChargeReady,
    /// Момент броска: выпустить снаряд
    SpawnProjectile,
}

/// Анимационный ассет: имя + длительность + (опционально) окно удара, timed и end notify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    #[serde(default)]
    pub hit_window: Option<(f32, f32)>,
    #[serde(default)]
    pub end_notify: Option<AnimNotify>,
    /// (время, notify) внутри клипа; прерванный клип его не шлёт
    #[serde(default)]
    pub timed_notify: Option<(f32, AnimNotify)>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            hit_window: None,
            end_notify: None,
            timed_notify: None,
        }
    }

    /// Атакующий клип: окно удара + AttackWindowEnd в конце.
    pub fn attack(name: impl Into<String>, duration: f32, hit_window: (f32, f32)) -> Self {
        Self {
            name: name.into(),
            duration,
            hit_window: Some(hit_window),
            end_notify: Some(AnimNotify::AttackWindowEnd),
            timed_notify: None,
        }
    }

    pub fn with_end_notify(mut self, notify: AnimNotify) -> Self {
        self.end_notify = Some(notify);
        self
    }

    pub fn with_timed_notify(mut self, at: f32, notify: AnimNotify) -> Self {
        self.timed_notify = Some((at, notify));
        self
    }
}

#[derive(Debug, Clone)]
struct PlayingClip {
    clip: AnimationClip,
    elapsed: f32,
    window_opened: bool,
    window_closed: bool,
    timed_fired: bool,
}

/// Проигрыватель анимаций актора (один активный клип, как montage slot).
#[derive(Component, Debug, Clone, Default)]
pub struct Animator {
    playing: Option<PlayingClip>,
    last_played: Option<String>,
    /// Notifies прерванного клипа (закрыть окно, закончить атаку) — на следующем advance
    interrupted: Vec<AnimNotify>,
    /// Флаг anim blueprint: босс в состоянии рывка
    pub charging: bool,
}

impl Animator {
    /// Проиграть клип, прервав текущий. Возвращает длительность (0.0 для битого клипа).
    pub fn play(&mut self, clip: &AnimationClip) -> f32 {
        if clip.duration <= 0.0 {
            crate::logger::log_warning(&format!(
                "Animator: clip '{}' has no duration, ignored",
                clip.name
            ));
            return 0.0;
        }

        if let Some(previous) = &self.playing {
            if previous.window_opened && !previous.window_closed {
                self.interrupted.push(AnimNotify::HitWindowClose);
            }
            // Прерванная атака всё равно отпускает combo gate
            if previous.clip.end_notify == Some(AnimNotify::AttackWindowEnd) {
                self.interrupted.push(AnimNotify::AttackWindowEnd);
            }
        }

        self.last_played = Some(clip.name.clone());
        self.playing = Some(PlayingClip {
            clip: clip.clone(),
            elapsed: 0.0,
            window_opened: false,
            window_closed: false,
            timed_fired: false,
        });

        clip.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.playing.as_ref().map(|p| p.clip.name.as_str())
    }

    pub fn last_played(&self) -> Option<&str> {
        self.last_played.as_deref()
    }

    /// Продвинуть timeline, вернуть notifies в порядке timeline.
    pub fn advance(&mut self, delta: f32) -> Vec<AnimNotify> {
        let mut notifies = std::mem::take(&mut self.interrupted);

        let Some(playing) = self.playing.as_mut() else {
            return notifies;
        };

        playing.elapsed += delta;

        if let Some((open, close)) = playing.clip.hit_window {
            if !playing.window_opened && playing.elapsed >= open {
                playing.window_opened = true;
                notifies.push(AnimNotify::HitWindowOpen);
            }
            if playing.window_opened && !playing.window_closed && playing.elapsed >= close {
                playing.window_closed = true;
                notifies.push(AnimNotify::HitWindowClose);
            }
        }

        if let Some((at, notify)) = playing.clip.timed_notify {
            if !playing.timed_fired && playing.elapsed >= at {
                playing.timed_fired = true;
                notifies.push(notify);
            }
        }

        if playing.elapsed >= playing.clip.duration {
            if playing.window_opened && !playing.window_closed {
                notifies.push(AnimNotify::HitWindowClose);
            }
            if let Some(end) = playing.clip.end_notify {
                notifies.push(end);
            }
            self.playing = None;
        }

        notifies
    }
}

/// Event: notify с timeline анимации конкретного актора.
#[derive(Event, Debug, Clone)]
pub struct AnimationNotify {
    pub entity: Entity,
    pub notify: AnimNotify,
}

/// Система: продвинуть все Animator и разослать notifies.
pub fn advance_animators(
    mut animators: Query<(Entity, &mut Animator)>,
    mut notify_events: EventWriter<AnimationNotify>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut animator) in animators.iter_mut() {
        for notify in animator.advance(delta) {
            notify_events.write(AnimationNotify { entity, notify });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_clip_notify_order() {
        let mut animator = Animator::default();
        let clip = AnimationClip::attack("slash", 1.0, (0.25, 0.5));

        assert_eq!(animator.play(&clip), 1.0);
        assert!(animator.advance(0.2).is_empty());
        assert_eq!(animator.advance(0.1), vec![AnimNotify::HitWindowOpen]);
        assert_eq!(animator.advance(0.3), vec![AnimNotify::HitWindowClose]);
        assert_eq!(animator.advance(0.5), vec![AnimNotify::AttackWindowEnd]);
        assert!(!animator.is_playing());
        assert_eq!(animator.last_played(), Some("slash"));
    }

    #[test]
    fn test_interrupted_clip_closes_hit_window() {
        let mut animator = Animator::default();
        animator.play(&AnimationClip::attack("slash", 1.0, (0.1, 0.9)));
        assert_eq!(animator.advance(0.2), vec![AnimNotify::HitWindowOpen]);

        animator.play(&AnimationClip::new("block_react", 0.5));
        assert_eq!(
            animator.advance(0.1),
            vec![AnimNotify::HitWindowClose, AnimNotify::AttackWindowEnd]
        );
        assert_eq!(animator.current_clip(), Some("block_react"));
    }

    #[test]
    fn test_interrupted_windup_does_not_report_ready() {
        let mut animator = Animator::default();
        animator.play(&AnimationClip::new("windup", 0.8).with_end_notify(AnimNotify::ChargeReady));
        assert!(animator.advance(0.2).is_empty());

        animator.play(&AnimationClip::new("flinch", 0.5));
        assert!(animator.advance(0.6).is_empty());
    }

    #[test]
    fn test_timed_notify_fires_once_mid_clip() {
        let mut animator = Animator::default();
        let throw = AnimationClip::new("throw", 1.0).with_timed_notify(0.5, AnimNotify::SpawnProjectile);
        animator.play(&throw);

        assert!(animator.advance(0.4).is_empty());
        assert_eq!(animator.advance(0.2), vec![AnimNotify::SpawnProjectile]);
        assert!(animator.advance(0.2).is_empty());
        assert!(animator.advance(0.5).is_empty());
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_interrupted_throw_does_not_release() {
        let mut animator = Animator::default();
        animator.play(&AnimationClip::new("throw", 1.0).with_timed_notify(0.5, AnimNotify::SpawnProjectile));
        assert!(animator.advance(0.3).is_empty());

        animator.play(&AnimationClip::new("flinch", 0.5));
        assert!(animator.advance(0.6).is_empty());
    }

    #[test]
    fn test_zero_duration_clip_is_rejected() {
        let mut animator = Animator::default();
        assert_eq!(animator.play(&AnimationClip::new("broken", 0.0)), 0.0);
        assert!(!animator.is_playing());
    }
}
