//! Timer service: one-shot таймеры с handle + retriggerable delay.
//!
//! Таймеры тикают вручную из систем FixedUpdate (`advance(delta)`), как
//! `phase_timer -= delta` в melee системах. Сработавшие таймеры возвращаются
//! вызывающему коду, который доставляет их владельцу ДО его tick
//! (callback-then-tick порядок).

/// Handle запланированного таймера (уникален внутри одного `TimerService`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone)]
struct ScheduledTimer<T> {
    handle: TimerHandle,
    remaining: f32,
    payload: T,
}

/// Набор one-shot таймеров одного владельца.
///
/// `schedule_once` → handle, `cancel(handle)` → таймер никогда не сработает.
#[derive(Debug, Clone)]
pub struct TimerService<T> {
    next_handle: u32,
    pending: Vec<ScheduledTimer<T>>,
}

impl<T> Default for TimerService<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerService<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать payload через `delay` секунд.
    pub fn schedule_once(&mut self, delay: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.pending.push(ScheduledTimer {
            handle,
            remaining: delay.max(0.0),
            payload,
        });
        handle
    }

    /// Отменить таймер. Возвращает false если он уже сработал или был отменён.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Продвинуть время. Сработавшие таймеры удаляются и возвращаются в порядке планирования.
    pub fn advance(&mut self, delta: f32) -> Vec<(TimerHandle, T)> {
        let mut fired = Vec::new();
        let mut index = 0;

        while index < self.pending.len() {
            self.pending[index].remaining -= delta;
            if self.pending[index].remaining <= 0.0 {
                let timer = self.pending.remove(index);
                fired.push((timer.handle, timer.payload));
            } else {
                index += 1;
            }
        }

        fired
    }
}

/// Retriggerable delay: повторный `trigger()` перезапускает отсчёт с нуля
/// (не суммируется с остатком).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetriggerableDelay {
    pub duration: f32,
    remaining: Option<f32>,
}

impl RetriggerableDelay {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: None,
        }
    }

    pub fn trigger(&mut self) {
        self.remaining = Some(self.duration);
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Возвращает true ровно один раз — на тике истечения.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            false
        }
    }
}
