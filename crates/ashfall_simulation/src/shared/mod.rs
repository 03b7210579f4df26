//! Shared domain — cross-cutting утилиты
//!
//! Содержит:
//! - TimerService / RetriggerableDelay (timer collaborator для AI tasks и meter)

pub mod timers;

pub use timers::*;
