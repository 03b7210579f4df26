//! EnemyStateRegister — blackboard AI актора (key/value, scoped per actor).

use bevy::prelude::*;
use std::collections::BTreeMap;

/// High-level состояние босса (выбор combat task)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyState {
    /// Ещё не заметил игрока
    #[default]
    Idle,
    Range,
    Melee,
    Charge,
    /// Игрок мёртв, AI больше ничего не выбирает
    GameOver,
}

/// Значение в register
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlackboardValue {
    Bool(bool),
    Float(f32),
    State(EnemyState),
}

/// Ключи register
pub mod keys {
    pub const CURRENT_STATE: &str = "CurrentState";
    pub const IS_READY_TO_CHARGE: &str = "IsReadyToCharge";
    pub const DISTANCE: &str = "Distance";
}

/// Shared register AI актора: читают и пишут tasks, реакции, distance система.
///
/// Отсутствующий ключ или ключ другого типа читается как значение по умолчанию
/// (Idle / false / 0.0) — как blackboard движка.
#[derive(Component, Debug, Clone, Default)]
pub struct EnemyStateRegister {
    values: BTreeMap<String, BlackboardValue>,
}

impl EnemyStateRegister {
    pub fn new(initial: EnemyState) -> Self {
        let mut register = Self::default();
        register.set_state(initial);
        register
    }

    pub fn get(&self, key: &str) -> Option<BlackboardValue> {
        self.values.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: BlackboardValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get_state(&self) -> EnemyState {
        match self.get(keys::CURRENT_STATE) {
            Some(BlackboardValue::State(state)) => state,
            _ => EnemyState::Idle,
        }
    }

    pub fn set_state(&mut self, state: EnemyState) {
        self.set(keys::CURRENT_STATE, BlackboardValue::State(state));
    }

    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(BlackboardValue::Bool(true)))
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, BlackboardValue::Bool(value));
    }

    pub fn get_float(&self, key: &str) -> f32 {
        match self.get(key) {
            Some(BlackboardValue::Float(value)) => value,
            _ => 0.0,
        }
    }

    pub fn set_float(&mut self, key: &str, value: f32) {
        self.set(key, BlackboardValue::Float(value));
    }
}
