//! AI components

pub mod rear_guard;
pub mod register;


// Re-export all components
pub use rear_guard::*;
pub use register::*;
