//! Combat components

pub mod actions;
pub mod combo;
pub mod guard;
pub mod meter;
pub mod projectile;
pub mod tracer;

#[cfg(test)]
mod guard_tests;
#[cfg(test)]
mod tracer_tests;

// Re-export all components
pub use actions::*;
pub use combo::*;
pub use guard::*;
pub use meter::*;
pub use projectile::*;
pub use tracer::*;
