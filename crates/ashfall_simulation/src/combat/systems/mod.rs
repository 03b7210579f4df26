//! Combat systems (per-tick glue)

pub mod actions;
pub mod death;
pub mod guard;
pub mod hits;
pub mod meter;
pub mod projectiles;

// Re-export all systems
pub use actions::*;
pub use death::*;
pub use guard::*;
pub use hits::*;
pub use meter::*;
pub use projectiles::*;
