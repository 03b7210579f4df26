//! AI systems (distance, reactions, task scheduler, rear check)

pub mod distance;
pub mod reactions;
pub mod rear;
pub mod scheduler;

// Re-export all systems
pub use distance::*;
pub use reactions::*;
pub use rear::*;
pub use scheduler::*;
