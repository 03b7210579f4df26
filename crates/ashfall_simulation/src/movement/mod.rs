//! Movement domain — навигация и команды перемещения
//!
//! Содержит:
//! - Locomotion (MoveTo / StopMovement / focus / completion listener)
//! - MovementCommand (high-level intent для навигации)
//! - MoveCompleted (event: запрос движения завершён или отменён)
//! - drive_locomotion (headless навигация: прямая к цели, без navmesh)

pub mod components;
pub mod events;
pub mod systems;

// Re-export all components and events
pub use components::*;
pub use events::*;
pub use systems::*;
