pub mod display;
pub mod scene;
pub mod toggle;

// Re-export main types
pub use display::DisplayBackend;
pub use scene::{MeshHandle, Scene, SceneMesh};
pub use toggle::{DisplayAction, SharedToggle, ToggleController, ToggleState};
