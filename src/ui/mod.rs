//! Interactive terminal dashboard and keyboard controls.
pub mod input;
pub mod model;
pub mod render;

#[cfg(test)]
mod tests;

pub use input::{InputAction, map_key, setup_input_handler};
pub use model::{UiRenderData, UiSettings};
pub use render::{Dashboard, setup_render_ui};
