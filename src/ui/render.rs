mod dashboard;
mod formatting;
mod frame;
mod lifecycle;
mod theme;

pub use dashboard::{Dashboard, restore_terminal};
pub(crate) use formatting::format_duration;
pub use lifecycle::setup_render_ui;
