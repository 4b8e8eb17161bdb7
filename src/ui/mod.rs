//! Dear ImGui overlay: the tuning panel and the performance readout

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::control_panel_window;
