//! vitrine
//!
//! Small interactive 3D demos on wgpu and winit: a physically shaded torus
//! knot with a live tuning panel, a full-screen shader plane and a basic
//! spinning cube. Each demo supplies a scene, a control panel and animation
//! rules; [`DemoSession`] runs them with a stoppable frame loop, resize
//! handling and PNG snapshot export on the `e` key.

pub mod app;
pub mod config;
pub mod controls;
pub mod demos;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod ui;
pub mod viewport;
pub mod wgpu_utils;

use clap::Parser;

pub use app::VitrineApp;
pub use config::{DemoConfig, LoadPolicy};
pub use error::{Result, VitrineError};
pub use session::DemoSession;

/// Initialises `env_logger`, defaulting to `info` when `RUST_LOG` is unset
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Runs `demo` with configuration from the command line and environment
///
/// Invalid flags or variables print a usage message and exit.
pub fn run(demo: &dyn demos::Demo) -> Result<()> {
    let config = DemoConfig::parse();
    log::debug!("{config:?}");
    VitrineApp::new(demo, config)?.run()
}
