//! One running demo: scene, panel, frame loop, resize and snapshot handling
//!
//! [`DemoSession`] holds everything a demo needs between frames and routes
//! host events to the right handler. It never touches the GPU directly; the
//! render surface and frame host are passed in, so the whole session runs
//! against fakes in tests.

use winit::event::ElementState;
use winit::keyboard::Key;

use crate::controls::ControlPanel;
use crate::demos::DemoSetup;
use crate::error::Result;
use crate::gfx::rendering::RenderSurface;
use crate::gfx::resources::MaterialId;
use crate::gfx::scene::Scene;
use crate::input::{action_for_key, InputAction};
use crate::runtime::{
    Clock, FrameHost, FrameLoop, LoopState, StopToken, SystemTimeSource, TickOutcome, TimeSource,
};
use crate::snapshot::{DisplaySurfaceFactory, SnapshotDirectory, SnapshotExporter};
use crate::viewport::{PixelRatio, ResizeHandler};

pub struct DemoSession<
    T: TimeSource = SystemTimeSource,
    F: DisplaySurfaceFactory = SnapshotDirectory,
> {
    pub scene: Scene,
    pub panel: ControlPanel,
    frame_loop: FrameLoop<T>,
    resize: ResizeHandler,
    exporter: SnapshotExporter<F>,
    pointer_targets: Vec<MaterialId>,
}

impl<F: DisplaySurfaceFactory> DemoSession<SystemTimeSource, F> {
    /// Starts the session clock now
    pub fn new(setup: DemoSetup, pixel_ratio: PixelRatio, factory: F) -> Result<Self> {
        Self::with_clock(setup, pixel_ratio, Clock::new(), factory)
    }
}

impl<T: TimeSource, F: DisplaySurfaceFactory> DemoSession<T, F> {
    pub fn with_clock(
        setup: DemoSetup,
        pixel_ratio: PixelRatio,
        clock: Clock<T>,
        factory: F,
    ) -> Result<Self> {
        let DemoSetup {
            scene,
            panel,
            rules,
            resize_target,
            pointer_targets,
        } = setup;
        let frame_loop = FrameLoop::with_clock(clock, rules, &scene)?;

        Ok(Self {
            scene,
            panel,
            frame_loop,
            resize: ResizeHandler::new(pixel_ratio, resize_target),
            exporter: SnapshotExporter::new(factory),
            pointer_targets,
        })
    }

    pub fn start(&mut self, host: &mut impl FrameHost) {
        self.frame_loop.start(host);
    }

    pub fn tick(&mut self, host: &mut impl FrameHost) -> Result<TickOutcome> {
        self.frame_loop.tick(&mut self.scene, &mut self.panel, host)
    }

    pub fn run_ticks(&mut self, n: usize, host: &mut impl FrameHost) -> Result<usize> {
        self.frame_loop
            .run_ticks(n, &mut self.scene, &mut self.panel, host)
    }

    pub fn state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    pub fn stop_token(&self) -> StopToken {
        self.frame_loop.stop_token()
    }

    /// Returns the new drawable size, `None` for a minimised window
    pub fn resize(
        &mut self,
        physical: (u32, u32),
        scale_factor: f64,
        surface: &mut impl RenderSurface,
    ) -> Result<Option<(u32, u32)>> {
        self.resize
            .handle(physical, scale_factor, &mut self.scene, surface)
    }

    pub fn drawable_size(&self) -> Option<(u32, u32)> {
        self.resize.current()
    }

    /// Handles a key event; returns true when a snapshot was written
    pub fn handle_key(
        &mut self,
        key: &Key,
        state: ElementState,
        repeat: bool,
        surface: &mut impl RenderSurface,
    ) -> Result<bool> {
        match action_for_key(key, state, repeat) {
            Some(InputAction::ExportSnapshot) => self.exporter.export(&mut self.scene, surface),
            None => Ok(false),
        }
    }

    /// Feeds the cursor position, in window pixels, to `u_mouse`
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Result<()> {
        for material in &self.pointer_targets {
            self.scene.material_manager.shader_mut(material)?.uniforms.mouse = [x, y];
        }
        Ok(())
    }

    pub fn exporter(&self) -> &SnapshotExporter<F> {
        &self.exporter
    }
}
