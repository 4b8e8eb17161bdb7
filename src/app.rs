//! winit application hosting one demo
//!
//! The demo's scene is built before the event loop starts, so missing
//! resources abort the program before a window opens. The GPU, the ImGui
//! overlay and the session clock are created once the window exists.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::DemoConfig;
use crate::controls::ControlPanel;
use crate::demos::{Demo, DemoSetup};
use crate::error::{Result, VitrineError};
use crate::gfx::rendering::{RenderEngine, RenderOptions};
use crate::gfx::scene::Scene;
use crate::performance::PerformanceMonitor;
use crate::runtime::FrameHost;
use crate::session::DemoSession;
use crate::snapshot::SnapshotDirectory;
use crate::ui::{control_panel_window, UiManager};
use crate::viewport::PixelRatio;

pub struct VitrineApp {
    event_loop: EventLoop<()>,
    state: AppState,
}

struct Gpu {
    window: Arc<Window>,
    engine: RenderEngine,
    ui: UiManager,
}

struct AppState {
    config: DemoConfig,
    title: String,
    pixel_ratio: PixelRatio,
    srgb: bool,
    setup: Option<DemoSetup>,
    session: Option<DemoSession>,
    gpu: Option<Gpu>,
    stats: PerformanceMonitor,
    error: Option<VitrineError>,
}

/// [`FrameHost`] backed by the window, the renderer and the overlay
struct WindowHost<'a> {
    window: &'a Window,
    engine: &'a mut RenderEngine,
    ui: &'a mut UiManager,
    stats: &'a mut PerformanceMonitor,
}

impl FrameHost for WindowHost<'_> {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }

    fn update_stats(&mut self, delta: f32) {
        self.stats.record_frame(delta);
    }

    fn update_controls(&mut self, scene: &mut Scene, _delta: f32) {
        scene.update();
        self.stats.update_scene_stats(&scene.statistics());
    }

    fn render(&mut self, scene: &mut Scene, panel: &mut ControlPanel) -> Result<()> {
        let window = self.window;
        let ui = &mut *self.ui;
        let stats = &*self.stats;
        self.engine
            .render_frame(scene, |device, queue, encoder, view| {
                ui.draw(device, queue, encoder, window, view, |frame| {
                    stats.render_overlay(frame);
                    control_panel_window(frame, panel);
                })
            })
    }
}

impl VitrineApp {
    /// Builds the demo scene; resource errors are returned here
    pub fn new(demo: &dyn Demo, config: DemoConfig) -> Result<Self> {
        let (width, height) = config.window_size;
        let setup = demo.build(&config, width as f32 / height.max(1) as f32)?;
        log::info!(
            "built '{}': {} objects, {} lights",
            demo.title(),
            setup.scene.statistics().object_count,
            setup.scene.statistics().light_count
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        Ok(Self {
            event_loop,
            state: AppState {
                config,
                title: demo.title().to_string(),
                pixel_ratio: demo.pixel_ratio(),
                srgb: demo.srgb_output(),
                setup: Some(setup),
                session: None,
                gpu: None,
                stats: PerformanceMonitor::new(),
                error: None,
            },
        })
    }

    /// Runs until the window closes or setup fails
    pub fn run(mut self) -> Result<()> {
        self.event_loop.run_app(&mut self.state)?;
        match self.state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: VitrineError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(setup) = self.setup.take() else {
            return Ok(());
        };
        let (width, height) = self.config.window_size;
        let window = Arc::new(event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.title.clone())
                .with_inner_size(LogicalSize::new(width, height)),
        )?);

        let shadow_map_size = setup
            .scene
            .lights()
            .find_map(|light| light.shadow())
            .map_or(RenderOptions::default().shadow_map_size, |shadow| {
                shadow.map_size
            });
        let options = RenderOptions {
            vsync: self.config.vsync,
            srgb: self.srgb,
            shadow_map_size,
        };
        let size = window.inner_size();
        let mut engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            size.width,
            size.height,
            options,
        ))?;
        let mut ui = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );

        let factory = SnapshotDirectory::new(self.config.snapshot_dir.clone());
        let mut session = DemoSession::new(setup, self.pixel_ratio, factory)?;
        if let Some((w, h)) =
            session.resize((size.width, size.height), window.scale_factor(), &mut engine)?
        {
            ui.update_display_size(w, h);
        }
        // Compiles shader materials now so a bad custom shader fails at startup
        engine.prepare(&mut session.scene)?;

        let mut host = WindowHost {
            window: &window,
            engine: &mut engine,
            ui: &mut ui,
            stats: &mut self.stats,
        };
        session.start(&mut host);

        self.session = Some(session);
        self.gpu = Some(Gpu { window, engine, ui });
        Ok(())
    }

    fn resize(&mut self) -> Result<()> {
        let (Some(session), Some(gpu)) = (self.session.as_mut(), self.gpu.as_mut()) else {
            return Ok(());
        };
        let size = gpu.window.inner_size();
        if let Some((w, h)) = session.resize(
            (size.width, size.height),
            gpu.window.scale_factor(),
            &mut gpu.engine,
        )? {
            gpu.ui.update_display_size(w, h);
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if matches!(
            event,
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. }
        ) {
            if let Err(err) = self.resize() {
                log::error!("resize failed: {err}");
            }
            return;
        }

        let (Some(session), Some(gpu)) = (self.session.as_mut(), self.gpu.as_mut()) else {
            return;
        };

        let ui_captured = gpu.ui.handle_input(&gpu.window, window_id, &event);

        match &event {
            WindowEvent::CloseRequested => {
                session.stop_token().stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event: key, .. } if !ui_captured => {
                if let Err(err) =
                    session.handle_key(&key.logical_key, key.state, key.repeat, &mut gpu.engine)
                {
                    log::error!("snapshot failed: {err}");
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Err(err) = session.cursor_moved(position.x as f32, position.y as f32) {
                    log::error!("{err}");
                }
                if let Some(camera) = session.scene.camera_manager_mut() {
                    camera.process_window_event(&event);
                }
            }
            WindowEvent::MouseInput { .. } | WindowEvent::MouseWheel { .. } if !ui_captured => {
                if let Some(camera) = session.scene.camera_manager_mut() {
                    camera.process_window_event(&event);
                }
            }
            WindowEvent::Focused(_) => {
                if let Some(camera) = session.scene.camera_manager_mut() {
                    camera.process_window_event(&event);
                }
            }
            WindowEvent::RedrawRequested => {
                let mut host = WindowHost {
                    window: &gpu.window,
                    engine: &mut gpu.engine,
                    ui: &mut gpu.ui,
                    stats: &mut self.stats,
                };
                if let Err(err) = session.tick(&mut host) {
                    log::error!("frame failed: {err}");
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let (Some(session), Some(gpu)) = (self.session.as_mut(), self.gpu.as_ref()) else {
            return;
        };
        if gpu.ui.wants_input() {
            return;
        }
        if let Some(camera) = session.scene.camera_manager_mut() {
            camera.process_device_event(&event);
        }
    }
}
