//! Stage builder and runner.
//!
//! The stage plays the part of the page: it owns the window, the frame
//! clock, the pointer tracker, and the scheduler, and wires each
//! configured effect's per-frame work into the redraw loop. Use method
//! chaining to configure, then call `.run()` to start.
//!
//! A component that fails to initialize is logged and left inert; the
//! stage keeps running whatever else it has.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::color;
use crate::error::StageError;
use crate::field::{FieldConfig, ParticleField};
use crate::gpu::{FrameDraw, GpuState};
use crate::plasma::{PlasmaBackground, PlasmaConfig};
use crate::pointer::PointerTracker;
use crate::scheduler::{FrameInput, FrameScheduler, FrameTick};
use crate::spark::{ClickSpark, SparkConfig};
use crate::time::FrameClock;
use crate::typewriter::{Typewriter, TypewriterConfig};

/// Builder for a window full of effects.
pub struct Stage {
    title: String,
    field: Option<FieldConfig>,
    plasma: Option<PlasmaConfig>,
    sparks: Option<SparkConfig>,
    typewriter: Option<(Vec<String>, TypewriterConfig)>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self {
            title: "sitefx".to_string(),
            field: None,
            plasma: None,
            sparks: None,
            typewriter: None,
        }
    }

    /// Set the window title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Add a pointer-reactive particle field.
    pub fn with_particle_field(mut self, config: FieldConfig) -> Self {
        self.field = Some(config);
        self
    }

    /// Add a plasma background.
    pub fn with_plasma(mut self, config: PlasmaConfig) -> Self {
        self.plasma = Some(config);
        self
    }

    /// Add click-spark cursor feedback.
    pub fn with_click_spark(mut self, config: SparkConfig) -> Self {
        self.sparks = Some(config);
        self
    }

    /// Rotate the given words through the window title.
    pub fn with_typewriter(mut self, words: Vec<String>, config: TypewriterConfig) -> Self {
        self.typewriter = Some((words, config));
        self
    }

    /// Run the stage. Blocks until the window is closed.
    pub fn run(self) -> Result<(), StageError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    options: Stage,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    clock: FrameClock,
    scheduler: FrameScheduler,
    pointer: PointerTracker,
    field: Option<Rc<RefCell<ParticleField>>>,
    plasma: Option<Rc<RefCell<PlasmaBackground>>>,
    sparks: Option<Rc<RefCell<ClickSpark>>>,
    spark_color: Vec3,
}

impl App {
    fn new(options: Stage) -> Self {
        Self {
            options,
            window: None,
            gpu: None,
            clock: FrameClock::new(),
            scheduler: FrameScheduler::new(),
            pointer: PointerTracker::new(1, 1),
            field: None,
            plasma: None,
            sparks: None,
            spark_color: Vec3::ONE,
        }
    }

    fn viewport(&self) -> Vec2 {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                Vec2::new(size.width as f32, size.height as f32)
            }
            None => Vec2::new(1.0, 1.0),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.options.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("{}", StageError::from(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let size = window.inner_size();
        self.pointer.set_viewport(size.width, size.height);
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;

        // Each component registers its own frame callback; a failed
        // component simply never registers and stays inert.
        if let Some(config) = self.options.field.take() {
            let field = Rc::new(RefCell::new(ParticleField::new(
                config,
                aspect,
                &mut rand::thread_rng(),
            )));
            let handle = field.clone();
            self.scheduler
                .register(move |tick, input| handle.borrow_mut().update(tick, input));
            self.field = Some(field);
        }

        let mut plasma_uniform_size = 0;
        if let Some(config) = self.options.plasma.take() {
            match PlasmaBackground::new(config) {
                Ok(mut plasma) => {
                    plasma.resize(size.width, size.height);
                    plasma_uniform_size = PlasmaBackground::uniform_table().byte_size();
                    let plasma = Rc::new(RefCell::new(plasma));
                    let handle = plasma.clone();
                    self.scheduler
                        .register(move |tick, input| handle.borrow_mut().update(tick, input));
                    self.plasma = Some(plasma);
                }
                Err(e) => {
                    log::error!("Plasma background disabled: {}", e);
                }
            }
        }

        if let Some(config) = self.options.sparks.take() {
            self.spark_color = color::hex_to_rgb(&config.color);
            let sparks = Rc::new(RefCell::new(ClickSpark::new(config)));
            let handle = sparks.clone();
            self.scheduler
                .register(move |tick, _| handle.borrow_mut().update(tick.elapsed));
            self.sparks = Some(sparks);
        }

        if let Some((words, config)) = self.options.typewriter.take() {
            let typewriter = Rc::new(RefCell::new(Typewriter::new(words, config)));
            let title = self.options.title.clone();
            let title_window = window.clone();
            self.scheduler.register(move |tick, _| {
                let mut tw = typewriter.borrow_mut();
                if tw.tick(tick.elapsed) {
                    title_window.set_title(&format!("{} | {}", title, tw.text()));
                }
            });
        }

        let particle_capacity = self
            .field
            .as_ref()
            .map(|f| f.borrow().particle_count() as u32)
            .unwrap_or(0);

        match pollster::block_on(GpuState::new(
            window,
            particle_capacity,
            256,
            plasma_uniform_size,
        )) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                // Rendering capability is gone; the stage stays up but inert.
                log::error!("GPU initialization failed, effects disabled: {}", e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.pointer
                    .set_viewport(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                if let Some(plasma) = &self.plasma {
                    plasma
                        .borrow_mut()
                        .resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                self.pointer.handle_event(&event, self.clock.elapsed());
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(sparks) = &self.sparks {
                    let position = self.pointer.snapshot().position;
                    sparks
                        .borrow_mut()
                        .spawn_burst(position, self.clock.elapsed());
                }
            }
            WindowEvent::RedrawRequested => {
                let (elapsed, delta) = self.clock.update();
                let tick = FrameTick {
                    elapsed,
                    delta,
                    frame: self.clock.frame(),
                };
                let input = FrameInput {
                    pointer: self.pointer.snapshot(),
                    viewport: self.viewport(),
                };
                self.scheduler.run_frame(tick, &input);

                if let Some(gpu) = &mut self.gpu {
                    let field_ref = self.field.as_ref().map(|f| f.borrow());
                    let plasma_ref = self.plasma.as_ref().map(|p| p.borrow());
                    let spark_segments = self
                        .sparks
                        .as_ref()
                        .map(|s| s.borrow().segments(elapsed))
                        .unwrap_or_default();

                    let draw = FrameDraw {
                        time: elapsed,
                        particles: field_ref.as_ref().map(|f| f.instances()),
                        plasma_uniforms: plasma_ref.as_ref().map(|p| p.uniform_bytes()),
                        spark_segments: &spark_segments,
                        spark_color: self.spark_color,
                    };

                    match gpu.render(&draw) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let size = winit::dpi::PhysicalSize {
                                width: gpu.config.width,
                                height: gpu.config.height,
                            };
                            gpu.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
