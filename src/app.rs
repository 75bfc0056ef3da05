use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    config::SceneConfig,
    gfx::{
        input::{KeyAction, SceneKey},
        rendering::RenderEngine,
        scene::Scene,
        uniforms::{ShaderSet, UniformTable},
    },
};

pub struct FathomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    sinks: ShaderSet<UniformTable>,
    close_requested: bool,
}

impl FathomApp {
    /// Loads the scene described by `config` and prepares the event loop.
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        let scene = Scene::load(&config).context("Failed to load scene")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                sinks: ShaderSet::default(),
                close_requested: false,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Failed to run event loop")
    }
}

impl AppState {
    fn request_close(&mut self, event_loop: &ActiveEventLoop) {
        self.close_requested = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                self.request_close(event_loop);
                return;
            }
        };
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height));
        let mut renderer = match renderer {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("{err:#}");
                self.request_close(event_loop);
                return;
            }
        };

        renderer.upload_scene(&self.scene);
        self.scene.resize(width, height);
        self.render_engine = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.render_engine.is_none() {
            return;
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let Some((key, action)) = SceneKey::from_event(&event) else {
                    return;
                };
                if key == SceneKey::Escape && action == KeyAction::Press {
                    self.request_close(event_loop);
                    return;
                }
                if !self.scene.handle_key(key, action) {
                    log::trace!("No binding for {key:?} ({action:?})");
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.scene
                    .handle_pointer_button(state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.scene
                    .handle_pointer_move(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                self.request_close(event_loop);
            }
            WindowEvent::RedrawRequested => {
                self.scene.update(&mut self.sinks);
                let plan = self.scene.frame_plan();

                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };
                if let Err(err) = render_engine.render_frame(&plan, &self.sinks) {
                    log::error!("{err:#}");
                    self.request_close(event_loop);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.close_requested {
            return;
        }
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
