use std::collections::HashSet;
use std::time::Instant;

use log::*;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

use crate::config::EngineConfig;
use crate::core::{HeadlessRenderer, RenderTarget};
use crate::ecs::EntityManager;
use crate::game::{FrameOutcome, Game};
use crate::scene;

pub struct Engine {
    event_loop: EventLoop<()>,
    window: Window,
    config: EngineConfig,
}

struct GameState {
    game: Game,
    renderer: HeadlessRenderer,
    last_update_time: Instant,
    pressed_keys: HashSet<KeyCode>,
    frame_count: u32,
    fps_timer: Instant,
}

impl Engine {
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?;

        Ok(Self {
            event_loop,
            window,
            config,
        })
    }

    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            event_loop,
            window,
            config,
        } = self;

        let size = window.inner_size();
        let renderer = HeadlessRenderer::new(size.width, size.height);

        let mut entities = EntityManager::new();
        scene::load_demo_scene(&mut entities);
        let game = Game::new(&config, entities, renderer.aspect_ratio())?;

        let now = Instant::now();
        let mut state = GameState {
            game,
            renderer,
            last_update_time: now,
            pressed_keys: HashSet::new(),
            frame_count: 0,
            fps_timer: now,
        };

        event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!("Close requested");
                    target.exit();
                }
                Event::WindowEvent {
                    event:
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key_code),
                                    state: key_state,
                                    ..
                                },
                            ..
                        },
                    ..
                } => match key_state {
                    ElementState::Pressed => {
                        if key_code == KeyCode::Escape {
                            target.exit();
                        }
                        state.pressed_keys.insert(key_code);
                    }
                    ElementState::Released => {
                        state.pressed_keys.remove(&key_code);
                    }
                },
                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    state.renderer.resize(size.width, size.height);
                }
                Event::AboutToWait => {
                    window.request_redraw();
                }
                Event::WindowEvent {
                    event: WindowEvent::RedrawRequested,
                    ..
                } => {
                    let now = Instant::now();
                    let delta_time = now.duration_since(state.last_update_time).as_secs_f32();
                    state.last_update_time = now;

                    match state.game.frame(&mut state.renderer, delta_time, &state.pressed_keys) {
                        Ok(FrameOutcome::Presented { .. }) => state.frame_count += 1,
                        Ok(FrameOutcome::Skipped) => {}
                        Err(e) => {
                            error!("Frame failed: {e:#}");
                            target.exit();
                        }
                    }

                    let elapsed = state.fps_timer.elapsed().as_secs_f32();
                    if elapsed >= 1.0 {
                        let fps = state.frame_count as f32 / elapsed;
                        window.set_title(&format!("{} - {fps:.0} FPS", config.window.title));
                        state.frame_count = 0;
                        state.fps_timer = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
