//! The Fullstack Invasion: fly a UFO over a farm, beam up the tech cows and
//! visit the landmarks to read about the developer behind them.

mod abduction;
mod beam;
mod collectible;
mod config;
mod effects;
mod events;
mod hud;
mod landmarks;
mod session;
mod simulation;
mod state;
mod tracker;
mod vehicle;

use anyhow::Result;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use state::GameState;

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = config::GameConfig::load();
            let size = winit::dpi::LogicalSize::new(config.window_width, config.window_height);
            let mut window_attrs = Window::default_attributes()
                .with_title("Fullstack Invasion")
                .with_inner_size(size);
            if config.fullscreen {
                window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match GameState::new(window.clone(), &config) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                  THE FULLSTACK INVASION                  ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                               ║");
    println!("║    WASD / Arrows - Fly         │  Space / Click - Beam   ║");
    println!("║    E - Visit landmark          │  M - Map                ║");
    println!("║    P - Map project (Projects)  │  R - Restart            ║");
    println!("║    Escape - Close panel / Quit                           ║");
    println!("║  TOUCH: left half = stick, right half = beam             ║");
    println!("╚══════════════════════════════════════════════════════════╝");

    log::info!("Starting Fullstack Invasion");

    let event_loop = EventLoop::new()?;
    // Poll so a redraw (and a simulation tick) runs every frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
