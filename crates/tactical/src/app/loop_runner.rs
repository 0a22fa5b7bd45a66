use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::{Error as PixelsError, Pixels, SurfaceTexture, TextureError};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowBuilder};

use super::input::InputCollector;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator, MetricsHandle};
use crate::config::{ConfigError, DisplayConfig};
use crate::display::Display;
use crate::rendering::Surface;

pub const SLOW_FRAME_ENV_VAR: &str = "TACVIEW_SLOW_FRAME_MS";

const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const MAX_TICKS_PER_FRAME: u32 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Game logic driven by the window loop. The display is lent to each call.
pub trait TacticalGame {
    fn start(&mut self, _display: &mut Display) {}

    /// One fixed-rate simulation step.
    fn update(&mut self, display: &mut Display, dt_seconds: f32);

    /// Key presses the loop does not handle itself (arrows scroll, Escape quits).
    fn key_pressed(&mut self, _display: &mut Display, _key: KeyCode) {}

    fn shutdown(&mut self, _display: &mut Display) {}
}

struct Presenter {
    pixels: Pixels<'static>,
}

impl Presenter {
    fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, PixelsError> {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(width, height, texture)?;
        Ok(Self { pixels })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    fn window_to_buffer(&self, x: f64, y: f64) -> (i32, i32) {
        let (px, py) = self
            .pixels
            .window_pos_to_pixel((x as f32, y as f32))
            .unwrap_or_else(|outside| self.pixels.clamp_pixel_pos(outside));
        (px as i32, py as i32)
    }

    fn present(&mut self, surface: &Surface) -> Result<(), PixelsError> {
        let frame = self.pixels.frame_mut();
        let source = surface.pixels();
        if frame.len() == source.len() {
            frame.copy_from_slice(source);
        }
        self.pixels.render()
    }
}

pub fn run_app(
    config: DisplayConfig,
    display: Display,
    game: Box<dyn TacticalGame>,
) -> Result<(), AppError> {
    run_app_with_metrics(config, display, game, MetricsHandle::default())
}

pub fn run_app_with_metrics(
    config: DisplayConfig,
    mut display: Display,
    mut game: Box<dyn TacticalGame>,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    config.validate()?;
    config.apply(&mut display);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut presenter = Presenter::new(Arc::clone(&window), config.window_width, config.window_height)
        .map_err(AppError::CreateRenderer)?;
    let mut surface = Surface::new(config.window_width, config.window_height);

    event_loop.set_control_flow(ControlFlow::Poll);

    let fixed_dt = Duration::from_secs_f64(1.0 / config.target_fps.max(1) as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let metrics_interval = Duration::from_secs_f32(config.metrics_interval_secs);
    let slow_frame_delay = resolve_slow_frame_delay();
    let scroll_step = config.scroll_step_leptons;
    info!(
        target_fps = config.target_fps,
        metrics_interval_ms = metrics_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        scroll_step,
        "loop_config"
    );

    game.start(&mut display);
    let mut input = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = MetricsAccumulator::new(metrics_interval, Instant::now());
    let mut forced = true;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(size) => {
                    if let Err(error) = presenter.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let (x, y) = presenter.window_to_buffer(position.x, position.y);
                    input.set_cursor(x, y);
                }
                WindowEvent::CursorLeft { .. } => input.clear_cursor(),
                WindowEvent::MouseInput { state, button, .. } => {
                    input.handle_mouse_input(button, state);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.handle_key(event.physical_key, event.state, event.repeat);
                    if input.quit_requested() {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if slow_frame_delay > Duration::ZERO {
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    accumulator = accumulator.saturating_add(raw_frame_dt.min(MAX_FRAME_DELTA));

                    for key in input.take_pressed_keys() {
                        game.key_pressed(&mut display, key);
                    }
                    let plan = plan_sim_steps(accumulator, fixed_dt, MAX_TICKS_PER_FRAME);
                    for _ in 0..plan.ticks_to_run {
                        game.update(&mut display, fixed_dt_seconds);
                        metrics.record_tick();
                    }
                    accumulator = plan.remaining_accumulator;
                    if plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                            "sim_clamp_triggered"
                        );
                    }

                    dispatch_input(&mut display, &mut input, scroll_step);

                    let since_present = Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep = compute_cap_sleep(since_present, fixed_dt);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let stats = display.draw_it(&mut surface, forced);
                    forced = false;
                    if let Err(error) = presenter.present(&surface) {
                        warn!(error = %error, "present_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();
                    metrics.record_frame(raw_frame_dt, stats.cells_redrawn, stats.full_redraw);

                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        metrics_handle.publish(snapshot);
                        log_loop_metrics(snapshot, &display);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                game.shutdown(&mut display);
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Hands one frame of collected input to the display: mouse flags go to the
/// tactical handler while the cursor is over the map, arrow keys scroll.
pub(crate) fn dispatch_input(display: &mut Display, input: &mut InputCollector, scroll_step: i32) {
    let flags = input.take_key_flags();
    if let Some((x, y)) = input.cursor() {
        display.set_mouse_position(x, y);
        if display.tactical_button().contains(x, y) {
            display.tactical_action(flags);
        }
    }
    display.tick();

    if let Some(facing) = input.scroll_facing() {
        let mut distance = scroll_step;
        display.scroll_map(facing, &mut distance, true);
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(mut accumulator: Duration, fixed_dt: Duration, max_ticks: u32) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks {
        accumulator -= fixed_dt;
        ticks_to_run += 1;
    }
    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn compute_cap_sleep(elapsed: Duration, target: Duration) -> Duration {
    target.saturating_sub(elapsed)
}

fn resolve_slow_frame_delay() -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => parse_slow_frame_ms(&value),
        Err(env::VarError::NotPresent) => Duration::ZERO,
        Err(error) => {
            warn!(env_var = SLOW_FRAME_ENV_VAR, error = %error, "slow_frame_env_unreadable");
            Duration::ZERO
        }
    }
}

fn parse_slow_frame_ms(value: &str) -> Duration {
    match value.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(env_var = SLOW_FRAME_ENV_VAR, value, "slow_frame_env_invalid");
            Duration::ZERO
        }
    }
}

/// Logs one metrics window. Returns the selection size it reported.
fn log_loop_metrics(snapshot: LoopMetricsSnapshot, display: &Display) -> usize {
    let selected = display.selected().len();
    info!(
        fps = snapshot.fps,
        tps = snapshot.tps,
        frame_time_ms = snapshot.frame_time_ms,
        cells_per_frame = snapshot.cells_per_frame,
        full_redraws = snapshot.full_redraws,
        selected,
        "loop_metrics"
    );
    selected
}

#[cfg(test)]
mod tests {
    use winit::event::{ElementState, MouseButton};
    use winit::keyboard::PhysicalKey;

    use super::*;
    use crate::interaction::RubberBand;
    use crate::coord::Cell;
    use crate::house::HouseId;
    use crate::testkit::{display_with_view, spawn, TestUnit};

    #[test]
    fn step_plan_runs_whole_ticks_and_keeps_the_rest() {
        let plan = plan_sim_steps(Duration::from_millis(35), Duration::from_millis(10), 5);
        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(5));
        assert_eq!(plan.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn step_plan_drops_backlog_past_the_tick_limit() {
        let plan = plan_sim_steps(Duration::from_millis(100), Duration::from_millis(10), 5);
        assert_eq!(plan.ticks_to_run, 5);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(50));
    }

    #[test]
    fn loop_metrics_report_the_selection_size() {
        let mut display = display_with_view();
        let tank = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(3, 3)));
        assert_eq!(log_loop_metrics(LoopMetricsSnapshot::default(), &display), 0);
        display.select_object(tank, false);
        assert_eq!(log_loop_metrics(LoopMetricsSnapshot::default(), &display), 1);
    }

    #[test]
    fn cap_sleep_fills_the_rest_of_the_frame() {
        let target = Duration::from_millis(16);
        assert_eq!(compute_cap_sleep(Duration::from_millis(10), target), Duration::from_millis(6));
        assert_eq!(compute_cap_sleep(Duration::from_millis(20), target), Duration::ZERO);
    }

    #[test]
    fn slow_frame_value_parses_or_falls_back() {
        assert_eq!(parse_slow_frame_ms(" 40 "), Duration::from_millis(40));
        assert_eq!(parse_slow_frame_ms("soon"), Duration::ZERO);
    }

    #[test]
    fn drag_over_the_map_becomes_a_band() {
        let mut display = display_with_view();
        let mut input = InputCollector::default();

        input.set_cursor(100, 100);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        dispatch_input(&mut display, &mut input, 256);
        assert!(display.interaction.band.is_tentative());

        input.set_cursor(140, 130);
        dispatch_input(&mut display, &mut input, 256);
        assert!(display.interaction.band.is_active());

        input.handle_mouse_input(MouseButton::Left, ElementState::Released);
        dispatch_input(&mut display, &mut input, 256);
        assert_eq!(display.interaction.band, RubberBand::Idle);
        assert_eq!(display.mouse_position(), (140, 130));
    }

    #[test]
    fn clicks_off_the_map_are_ignored() {
        let mut display = display_with_view();
        let mut input = InputCollector::default();
        input.set_cursor(600, 100);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        dispatch_input(&mut display, &mut input, 256);
        assert_eq!(display.interaction.band, RubberBand::Idle);
    }

    #[test]
    fn arrow_key_scrolls_the_camera() {
        let mut display = display_with_view();
        let start = display.viewport.desired_coord;
        let mut input = InputCollector::default();
        input.handle_key(PhysicalKey::Code(KeyCode::ArrowRight), ElementState::Pressed, false);
        dispatch_input(&mut display, &mut input, 256);
        assert_eq!(display.viewport.desired_coord.x(), start.x() + 256);
        assert_eq!(display.viewport.desired_coord.y(), start.y());
        assert!(display.redraw.is_pending());
    }
}
