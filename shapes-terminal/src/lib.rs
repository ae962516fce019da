/// Terminal front end: ASCII wireframes plus a keyboard driven parameter panel
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use shapes_core::{AppContext, RenderLoop, ShapeKind};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod input;
pub mod renderer;

pub use input::InputState;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

const HELP: &str = "WASD/drag=orbit +/-=zoom P=projection Up/Down=select Left/Right=adjust Tab=folder :=command Q=quit";

#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub fps: u32,
    pub focus: Option<ShapeKind>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { fps: 30, focus: None }
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    ctx: AppContext,
    renderer: AsciiRenderer,
    render_loop: RenderLoop,
    input: InputState,
    frame_time: Duration,
    started: Instant,
}

impl TerminalApp {
    pub fn new(config: TerminalConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut ctx = AppContext::new(width as u32, height as u32 * CELL_ASPECT);
        let mut input = InputState::new();
        if let Some(kind) = config.focus {
            ctx.focus(kind);
            input.select_shape(&ctx, kind);
        }

        Ok(Self {
            ctx,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            render_loop: RenderLoop::new(),
            input,
            frame_time: Duration::from_secs(1) / config.fps.max(1),
            started: Instant::now(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        log::info!("stopped after {} frames", self.render_loop.frames());
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let stop = self.render_loop.stop_signal();

        while self.render_loop.is_running() {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) => self.input.handle_key(key, &mut self.ctx, &stop),
                    Event::Mouse(mouse) => self.input.handle_mouse(mouse, &mut self.ctx),
                    Event::Resize(width, height) => self.resize(width, height)?,
                    _ => {}
                }
            }
            if !self.render_loop.is_running() {
                break;
            }

            let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
            self.render_loop
                .tick(&mut self.ctx, &mut self.renderer, now_ms)?;
            self.draw_overlay()?;

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }

        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        log::debug!("terminal resized to {width}x{height}");
        self.renderer.resize(width as usize, height as usize);
        self.ctx.resize(width as u32, height as u32 * CELL_ASPECT);
        execute!(stdout(), Clear(ClearType::All))
    }

    fn draw_overlay(&self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let fit = |line: &str| line.chars().take(width as usize).collect::<String>();
        let mut stdout = stdout();

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(fit(&format!(
                "Shapes | FPS: {:.1} | {HELP}",
                self.ctx.stats.fps()
            ))),
            ResetColor
        )?;

        for (row, line) in self.input.panel_lines(&self.ctx).iter().enumerate() {
            let row = row as u16 + 1;
            if row + 1 >= height {
                break;
            }
            queue!(stdout, cursor::MoveTo(0, row), Print(fit(line)))?;
        }

        let footer = match self.input.prompt() {
            Some(line) => format!(":{line}"),
            None => self.input.status().to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::Cyan),
            Print(fit(&footer)),
            ResetColor
        )?;

        stdout.flush()
    }
}
