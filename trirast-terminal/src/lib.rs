/// Interactive terminal frontend for the trirast pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::Duration;
use thiserror::Error;
use trirast_core::{Pipeline, PipelineError, RenderConfig};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Degrees added or removed per key press
pub const ANGLE_STEP: f32 = 10.0;

/// Upper bound on how long a frame waits for input
pub const POLL_TIMEOUT: Duration = Duration::from_millis(10);

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Rows kept free for the status line
const STATUS_ROWS: u16 = 1;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// What a key press asks the driver to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Rotate(f32),
    Quit,
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('a') => Some(Command::Rotate(ANGLE_STEP)),
            KeyCode::Char('d') => Some(Command::Rotate(-ANGLE_STEP)),
            _ => None,
        }
    }
}

/// Canvas size and aspect ratio that fill a terminal of `cols x rows` cells
pub fn canvas_for_terminal(cols: u16, rows: u16) -> (usize, usize, f32) {
    let width = cols.max(1) as usize;
    let height = rows.saturating_sub(STATUS_ROWS).max(1) as usize;
    let aspect = width as f32 / (height as f32 * CELL_ASPECT);
    (width, height, aspect)
}

/// First error among the frame loop and the two terminal restore steps
fn restore_order(
    result: Result<(), AppError>,
    raw: io::Result<()>,
    screen: io::Result<()>,
) -> Result<(), AppError> {
    result?;
    raw?;
    screen?;
    Ok(())
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    config: RenderConfig,
    pipeline: Pipeline,
    renderer: AsciiRenderer,
    angle: f32,
    running: bool,
    frame_count: u64,
}

impl TerminalApp {
    /// Build an app sized to the current terminal
    ///
    /// `config` supplies the camera and geometry; its canvas size and aspect
    /// are replaced by the terminal's.
    pub fn new(config: RenderConfig) -> Result<Self, AppError> {
        let (cols, rows) = terminal::size()?;
        Self::with_size(config, cols, rows)
    }

    pub fn with_size(config: RenderConfig, cols: u16, rows: u16) -> Result<Self, AppError> {
        let (width, height, aspect) = canvas_for_terminal(cols, rows);
        let config = RenderConfig {
            width,
            height,
            aspect,
            ..config
        };

        Ok(Self {
            pipeline: Pipeline::new(config.clone())?,
            renderer: AsciiRenderer::new(width, height),
            config,
            angle: 0.0,
            running: true,
            frame_count: 0,
        })
    }

    /// Current rotation in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup runs in full before any error is reported
        let raw = terminal::disable_raw_mode();
        let screen = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);

        restore_order(result, raw, screen)
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while self.running {
            self.render()?;

            log::debug!("frame count: {}", self.frame_count);
            self.frame_count += 1;

            if event::poll(POLL_TIMEOUT)? {
                self.handle_event(event::read()?)?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<(), AppError> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Some(command) = Command::from_key(code) {
                    self.apply(command);
                }
            }
            Event::Resize(cols, rows) => self.resize(cols, rows)?,
            _ => {}
        }
        Ok(())
    }

    /// Apply one command to the driver state
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::Rotate(delta) => {
                self.angle += delta;
                log::debug!("angle now {} degrees", self.angle);
            }
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), AppError> {
        let (width, height, aspect) = canvas_for_terminal(cols, rows);
        log::debug!("resizing canvas to {}x{}", width, height);

        self.config = RenderConfig {
            width,
            height,
            aspect,
            ..self.config.clone()
        };
        self.pipeline = Pipeline::new(self.config.clone())?;
        self.renderer = AsciiRenderer::new(width, height);

        execute!(stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn render(&mut self) -> Result<(), AppError> {
        let frame = self.pipeline.render(self.angle)?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, STATUS_ROWS))?;

        self.renderer.draw(frame, &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "trirast | frame {} | angle {:.0} | Controls: A/D=Rotate Q/Esc=Quit",
                self.frame_count, self.angle
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
