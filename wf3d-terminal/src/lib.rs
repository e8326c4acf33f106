/// Terminal front end for the wireframe pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, error, info};
use std::io::{self, stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use wf3d_core::config::{CAMERA_STEP, CAMERA_TURN_DEGREES};
use wf3d_core::{render_frame, CameraMove, ConfigError, Mesh, Projector, SharedCamera, Spin, ViewerConfig};

pub mod renderer;

pub use renderer::WireframeCanvas;

const TARGET_FPS: u64 = 20;
const INPUT_POLL: Duration = Duration::from_millis(50);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Camera(CameraMove),
}

/// Key bindings: `w`/`s` move forward and back, `a`/`d` sideways, the arrow
/// keys turn, `q` or Esc quits.
pub fn key_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('w') => Some(Action::Camera(CameraMove::Forward)),
        KeyCode::Char('s') => Some(Action::Camera(CameraMove::Back)),
        KeyCode::Char('a') => Some(Action::Camera(CameraMove::Left)),
        KeyCode::Char('d') => Some(Action::Camera(CameraMove::Right)),
        KeyCode::Left => Some(Action::Camera(CameraMove::TurnLeft)),
        KeyCode::Right => Some(Action::Camera(CameraMove::TurnRight)),
        _ => None,
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    mesh: Mesh,
    spin: Spin,
    projector: Projector,
    camera: SharedCamera,
    canvas: WireframeCanvas,
    running: Arc<AtomicBool>,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Size the raster to the terminal and validate `config` against it.
    pub fn new(mesh: Mesh, config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let canvas = WireframeCanvas::new(width as usize, height as usize);
        let config = config.with_resolution(canvas.raster_size());

        let invalid = |e: ConfigError| io::Error::new(io::ErrorKind::InvalidInput, e);
        let projector = config.projector().map_err(invalid)?;
        let spin = config.spin().map_err(invalid)?;
        debug!("terminal {width}x{height}, raster {}px", projector.resolution());

        Ok(Self {
            mesh,
            spin,
            projector,
            camera: SharedCamera::new(config.camera),
            canvas,
            running: Arc::new(AtomicBool::new(true)),
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let input = spawn_input(
            self.camera.clone(),
            Arc::clone(&self.running),
            poll_terminal_event,
        );
        let result = self.main_loop();

        self.running.store(false, Ordering::Relaxed);
        let input_result = match input.join() {
            Ok(r) => r,
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "input thread panicked")),
        };

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        if let Err(e) = &input_result {
            error!("input handling failed: {e}");
        }
        result.and(input_result)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / TARGET_FPS);

        while self.running.load(Ordering::Relaxed) {
            let frame_start = Instant::now();

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let model = self.spin.matrix_at(self.started.elapsed());
        let camera = self.camera.snapshot();
        let polylines = render_frame(&self.mesh, &model, &camera, &self.projector)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.canvas.clear();
        self.canvas.stroke(&polylines, self.projector.resolution());

        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "WF3D | {} triangles, {} visible | FPS: {:.1} | W/S/A/D=Move Left/Right=Turn Q=Quit",
                self.mesh.len(),
                polylines.len(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Read key presses on a separate thread and push camera moves through the
/// shared camera until `running` is cleared.
///
/// `running` is cleared whenever the thread stops, including on an input
/// error, so the render loop never outlives its input.
fn spawn_input<F>(
    camera: SharedCamera,
    running: Arc<AtomicBool>,
    next_event: F,
) -> JoinHandle<io::Result<()>>
where
    F: FnMut() -> io::Result<Option<Event>> + Send + 'static,
{
    thread::spawn(move || {
        let result = read_keys(&camera, &running, next_event);
        running.store(false, Ordering::Relaxed);
        result
    })
}

fn read_keys<F>(camera: &SharedCamera, running: &AtomicBool, mut next_event: F) -> io::Result<()>
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    let turn = CAMERA_TURN_DEGREES.to_radians();
    while running.load(Ordering::Relaxed) {
        let Some(Event::Key(KeyEvent { code, kind, .. })) = next_event()? else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match key_action(code) {
            Some(Action::Quit) => {
                info!("quit requested");
                running.store(false, Ordering::Relaxed);
            }
            Some(Action::Camera(step)) => camera.apply(&step.matrix(CAMERA_STEP, turn)),
            None => {}
        }
    }
    Ok(())
}

/// Wait up to [`INPUT_POLL`] for a terminal event.
fn poll_terminal_event() -> io::Result<Option<Event>> {
    if event::poll(INPUT_POLL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}
