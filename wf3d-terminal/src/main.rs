/// WF3D Terminal - Perspective wireframe viewer
///
/// Usage: wf3d-terminal [path/to/model.stl]
///
/// Without a path a built-in cube is shown.
/// Controls:
///   - W/S: Move the camera forward/back
///   - A/D: Move the camera left/right
///   - Left/Right: Turn the camera
///   - Q/ESC: Quit

use log::info;
use std::env;
use std::f64::consts::FRAC_PI_4;
use std::io;
use wf3d_core::{stl, Mesh, ViewerConfig};
use wf3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let mesh = match env::args().nth(1) {
        Some(path) => {
            println!("Loading STL file: {}", path);
            let mesh = stl::load_mesh(&path, true)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            info!("loaded {} triangles from {}", mesh.len(), path);
            mesh
        }
        None => Mesh::cube().rotated(FRAC_PI_4, FRAC_PI_4, FRAC_PI_4),
    };

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh, ViewerConfig::default())?;
    app.run()?;

    println!("Thank you for using WF3D!");
    Ok(())
}
