/// Shapes terminal viewer
///
/// Draws the cube, sphere and icosahedron as ASCII wireframes with a live
/// parameter panel beside them.
/// Controls:
///   - WASD / mouse drag: Orbit the camera
///   - +/- / scroll: Zoom
///   - Up/Down, Tab: Select a control or jump to the next shape folder
///   - Left/Right (Shift for x10): Adjust the selected control
///   - `:`: Type a command such as `set sphere.radius 3`
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use shapes_core::ShapeKind;
use shapes_terminal::{TerminalApp, TerminalConfig};

#[derive(Debug, Parser)]
#[command(name = "shapes-terminal", about = "ASCII viewer for the shapes scene")]
struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Orbit around this shape instead of the origin (cube, sphere, icosahedron)
    #[arg(long)]
    focus: Option<ShapeKind>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut app = TerminalApp::new(TerminalConfig {
        fps: args.fps,
        focus: args.focus,
    })
    .context("failed to query the terminal size")?;
    app.run().context("terminal viewer failed")?;

    Ok(())
}
