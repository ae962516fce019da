/// Shapes Core Library - descriptors, geometry and scene state for the viewers
///
/// Front ends (terminal, browser) own an [`AppContext`] and drive it through a
/// [`RenderLoop`] with their own [`Renderer`].

pub mod app;
pub mod command;
pub mod controls;
pub mod descriptor;
pub mod geometry;
pub mod panel;
pub mod projection;
pub mod render_loop;
pub mod scene;
pub mod stats;
pub mod transform;

// Re-export commonly used types
pub use app::AppContext;
pub use command::{parse_command, Command, CommandError};
pub use controls::OrbitControls;
pub use descriptor::{ParamError, ShapeKind, ShapeParams};
pub use geometry::{Edge, Mesh, Triangle};
pub use panel::{Binding, Control, ControlDescription, ControlValue, Panel};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use render_loop::{RenderLoop, Renderer, StopSignal};
pub use scene::{AxesHelper, Geometry, GeometryId, GeometryLedger, Material, Scene, Shape};
pub use stats::FrameStats;
pub use transform::{Transform, TransformGroup};
