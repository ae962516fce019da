/// Application context handed to the render loop and to every panel callback
use nalgebra::Point3;

use crate::command::{parse_command, CommandError};
use crate::controls::OrbitControls;
use crate::descriptor::{ParamError, ShapeKind};
use crate::panel::{ControlDescription, Panel};
use crate::projection::Camera;
use crate::scene::Scene;
use crate::stats::FrameStats;

/// Everything one viewer owns for as long as it runs
#[derive(Debug)]
pub struct AppContext {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub panel: Panel,
    pub stats: FrameStats,
}

impl AppContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::new(width, height),
            controls: OrbitControls::new(),
            panel: Panel::new(),
            stats: FrameStats::new(),
        }
    }

    pub fn set(&mut self, path: &str, value: f32) -> Result<f32, ParamError> {
        self.panel.apply(&mut self.scene, path, value)
    }

    pub fn nudge(&mut self, path: &str, steps: i32) -> Result<f32, ParamError> {
        self.panel.nudge(&mut self.scene, path, steps)
    }

    pub fn toggle(&mut self, path: &str) -> Result<bool, ParamError> {
        self.panel.toggle(&mut self.scene, path)
    }

    /// Parse and execute a prompt line, returning a status message
    pub fn run_command(&mut self, line: &str) -> Result<String, CommandError> {
        parse_command(line)?.execute(&self.panel, &mut self.scene)
    }

    pub fn describe_panel(&self) -> Vec<ControlDescription> {
        self.panel.describe(&self.scene)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Orbit around a shape instead of the origin, keeping the viewing offset
    pub fn focus(&mut self, kind: ShapeKind) {
        let offset = self.camera.position - self.camera.target;
        self.camera.target = Point3::from(self.scene.shape(kind).transform.position);
        self.camera.position = self.camera.target + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_and_setters_share_the_panel() {
        let mut ctx = AppContext::new(640, 480);
        assert_eq!(ctx.set("sphere.widthSegments", 16.0), Ok(16.0));
        assert_eq!(ctx.run_command("set sphere.heightSegments 40").unwrap(), "sphere.heightSegments = 16");

        let mesh = ctx.scene.shape(ShapeKind::Sphere).geometry().mesh();
        assert_eq!(mesh.triangles.len(), 16 * 16 * 2 - 16 - 16);
        assert_eq!(ctx.scene.ledger().live_count(), 3);
    }

    #[test]
    fn test_focus_moves_target_and_keeps_offset() {
        let mut ctx = AppContext::new(640, 480);
        ctx.focus(ShapeKind::Cube);
        assert_eq!(ctx.camera.target, Point3::new(5.0, 0.0, 0.0));
        assert_eq!(ctx.camera.position, Point3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut ctx = AppContext::new(640, 480);
        ctx.resize(1000, 500);
        assert!((ctx.camera.aspect - 2.0).abs() < 1e-6);
    }
}
