/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Screen column, screen row, NDC depth
pub type ScreenPoint = (f32, f32, f32);

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 2.0),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 75.0_f32.to_radians(),
            aspect: aspect_ratio(width, height),
            near: 0.1,
            far: 1000.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Follow a viewport resize
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Frame the same height the perspective view shows at the target
                let distance = (self.position - self.target).norm();
                let height = 2.0 * distance * (self.fov / 2.0).tan();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a point through a model-view-projection matrix into screen space.
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards and depth in NDC, or
    /// `None` when the point lies behind the camera.
    pub fn project_to_screen(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        clip_to_screen(&(mvp * point.to_homogeneous()), width, height)
    }

    /// Project a line segment, cutting it at the near plane first.
    ///
    /// A segment with one end behind the camera keeps its visible part; `None`
    /// only when the whole segment is behind the near plane.
    pub fn project_segment(
        mvp: &Matrix4<f32>,
        start: &Point3<f32>,
        end: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(ScreenPoint, ScreenPoint)> {
        let mut a = mvp * start.to_homogeneous();
        let mut b = mvp * end.to_homogeneous();

        // Signed distance to the near plane, z = -w in clip space
        let (da, db) = (a.z + a.w, b.z + b.w);
        if da < 0.0 && db < 0.0 {
            return None;
        }
        if da < 0.0 {
            a = a.lerp(&b, da / (da - db));
        } else if db < 0.0 {
            b = b.lerp(&a, db / (db - da));
        }

        Some((
            clip_to_screen(&a, width, height)?,
            clip_to_screen(&b, width, height)?,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> Option<ScreenPoint> {
    // Prevent division by near-zero depth values
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
    Some((screen_x, screen_y, ndc.z))
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_zero_sized_viewport() {
        let mut camera = Camera::new(0, 0);
        assert_eq!(camera.aspect, 1.0);
        camera.set_viewport(300, 100);
        assert!((camera.aspect - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(80, 40);
            camera.mode = mode;
            let (x, y, depth) =
                Camera::project_to_screen(&camera.view_projection(), &camera.target, 80, 40)
                    .unwrap();
            assert!((x - 40.0).abs() < 1e-3);
            assert!((y - 20.0).abs() < 1e-3);
            assert!((-1.0..=1.0).contains(&depth));
        }
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(Camera::project_to_screen(&camera.view_projection(), &behind, 80, 40).is_none());
    }

    #[test]
    fn test_segment_through_camera_plane_is_cut_at_near() {
        let camera = Camera::new(80, 40);
        let mvp = camera.view_projection();
        let far = Point3::new(0.5, -0.5, -5.0);
        let behind = Point3::new(0.5, -0.5, 10.0);
        assert!(Camera::project_to_screen(&mvp, &behind, 80, 40).is_none());

        let (a, b) = Camera::project_segment(&mvp, &far, &behind, 80, 40).unwrap();
        let expected = Camera::project_to_screen(&mvp, &far, 80, 40).unwrap();
        assert_eq!(a, expected);
        // The cut end sits on the near plane
        assert!((b.2 + 1.0).abs() < 1e-3);
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_segment_fully_behind_is_dropped() {
        let camera = Camera::new(80, 40);
        let mvp = camera.view_projection();
        let a = Point3::new(0.0, 0.0, 3.0);
        let b = Point3::new(1.0, 0.0, 8.0);
        assert!(Camera::project_segment(&mvp, &a, &b, 80, 40).is_none());
    }
}
