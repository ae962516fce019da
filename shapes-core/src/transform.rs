/// Per-shape placement: position, Euler rotation and scale
use nalgebra::{Matrix4, Vector3};

/// Which vector of a transform a panel control edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformGroup {
    Rotation,
    Position,
    Scale,
}

impl TransformGroup {
    pub const ALL: [TransformGroup; 3] = [
        TransformGroup::Rotation,
        TransformGroup::Position,
        TransformGroup::Scale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformGroup::Rotation => "rotation",
            TransformGroup::Position => "position",
            TransformGroup::Scale => "scale",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransformGroup::Rotation => "Rotation",
            TransformGroup::Position => "Position",
            TransformGroup::Scale => "Scale",
        }
    }
}

/// Position, rotation (radians, applied X then Y then Z) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    pub fn group(&self, group: TransformGroup) -> &Vector3<f32> {
        match group {
            TransformGroup::Rotation => &self.rotation,
            TransformGroup::Position => &self.position,
            TransformGroup::Scale => &self.scale,
        }
    }

    pub fn group_mut(&mut self, group: TransformGroup) -> &mut Vector3<f32> {
        match group {
            TransformGroup::Rotation => &mut self.rotation,
            TransformGroup::Position => &mut self.position,
            TransformGroup::Scale => &mut self.scale,
        }
    }

    /// Rotation matrix for intrinsic X, Y, Z Euler angles
    pub fn rotation_matrix(rotation: &Vector3<f32>) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * Self::rotation_matrix(&self.rotation)
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_model_matrix() {
        let matrix = Transform::identity().model_matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_model_matrix_order() {
        let mut transform = Transform::at(5.0, 0.0, 0.0);
        transform.scale = Vector3::new(2.0, 1.0, 1.0);
        transform.rotation.z = FRAC_PI_2;

        // Scaled to x = 2, turned onto +y, then moved
        let p = transform.model_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(5.0, 2.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_group_access() {
        let mut transform = Transform::identity();
        transform.group_mut(TransformGroup::Position).y = -3.0;
        assert_eq!(transform.position.y, -3.0);
        assert_eq!(transform.group(TransformGroup::Scale).x, 1.0);
    }
}
