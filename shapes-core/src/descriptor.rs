//! Shape descriptors: the named numeric parameters a geometry is built from.
//!
//! Descriptor values are stored exactly as written. Segment counts and the
//! icosahedron detail level are floored when the mesh is built, so a
//! fractional value coming from a slider never changes the stored descriptor.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::Mesh;

/// The three shapes of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Cube,
    Sphere,
    Icosahedron,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Cube, ShapeKind::Sphere, ShapeKind::Icosahedron];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Icosahedron => "icosahedron",
        }
    }

    /// Folder title shown in the panel
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Icosahedron => "Icosahedron",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParamError::UnknownShape(s.to_string()))
    }
}

/// Errors raised when addressing a descriptor or panel control by name
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown shape `{0}`")]
    UnknownShape(String),
    #[error("{shape} has no parameter `{field}`")]
    UnknownField { shape: ShapeKind, field: String },
    #[error("no panel control at `{0}`")]
    UnknownControl(String),
    #[error("`{0}` is a toggle, not a number")]
    NotNumeric(String),
    #[error("`{0}` is a number, not a toggle")]
    NotToggle(String),
    #[error("`{value}` is not a finite value for `{path}`")]
    NotFinite { path: String, value: f32 },
}

/// Slider range of one descriptor field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    /// Values snap to this step when set through the panel
    pub step: Option<f32>,
    /// Keyboard increment
    pub increment: f32,
}

impl FieldSpec {
    const fn new(name: &'static str, min: f32, max: f32, increment: f32) -> Self {
        Self {
            name,
            min,
            max,
            step: None,
            increment,
        }
    }

    const fn stepped(name: &'static str, min: f32, max: f32, step: f32) -> Self {
        Self {
            name,
            min,
            max,
            step: Some(step),
            increment: step,
        }
    }
}

/// A parameter set that fully determines one geometry
pub trait Descriptor: Clone + PartialEq + Default {
    const FIELDS: &'static [FieldSpec];

    fn field(&self, name: &str) -> Option<f32>;

    fn field_mut(&mut self, name: &str) -> Option<&mut f32>;

    /// Build a fresh mesh from every field
    fn build(&self) -> Mesh;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: f32,
    pub height_segments: f32,
    pub depth_segments: f32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1.0,
            height_segments: 1.0,
            depth_segments: 1.0,
        }
    }
}

impl Descriptor for BoxParams {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("width", 1.0, 30.0, 0.5),
        FieldSpec::new("height", 1.0, 30.0, 0.5),
        FieldSpec::new("depth", 1.0, 30.0, 0.5),
        FieldSpec::new("widthSegments", 1.0, 30.0, 1.0),
        FieldSpec::new("heightSegments", 1.0, 30.0, 1.0),
        FieldSpec::new("depthSegments", 1.0, 30.0, 1.0),
    ];

    fn field(&self, name: &str) -> Option<f32> {
        match name {
            "width" => Some(self.width),
            "height" => Some(self.height),
            "depth" => Some(self.depth),
            "widthSegments" => Some(self.width_segments),
            "heightSegments" => Some(self.height_segments),
            "depthSegments" => Some(self.depth_segments),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "width" => Some(&mut self.width),
            "height" => Some(&mut self.height),
            "depth" => Some(&mut self.depth),
            "widthSegments" => Some(&mut self.width_segments),
            "heightSegments" => Some(&mut self.height_segments),
            "depthSegments" => Some(&mut self.depth_segments),
            _ => None,
        }
    }

    fn build(&self) -> Mesh {
        Mesh::cuboid(
            self.width,
            self.height,
            self.depth,
            floor_count(self.width_segments),
            floor_count(self.height_segments),
            floor_count(self.depth_segments),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: f32,
    pub height_segments: f32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 8.0,
            height_segments: 6.0,
            phi_start: 0.0,
            phi_length: 2.0 * PI,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

impl Descriptor for SphereParams {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("radius", 0.1, 30.0, 0.1),
        FieldSpec::new("widthSegments", 1.0, 32.0, 1.0),
        FieldSpec::new("heightSegments", 1.0, 16.0, 1.0),
        FieldSpec::new("phiStart", 0.0, 2.0 * PI, PI / 16.0),
        FieldSpec::new("phiLength", 0.0, 2.0 * PI, PI / 16.0),
        FieldSpec::new("thetaStart", 0.0, PI, PI / 16.0),
        FieldSpec::new("thetaLength", 0.0, PI, PI / 16.0),
    ];

    fn field(&self, name: &str) -> Option<f32> {
        match name {
            "radius" => Some(self.radius),
            "widthSegments" => Some(self.width_segments),
            "heightSegments" => Some(self.height_segments),
            "phiStart" => Some(self.phi_start),
            "phiLength" => Some(self.phi_length),
            "thetaStart" => Some(self.theta_start),
            "thetaLength" => Some(self.theta_length),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "radius" => Some(&mut self.radius),
            "widthSegments" => Some(&mut self.width_segments),
            "heightSegments" => Some(&mut self.height_segments),
            "phiStart" => Some(&mut self.phi_start),
            "phiLength" => Some(&mut self.phi_length),
            "thetaStart" => Some(&mut self.theta_start),
            "thetaLength" => Some(&mut self.theta_length),
            _ => None,
        }
    }

    fn build(&self) -> Mesh {
        Mesh::sphere(
            self.radius,
            floor_count(self.width_segments),
            floor_count(self.height_segments),
            self.phi_start,
            self.phi_length,
            self.theta_start,
            self.theta_length,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcosahedronParams {
    pub radius: f32,
    pub detail: f32,
}

impl Default for IcosahedronParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 0.0,
        }
    }
}

impl Descriptor for IcosahedronParams {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("radius", 0.1, 10.0, 0.1),
        FieldSpec::stepped("detail", 0.0, 5.0, 1.0),
    ];

    fn field(&self, name: &str) -> Option<f32> {
        match name {
            "radius" => Some(self.radius),
            "detail" => Some(self.detail),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "radius" => Some(&mut self.radius),
            "detail" => Some(&mut self.detail),
            _ => None,
        }
    }

    fn build(&self) -> Mesh {
        Mesh::icosahedron(self.radius, floor_count(self.detail))
    }
}

fn floor_count(value: f32) -> u32 {
    value.max(0.0).floor() as u32
}

/// Descriptor of any shape in the scene
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeParams {
    Box(BoxParams),
    Sphere(SphereParams),
    Icosahedron(IcosahedronParams),
}

impl ShapeParams {
    pub fn defaults(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => ShapeParams::Box(BoxParams::default()),
            ShapeKind::Sphere => ShapeParams::Sphere(SphereParams::default()),
            ShapeKind::Icosahedron => ShapeParams::Icosahedron(IcosahedronParams::default()),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Box(_) => ShapeKind::Cube,
            ShapeParams::Sphere(_) => ShapeKind::Sphere,
            ShapeParams::Icosahedron(_) => ShapeKind::Icosahedron,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            ShapeParams::Box(_) => BoxParams::FIELDS,
            ShapeParams::Sphere(_) => SphereParams::FIELDS,
            ShapeParams::Icosahedron(_) => IcosahedronParams::FIELDS,
        }
    }

    pub fn get(&self, field: &str) -> Option<f32> {
        match self {
            ShapeParams::Box(params) => params.field(field),
            ShapeParams::Sphere(params) => params.field(field),
            ShapeParams::Icosahedron(params) => params.field(field),
        }
    }

    /// Write one field as given. Range checks belong to the panel.
    pub fn set(&mut self, field: &str, value: f32) -> Result<(), ParamError> {
        let kind = self.kind();
        let slot = match self {
            ShapeParams::Box(params) => params.field_mut(field),
            ShapeParams::Sphere(params) => params.field_mut(field),
            ShapeParams::Icosahedron(params) => params.field_mut(field),
        };
        let slot = slot.ok_or_else(|| ParamError::UnknownField {
            shape: kind,
            field: field.to_string(),
        })?;
        *slot = value;
        Ok(())
    }

    pub fn build(&self) -> Mesh {
        match self {
            ShapeParams::Box(params) => params.build(),
            ShapeParams::Sphere(params) => params.build(),
            ShapeParams::Icosahedron(params) => params.build(),
        }
    }
}
