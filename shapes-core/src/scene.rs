//! The demo scene: three shapes sharing one wireframe material, plus an axes helper.
//!
//! Geometry is never edited in place. Changing a descriptor builds a new
//! [`Geometry`], swaps it into the shape and releases the previous one through
//! the scene's [`GeometryLedger`], which is what renderers key their uploaded
//! buffers on.

use std::collections::BTreeSet;
use std::rc::Rc;

use log::debug;
use nalgebra::Point3;

use crate::descriptor::{ParamError, ShapeKind, ShapeParams};
use crate::geometry::{Edge, Mesh};
use crate::transform::Transform;

/// Identity of one built geometry; a new id is issued on every rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Book-keeping of which geometries are currently live
#[derive(Debug, Default)]
pub struct GeometryLedger {
    next_id: u64,
    live: BTreeSet<GeometryId>,
    released: u64,
}

impl GeometryLedger {
    fn allocate(&mut self) -> GeometryId {
        let id = GeometryId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    fn retire(&mut self, id: GeometryId) {
        let was_live = self.live.remove(&id);
        debug_assert!(was_live, "geometry {id:?} released twice");
        self.released += 1;
    }

    pub fn is_live(&self, id: GeometryId) -> bool {
        self.live.contains(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn built(&self) -> u64 {
        self.next_id
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

/// Mesh data derived from one descriptor snapshot
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    params: ShapeParams,
    mesh: Mesh,
    edges: Vec<Edge>,
}

impl Geometry {
    pub fn build(params: &ShapeParams, ledger: &mut GeometryLedger) -> Self {
        let mesh = params.build();
        let edges = mesh.edges();
        Self {
            id: ledger.allocate(),
            params: params.clone(),
            mesh,
            edges,
        }
    }

    /// Give the geometry back to the ledger. Consumes it so it cannot be released twice.
    pub fn release(self, ledger: &mut GeometryLedger) {
        ledger.retire(self.id);
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    /// The descriptor this geometry was built from
    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Wireframe line list
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Surface appearance shared by every shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub wireframe: bool,
}

impl Material {
    pub fn wireframe(color: u32) -> Self {
        Self {
            color,
            wireframe: true,
        }
    }

    pub fn rgb8(&self) -> [u8; 3] {
        [
            (self.color >> 16) as u8,
            (self.color >> 8) as u8,
            self.color as u8,
        ]
    }

    pub fn rgb(&self) -> [f32; 3] {
        self.rgb8().map(|channel| channel as f32 / 255.0)
    }
}

/// One displayed primitive
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    params: ShapeParams,
    geometry: Geometry,
    material: Rc<Material>,
    pub transform: Transform,
    pub visible: bool,
}

impl Shape {
    fn new(kind: ShapeKind, material: Rc<Material>, ledger: &mut GeometryLedger) -> Self {
        let params = ShapeParams::defaults(kind);
        let geometry = Geometry::build(&params, ledger);
        Self {
            kind,
            params,
            geometry,
            material,
            transform: Transform::identity(),
            visible: true,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }

    /// Rebuild from the full current descriptor and retire the old geometry
    fn regenerate(&mut self, ledger: &mut GeometryLedger) {
        let next = Geometry::build(&self.params, ledger);
        let previous = std::mem::replace(&mut self.geometry, next);
        debug!(
            "{} geometry #{} replaced by #{} ({} triangles)",
            self.kind,
            previous.id().get(),
            self.geometry.id().get(),
            self.geometry.mesh().triangles.len()
        );
        previous.release(ledger);
    }
}

/// Colored axis lines drawn at the world origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesHelper {
    pub size: f32,
}

impl AxesHelper {
    /// X red, Y green, Z blue
    pub fn lines(&self) -> [(Edge, [f32; 3]); 3] {
        let origin = Point3::origin();
        [
            ([origin, Point3::new(self.size, 0.0, 0.0)], [1.0, 0.0, 0.0]),
            ([origin, Point3::new(0.0, self.size, 0.0)], [0.0, 1.0, 0.0]),
            ([origin, Point3::new(0.0, 0.0, self.size)], [0.0, 0.0, 1.0]),
        ]
    }
}

#[derive(Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    material: Rc<Material>,
    pub axes: AxesHelper,
    ledger: GeometryLedger,
}

impl Scene {
    /// Cube to the right, sphere to the left, icosahedron in the middle
    pub fn new() -> Self {
        let material = Rc::new(Material::wireframe(0x00ff00));
        let mut ledger = GeometryLedger::default();

        let shapes = ShapeKind::ALL
            .into_iter()
            .map(|kind| {
                let mut shape = Shape::new(kind, Rc::clone(&material), &mut ledger);
                shape.transform = match kind {
                    ShapeKind::Cube => Transform::at(5.0, 0.0, 0.0),
                    ShapeKind::Sphere => Transform::at(-5.0, 0.0, 0.0),
                    ShapeKind::Icosahedron => Transform::identity(),
                };
                shape
            })
            .collect();

        Self {
            shapes,
            material,
            axes: AxesHelper { size: 5.0 },
            ledger,
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn shape(&self, kind: ShapeKind) -> &Shape {
        &self.shapes[kind.index()]
    }

    pub fn shape_mut(&mut self, kind: ShapeKind) -> &mut Shape {
        &mut self.shapes[kind.index()]
    }

    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }

    pub fn ledger(&self) -> &GeometryLedger {
        &self.ledger
    }

    /// Write one descriptor field and rebuild that shape's geometry
    pub fn set_param(&mut self, kind: ShapeKind, field: &str, value: f32) -> Result<(), ParamError> {
        let shape = &mut self.shapes[kind.index()];
        shape.params.set(field, value)?;
        shape.regenerate(&mut self.ledger);
        Ok(())
    }

    /// Restore a shape's default descriptor
    pub fn reset_params(&mut self, kind: ShapeKind) {
        let shape = &mut self.shapes[kind.index()];
        shape.params = ShapeParams::defaults(kind);
        shape.regenerate(&mut self.ledger);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
