/// Geometry primitives and the parametric builders for the displayed shapes
use std::collections::HashSet;
use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};

/// A triangle face defined by three corner positions
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// A line segment of the wireframe
pub type Edge = [Point3<f32>; 2];

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Unique triangle edges, the line list a wireframe material draws.
    pub fn edges(&self) -> Vec<Edge> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices;
            for (p, q) in [(a, b), (b, c), (c, a)] {
                let (kp, kq) = (quantize(&p), quantize(&q));
                if kp == kq {
                    continue;
                }
                let key = if kp < kq { (kp, kq) } else { (kq, kp) };
                if seen.insert(key) {
                    edges.push([p, q]);
                }
            }
        }
        edges
    }

    /// Box made of six planes, each subdivided into a segment grid
    pub fn cuboid(
        width: f32,
        height: f32,
        depth: f32,
        width_segments: u32,
        height_segments: u32,
        depth_segments: u32,
    ) -> Self {
        let (ws, hs, ds) = (
            width_segments.max(1),
            height_segments.max(1),
            depth_segments.max(1),
        );
        let capacity = 4 * (ws * hs + ws * ds + ds * hs) as usize;
        let mut mesh = Self::with_capacity(capacity);

        const X: usize = 0;
        const Y: usize = 1;
        const Z: usize = 2;

        // px, nx
        mesh.push_plane([Z, Y, X], -1.0, -1.0, [depth, height, width], ds, hs);
        mesh.push_plane([Z, Y, X], 1.0, -1.0, [depth, height, -width], ds, hs);
        // py, ny
        mesh.push_plane([X, Z, Y], 1.0, 1.0, [width, depth, height], ws, ds);
        mesh.push_plane([X, Z, Y], 1.0, -1.0, [width, depth, -height], ws, ds);
        // pz, nz
        mesh.push_plane([X, Y, Z], 1.0, -1.0, [width, height, depth], ws, hs);
        mesh.push_plane([X, Y, Z], -1.0, -1.0, [width, height, -depth], ws, hs);

        mesh
    }

    /// One face of the box. `axes` maps the plane's (u, v, w) onto x/y/z;
    /// the sign of `size[2]` decides which side of the box the plane faces.
    fn push_plane(
        &mut self,
        axes: [usize; 3],
        u_dir: f32,
        v_dir: f32,
        size: [f32; 3],
        grid_x: u32,
        grid_y: u32,
    ) {
        let [u, v, w] = axes;
        let [width, height, depth] = size;
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;

        let row = grid_x as usize + 1;
        let mut grid = Vec::with_capacity(row * (grid_y as usize + 1));
        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height / 2.0;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width / 2.0;

                let mut position = [0.0; 3];
                position[u] = x * u_dir;
                position[v] = y * v_dir;
                position[w] = depth / 2.0;
                grid.push(Point3::from(position));
            }
        }

        for iy in 0..grid_y as usize {
            for ix in 0..grid_x as usize {
                let a = grid[ix + row * iy];
                let b = grid[ix + row * (iy + 1)];
                let c = grid[ix + 1 + row * (iy + 1)];
                let d = grid[ix + 1 + row * iy];
                self.add_triangle(Triangle::new(a, b, d));
                self.add_triangle(Triangle::new(b, c, d));
            }
        }
    }

    /// Latitude/longitude sphere, optionally restricted to a phi/theta window
    pub fn sphere(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let theta_end = (theta_start + theta_length).min(PI);

        let grid: Vec<Vec<Point3<f32>>> = (0..=hs)
            .map(|iy| {
                let theta = theta_start + iy as f32 / hs as f32 * theta_length;
                (0..=ws)
                    .map(|ix| {
                        let phi = phi_start + ix as f32 / ws as f32 * phi_length;
                        Point3::new(
                            -radius * phi.cos() * theta.sin(),
                            radius * theta.cos(),
                            radius * phi.sin() * theta.sin(),
                        )
                    })
                    .collect()
            })
            .collect();

        let (ws, hs) = (ws as usize, hs as usize);
        let mut mesh = Self::with_capacity(ws * hs * 2);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                // Rows touching a pole collapse to a fan
                if iy != 0 || theta_start > 0.0 {
                    mesh.add_triangle(Triangle::new(a, b, d));
                }
                if iy != hs - 1 || theta_end < PI {
                    mesh.add_triangle(Triangle::new(b, c, d));
                }
            }
        }
        mesh
    }

    /// Icosahedron with every face split `detail` times, projected onto the sphere
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let corners = [
            Vector3::new(-1.0, t, 0.0),
            Vector3::new(1.0, t, 0.0),
            Vector3::new(-1.0, -t, 0.0),
            Vector3::new(1.0, -t, 0.0),
            Vector3::new(0.0, -1.0, t),
            Vector3::new(0.0, 1.0, t),
            Vector3::new(0.0, -1.0, -t),
            Vector3::new(0.0, 1.0, -t),
            Vector3::new(t, 0.0, -1.0),
            Vector3::new(t, 0.0, 1.0),
            Vector3::new(-t, 0.0, -1.0),
            Vector3::new(-t, 0.0, 1.0),
        ];
        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let cols = detail as usize + 1;
        let mut mesh = Self::with_capacity(FACES.len() * cols * cols);
        for [a, b, c] in FACES {
            for corner_set in subdivide(corners[a], corners[b], corners[c], cols) {
                let [p0, p1, p2] = corner_set.map(|p| {
                    Point3::from(p.try_normalize(f32::EPSILON).unwrap_or(p) * radius)
                });
                mesh.add_triangle(Triangle::new(p0, p1, p2));
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Split one face into `cols * cols` smaller faces on a triangular lattice.
fn subdivide(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    cols: usize,
) -> Vec<[Vector3<f32>; 3]> {
    let lattice: Vec<Vec<Vector3<f32>>> = (0..=cols)
        .map(|i| {
            let t = i as f32 / cols as f32;
            let aj = a.lerp(&c, t);
            let bj = b.lerp(&c, t);
            let rows = cols - i;
            (0..=rows)
                .map(|j| {
                    if rows == 0 {
                        aj
                    } else {
                        aj.lerp(&bj, j as f32 / rows as f32)
                    }
                })
                .collect()
        })
        .collect();

    let mut faces = Vec::with_capacity(cols * cols);
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                faces.push([lattice[i][k + 1], lattice[i + 1][k], lattice[i][k]]);
            } else {
                faces.push([lattice[i][k + 1], lattice[i + 1][k + 1], lattice[i + 1][k]]);
            }
        }
    }
    faces
}

fn quantize(point: &Point3<f32>) -> [i32; 3] {
    let scaled = point.coords.map(|v| (v * 1.0e4).round() as i32);
    [scaled.x, scaled.y, scaled.z]
}
