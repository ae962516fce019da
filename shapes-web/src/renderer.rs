/// WebGL2 line renderer for the shapes scene
use std::collections::{HashMap, HashSet};

use nalgebra::Matrix4;
use shapes_core::{AxesHelper, Camera, Edge, GeometryId, Renderer, Scene};
use thiserror::Error;
use wasm_bindgen::JsValue;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation};

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_mvp;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
out vec4 frag_color;
void main() {
    frag_color = vec4(u_color, 1.0);
}
"#;

const POSITION_ATTRIBUTE: u32 = 0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas `{0}` not found")]
    CanvasNotFound(String),
    #[error("webgl2 context unavailable")]
    ContextUnavailable,
    #[error("shader compile failed: {0}")]
    Shader(String),
    #[error("program link failed: {0}")]
    Link(String),
    #[error("uniform `{0}` missing from program")]
    Uniform(&'static str),
    #[error("buffer allocation failed")]
    Buffer,
}

impl From<RenderError> for JsValue {
    fn from(err: RenderError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A vertex buffer holding one geometry's edges
struct LineBuffer {
    buffer: WebGlBuffer,
    vertex_count: i32,
}

pub struct WebGlRenderer {
    gl: Gl,
    program: WebGlProgram,
    mvp: WebGlUniformLocation,
    color: WebGlUniformLocation,
    axes: Option<(AxesHelper, LineBuffer)>,
    buffers: HashMap<GeometryId, LineBuffer>,
}

impl WebGlRenderer {
    pub fn new(gl: Gl) -> Result<Self, RenderError> {
        let vertex = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex, &fragment)?;
        let mvp = gl
            .get_uniform_location(&program, "u_mvp")
            .ok_or(RenderError::Uniform("u_mvp"))?;
        let color = gl
            .get_uniform_location(&program, "u_color")
            .ok_or(RenderError::Uniform("u_color"))?;

        Ok(Self {
            gl,
            program,
            mvp,
            color,
            axes: None,
            buffers: HashMap::new(),
        })
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Upload buffers for new geometry ids and delete the ones no shape uses anymore
    fn sync_buffers(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let live: HashSet<GeometryId> = scene.shapes().map(|s| s.geometry().id()).collect();
        for id in stale_ids(self.buffers.keys().copied(), &live) {
            if let Some(stale) = self.buffers.remove(&id) {
                self.gl.delete_buffer(Some(&stale.buffer));
            }
        }

        for shape in scene.shapes() {
            let geometry = shape.geometry();
            if !self.buffers.contains_key(&geometry.id()) {
                let buffer = upload(&self.gl, &edge_vertices(geometry.edges()))?;
                self.buffers.insert(geometry.id(), buffer);
            }
        }
        Ok(())
    }

    fn sync_axes(&mut self, helper: AxesHelper) -> Result<(), RenderError> {
        if matches!(&self.axes, Some((uploaded, _)) if *uploaded == helper) {
            return Ok(());
        }
        let edges: Vec<Edge> = helper.lines().iter().map(|(edge, _)| *edge).collect();
        let buffer = upload(&self.gl, &edge_vertices(&edges))?;
        if let Some((_, old)) = self.axes.replace((helper, buffer)) {
            self.gl.delete_buffer(Some(&old.buffer));
        }
        Ok(())
    }

    fn draw_lines(&self, buffer: &LineBuffer, mvp: &Matrix4<f32>, rgb: [f32; 3], first: i32, count: i32) {
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer.buffer));
        self.gl
            .vertex_attrib_pointer_with_i32(POSITION_ATTRIBUTE, 3, Gl::FLOAT, false, 0, 0);
        self.gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);
        self.gl
            .uniform_matrix4fv_with_f32_array(Some(&self.mvp), false, mvp.as_slice());
        self.gl.uniform3f(Some(&self.color), rgb[0], rgb[1], rgb[2]);
        self.gl.draw_arrays(Gl::LINES, first, count);
    }
}

impl Renderer for WebGlRenderer {
    type Error = RenderError;

    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        self.sync_buffers(scene)?;
        self.sync_axes(scene.axes)?;

        self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.use_program(Some(&self.program));

        let view_projection = camera.view_projection();
        if let Some((helper, axes)) = &self.axes {
            for (index, (_, rgb)) in helper.lines().iter().enumerate() {
                self.draw_lines(axes, &view_projection, *rgb, index as i32 * 2, 2);
            }
        }

        for shape in scene.shapes().filter(|shape| shape.visible) {
            if let Some(buffer) = self.buffers.get(&shape.geometry().id()) {
                let mvp = view_projection * shape.transform.model_matrix();
                self.draw_lines(buffer, &mvp, shape.material().rgb(), 0, buffer.vertex_count);
            }
        }
        Ok(())
    }
}

impl Drop for WebGlRenderer {
    fn drop(&mut self) {
        for (_, line_buffer) in self.buffers.drain() {
            self.gl.delete_buffer(Some(&line_buffer.buffer));
        }
        if let Some((_, axes)) = self.axes.take() {
            self.gl.delete_buffer(Some(&axes.buffer));
        }
        self.gl.delete_program(Some(&self.program));
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, RenderError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| RenderError::Shader("unable to create shader object".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(RenderError::Shader(log))
    }
}

fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, RenderError> {
    let program = gl
        .create_program()
        .ok_or_else(|| RenderError::Link("unable to create program object".into()))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(RenderError::Link(log))
    }
}

fn upload(gl: &Gl, vertices: &[[f32; 3]]) -> Result<LineBuffer, RenderError> {
    let buffer = gl.create_buffer().ok_or(RenderError::Buffer)?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_u8_array(Gl::ARRAY_BUFFER, bytemuck::cast_slice(vertices), Gl::STATIC_DRAW);
    Ok(LineBuffer {
        buffer,
        vertex_count: vertices.len() as i32,
    })
}

/// Flatten edges into consecutive `LINES` vertex pairs
fn edge_vertices(edges: &[Edge]) -> Vec<[f32; 3]> {
    edges
        .iter()
        .flat_map(|[a, b]| [[a.x, a.y, a.z], [b.x, b.y, b.z]])
        .collect()
}

fn stale_ids(
    cached: impl Iterator<Item = GeometryId>,
    live: &HashSet<GeometryId>,
) -> Vec<GeometryId> {
    cached.filter(|id| !live.contains(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapes_core::ShapeKind;

    #[test]
    fn test_edge_vertices_come_in_pairs() {
        let scene = Scene::new();
        let edges = scene.shape(ShapeKind::Cube).geometry().edges();
        let vertices = edge_vertices(edges);
        assert_eq!(vertices.len(), edges.len() * 2);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&vertices).len(), vertices.len() * 12);
        assert_eq!(vertices[0], [edges[0][0].x, edges[0][0].y, edges[0][0].z]);
    }

    #[test]
    fn test_regenerated_geometry_is_stale() {
        let mut scene = Scene::new();
        let cached: Vec<GeometryId> = scene.shapes().map(|s| s.geometry().id()).collect();
        let old_sphere = scene.shape(ShapeKind::Sphere).geometry().id();

        scene.set_param(ShapeKind::Sphere, "radius", 2.0).unwrap();
        let live: HashSet<GeometryId> = scene.shapes().map(|s| s.geometry().id()).collect();

        assert_eq!(stale_ids(cached.into_iter(), &live), vec![old_sphere]);
    }
}
