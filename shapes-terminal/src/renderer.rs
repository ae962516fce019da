/// ASCII wireframe rasterizer for terminal rendering
use std::io::{self, stdout, Write};

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use shapes_core::{Camera, Edge, Renderer, Scene, ScreenPoint};

/// ASCII renderer that draws scene edges as slope characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Rasterize the axes and every visible shape into the buffers
    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        self.clear();
        let view_projection = camera.view_projection();

        for (edge, rgb) in scene.axes.lines() {
            let [r, g, b] = rgb.map(|channel| (channel * 255.0) as u8);
            self.render_edge(&view_projection, &edge, Color::Rgb { r, g, b });
        }

        for shape in scene.shapes().filter(|shape| shape.visible) {
            let mvp = view_projection * shape.transform.model_matrix();
            let [r, g, b] = shape.material().rgb8();
            let color = Color::Rgb { r, g, b };
            for edge in shape.geometry().edges() {
                self.render_edge(&mvp, edge, color);
            }
        }
    }

    fn render_edge(&mut self, mvp: &Matrix4<f32>, edge: &Edge, color: Color) {
        let (width, height) = (self.width as u32, self.height as u32);
        let Some((start, end)) = Camera::project_segment(mvp, &edge[0], &edge[1], width, height)
        else {
            return; // Edge lies behind the camera
        };

        let Some((start, end)) = clip_segment(start, end, self.width as f32, self.height as f32)
        else {
            return;
        };

        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let character = slope_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (start.0 + dx * t).floor();
            let y = (start.1 + dy * t).floor();
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if x >= self.width || y >= self.height {
                continue;
            }

            let depth = start.2 + (end.2 - start.2) * t;
            let idx = y * self.width + x;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Queue the character buffer onto a terminal writer
    pub fn present<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut current = Color::Reset;
        writer.queue(ResetColor)?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    writer.queue(SetForegroundColor(color))?;
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    type Error = io::Error;

    fn draw(&mut self, scene: &Scene, camera: &Camera) -> io::Result<()> {
        self.render_scene(scene, camera);
        self.present(&mut stdout())
    }
}

/// Pick a line character from the screen-space direction (rows grow downwards)
fn slope_char(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax > 2.0 * ay {
        '-'
    } else if ay > 2.0 * ax {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Liang-Barsky clip of a segment against `[0, width] x [0, height]`
fn clip_segment(
    start: ScreenPoint,
    end: ScreenPoint,
    width: f32,
    height: f32,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    for (p, q) in [
        (-dx, start.0),
        (dx, width - start.0),
        (-dy, start.1),
        (dy, height - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f32| {
        (
            start.0 + dx * t,
            start.1 + dy * t,
            start.2 + (end.2 - start.2) * t,
        )
    };
    Some((at(t0), at(t1)))
}
