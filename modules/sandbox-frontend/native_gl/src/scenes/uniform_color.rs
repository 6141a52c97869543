use crate::scenes::Test;
use glam::Mat4;
use imgui::{im_str, ColorEdit, Ui};
use sandbox_backend_gl::GlDevice;
use sandbox_lib::{
    buffer::{IndexBuffer, VertexArray, VertexBuffer},
    layout::{ElementType, VertexBufferLayout},
    renderer::Renderer,
    shader::Shader,
    Result,
};
use std::{path::Path, rc::Rc};

#[rustfmt::skip]
const POSITIONS: &[f32] = &[
    -0.5, -0.5,
     0.5, -0.5,
     0.5,  0.5,
    -0.5,  0.5,
];

const INDICES: &[u32] = &[0, 1, 2, 2, 3, 0];

/// Units per second the red channel moves while animating.
const SPEED: f32 = 1.5;

/// Index-buffered quad whose color comes from the `u_Color` uniform.
pub struct UniformColor {
    renderer: Renderer<GlDevice>,
    shader: Shader<GlDevice>,
    vertex_array: VertexArray<GlDevice>,
    index_buffer: IndexBuffer<GlDevice>,
    // the vertex array reads from it, keep it alive
    _vertex_buffer: VertexBuffer<GlDevice>,
    projection: Mat4,
    color: [f32; 4],
    direction: f32,
    animate: bool,
}

impl UniformColor {
    pub fn new<P: AsRef<Path>>(device: Rc<GlDevice>, shader: P) -> Result<Self> {
        let vertex_array = VertexArray::new(device.clone())?;
        let vertex_buffer = VertexBuffer::from_f32(device.clone(), POSITIONS)?;
        let mut layout = VertexBufferLayout::new();
        layout.push(ElementType::Float, 2);
        vertex_array.add_buffer(&vertex_buffer, &layout)?;
        let index_buffer = IndexBuffer::new(device.clone(), INDICES)?;

        let mut shader = Shader::from_file(device.clone(), shader)?;
        shader.bind()?;
        shader.set_uniform_4f("u_Color", 0.8, 0.3, 0.8, 1.0)?;

        vertex_array.unbind()?;
        vertex_buffer.unbind()?;
        index_buffer.unbind()?;
        shader.unbind()?;

        Ok(Self {
            renderer: Renderer::new(device),
            shader,
            vertex_array,
            index_buffer,
            _vertex_buffer: vertex_buffer,
            projection: Mat4::orthographic_rh_gl(-2.0, 2.0, -1.5, 1.5, -1.0, 1.0),
            color: [0.0, 0.3, 0.8, 1.0],
            direction: 1.0,
            animate: true,
        })
    }
}

/// Move `value` by `step`, bouncing between 0 and 1. Returns the new
/// direction.
fn bounce(value: &mut f32, direction: f32, step: f32) -> f32 {
    let direction = if *value > 1.0 {
        -1.0
    } else if *value < 0.0 {
        1.0
    } else {
        direction
    };
    *value += direction * step;
    direction
}

impl Test for UniformColor {
    fn on_update(&mut self, delta: f32) -> Result<()> {
        if self.animate {
            self.direction = bounce(&mut self.color[0], self.direction, SPEED * delta);
        }
        Ok(())
    }

    fn on_render(&mut self) -> Result<()> {
        let [r, g, b, a] = self.color;
        self.shader.bind()?;
        self.shader.set_uniform_4f("u_Color", r, g, b, a)?;
        self.shader.set_uniform_mat4("u_MVP", &self.projection)?;
        self.renderer
            .draw(&self.vertex_array, &self.index_buffer, &self.shader)
    }

    fn on_imgui_render(&mut self, ui: &Ui) {
        ui.checkbox(im_str!("Animate"), &mut self.animate);
        ColorEdit::new(im_str!("u_Color"), &mut self.color).build(ui);
        ui.text(format!("Shader: {}", self.shader.path().display()));
    }
}
