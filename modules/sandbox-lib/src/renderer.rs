use crate::{
    buffer::{IndexBuffer, VertexArray},
    device::Device,
    shader::Shader,
    Result,
};
use std::rc::Rc;

pub struct Renderer<D: Device> {
    device: Rc<D>,
}

impl<D: Device> Renderer<D> {
    pub fn new(device: Rc<D>) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Rc<D> {
        &self.device
    }

    pub fn viewport(&self, width: u32, height: u32) -> Result<()> {
        self.device.viewport(width, height)
    }

    pub fn clear_color(&self, color: [f32; 4]) -> Result<()> {
        self.device.clear_color(color)
    }

    pub fn clear(&self) -> Result<()> {
        self.device.clear()
    }

    /// Draw every index of `index_buffer` as triangles.
    pub fn draw(
        &self,
        vertex_array: &VertexArray<D>,
        index_buffer: &IndexBuffer<D>,
        shader: &Shader<D>,
    ) -> Result<()> {
        shader.bind()?;
        vertex_array.bind()?;
        index_buffer.bind()?;
        self.device.draw_elements(index_buffer.count())
    }
}
