use crate::{
    device::{BufferId, BufferTarget, Device, VertexArrayId},
    layout::VertexBufferLayout,
    Error, Result,
};
use std::{mem, rc::Rc, slice};

pub struct VertexBuffer<D: Device> {
    device: Rc<D>,
    buffer: BufferId,
}

impl<D: Device> VertexBuffer<D> {
    pub fn new(device: Rc<D>, data: &[u8]) -> Result<Self> {
        let buffer = create(&*device, BufferTarget::Array, data)?;
        Ok(Self { device, buffer })
    }

    /// Upload a slice of `f32` vertex data.
    pub fn from_f32(device: Rc<D>, data: &[f32]) -> Result<Self> {
        let bytes =
            unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, mem::size_of_val(data)) };
        Self::new(device, bytes)
    }

    pub fn id(&self) -> BufferId {
        self.buffer
    }

    pub fn bind(&self) -> Result<()> {
        self.device.bind_buffer(BufferTarget::Array, Some(self.buffer))
    }

    pub fn unbind(&self) -> Result<()> {
        self.device.bind_buffer(BufferTarget::Array, None)
    }
}

impl<D: Device> Drop for VertexBuffer<D> {
    fn drop(&mut self) {
        delete(&*self.device, self.buffer);
    }
}

pub struct IndexBuffer<D: Device> {
    device: Rc<D>,
    buffer: BufferId,
    count: u32,
}

impl<D: Device> IndexBuffer<D> {
    pub fn new(device: Rc<D>, indices: &[u32]) -> Result<Self> {
        let bytes = unsafe {
            slice::from_raw_parts(indices.as_ptr() as *const u8, mem::size_of_val(indices))
        };
        let buffer = create(&*device, BufferTarget::ElementArray, bytes)?;
        Ok(Self {
            device,
            buffer,
            count: indices.len() as u32,
        })
    }

    pub fn id(&self) -> BufferId {
        self.buffer
    }

    /// Number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn bind(&self) -> Result<()> {
        self.device
            .bind_buffer(BufferTarget::ElementArray, Some(self.buffer))
    }

    pub fn unbind(&self) -> Result<()> {
        self.device.bind_buffer(BufferTarget::ElementArray, None)
    }
}

impl<D: Device> Drop for IndexBuffer<D> {
    fn drop(&mut self) {
        delete(&*self.device, self.buffer);
    }
}

pub struct VertexArray<D: Device> {
    device: Rc<D>,
    vertex_array: VertexArrayId,
}

impl<D: Device> VertexArray<D> {
    pub fn new(device: Rc<D>) -> Result<Self> {
        let vertex_array = device.create_vertex_array()?;
        if vertex_array.0 == 0 {
            return Err(Error::Allocation("vertex array"));
        }
        Ok(Self {
            device,
            vertex_array,
        })
    }

    pub fn id(&self) -> VertexArrayId {
        self.vertex_array
    }

    /// Attach `buffer` to this vertex array, one attribute per element of
    /// `layout`, starting at attribute index 0.
    pub fn add_buffer(&self, buffer: &VertexBuffer<D>, layout: &VertexBufferLayout) -> Result<()> {
        self.bind()?;
        buffer.bind()?;
        let mut offset = 0;
        for (index, element) in layout.elements().iter().enumerate() {
            self.device
                .vertex_attrib(index as u32, element, layout.stride(), offset)?;
            offset += element.size() as usize;
        }
        Ok(())
    }

    pub fn bind(&self) -> Result<()> {
        self.device.bind_vertex_array(Some(self.vertex_array))
    }

    pub fn unbind(&self) -> Result<()> {
        self.device.bind_vertex_array(None)
    }
}

impl<D: Device> Drop for VertexArray<D> {
    fn drop(&mut self) {
        if let Err(err) = self.device.delete_vertex_array(self.vertex_array) {
            log::error!(target: "buffer", "Error deleting vertex array {}: {}", self.vertex_array.0, err);
        }
    }
}

fn create<D: Device>(device: &D, target: BufferTarget, data: &[u8]) -> Result<BufferId> {
    let buffer = device.create_buffer(target, data)?;
    if buffer.0 == 0 {
        return Err(Error::Allocation("buffer"));
    }
    log::debug!(target: "buffer", "Created {:?} buffer {} ({} bytes)", target, buffer.0, data.len());
    Ok(buffer)
}

fn delete<D: Device>(device: &D, buffer: BufferId) {
    if let Err(err) = device.delete_buffer(buffer) {
        log::error!(target: "buffer", "Error deleting buffer {}: {}", buffer.0, err);
    }
}
