/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    Float,
    UnsignedInt,
    /// Unsigned bytes, normalized to `[0, 1]` when read by the shader.
    UnsignedByte,
}

impl ElementType {
    /// Size of one component in bytes.
    pub fn size(self) -> u32 {
        match self {
            ElementType::Float => 4,
            ElementType::UnsignedInt => 4,
            ElementType::UnsignedByte => 1,
        }
    }

    pub fn normalized(self) -> bool {
        matches!(self, ElementType::UnsignedByte)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexBufferElement {
    pub ty: ElementType,
    pub count: u32,
    pub normalized: bool,
}

impl VertexBufferElement {
    /// Size of the whole attribute in bytes.
    pub fn size(&self) -> u32 {
        self.count * self.ty.size()
    }
}

/// Describes how interleaved vertex attributes are packed in a buffer.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: u32,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute of `count` components of type `ty`.
    pub fn push(&mut self, ty: ElementType, count: u32) -> &mut Self {
        let element = VertexBufferElement {
            ty,
            count,
            normalized: ty.normalized(),
        };
        self.stride += element.size();
        self.elements.push(element);
        self
    }

    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    /// Bytes between two consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementType::*, VertexBufferLayout};

    #[test]
    fn empty() {
        let layout = VertexBufferLayout::new();
        assert!(layout.elements().is_empty());
        assert_eq!(0, layout.stride());
    }

    #[test]
    fn stride() {
        let mut layout = VertexBufferLayout::new();
        layout.push(Float, 2).push(UnsignedByte, 4).push(UnsignedInt, 1);
        assert_eq!(2 * 4 + 4 + 4, layout.stride());
        assert_eq!(3, layout.elements().len());
    }

    #[test]
    fn only_bytes_are_normalized() {
        let mut layout = VertexBufferLayout::new();
        layout.push(Float, 3).push(UnsignedInt, 1).push(UnsignedByte, 4);
        let normalized: Vec<_> = layout.elements().iter().map(|e| e.normalized).collect();
        assert_eq!(vec![false, false, true], normalized);
    }
}
