use sandbox_backend_headless::{Call, HeadlessDevice};
use sandbox_lib::{
    buffer::{IndexBuffer, VertexArray, VertexBuffer},
    device::BufferTarget,
    layout::{ElementType, VertexBufferElement, VertexBufferLayout},
    renderer::Renderer,
    shader::Shader,
    source::ShaderSource,
};
use std::rc::Rc;

static QUAD: &[f32] = &[
    -0.5, -0.5, 0.0, 0.0, //
    0.5, -0.5, 1.0, 0.0, //
    0.5, 0.5, 1.0, 1.0, //
    -0.5, 0.5, 0.0, 1.0,
];

static INDICES: &[u32] = &[0, 1, 2, 2, 3, 0];

#[test]
fn vertex_buffer_upload() {
    let device = Rc::new(HeadlessDevice::new());
    let vb = VertexBuffer::from_f32(device.clone(), QUAD).unwrap();

    assert_eq!(
        vec![Call::CreateBuffer(BufferTarget::Array, vb.id(), 16 * 4)],
        device.calls()
    );
}

#[test]
fn index_buffer_count() {
    let device = Rc::new(HeadlessDevice::new());
    let ib = IndexBuffer::new(device.clone(), INDICES).unwrap();

    assert_eq!(6, ib.count());
    assert_eq!(
        vec![Call::CreateBuffer(BufferTarget::ElementArray, ib.id(), 6 * 4)],
        device.calls()
    );
}

#[test]
fn buffers_are_released_on_drop() {
    let device = Rc::new(HeadlessDevice::new());
    {
        let _vb = VertexBuffer::from_f32(device.clone(), QUAD).unwrap();
        let _ib = IndexBuffer::new(device.clone(), INDICES).unwrap();
        let _va = VertexArray::new(device.clone()).unwrap();
        assert_eq!(2, device.live_buffers());
        assert_eq!(1, device.live_vertex_arrays());
    }
    assert_eq!(0, device.live_buffers());
    assert_eq!(0, device.live_vertex_arrays());
}

#[test]
fn add_buffer_describes_every_attribute() {
    let device = Rc::new(HeadlessDevice::new());
    let vb = VertexBuffer::from_f32(device.clone(), QUAD).unwrap();
    let va = VertexArray::new(device.clone()).unwrap();
    let mut layout = VertexBufferLayout::new();
    layout
        .push(ElementType::Float, 2)
        .push(ElementType::Float, 2)
        .push(ElementType::UnsignedByte, 4);
    device.clear_calls();

    va.add_buffer(&vb, &layout).unwrap();

    let float2 = VertexBufferElement {
        ty: ElementType::Float,
        count: 2,
        normalized: false,
    };
    let color = VertexBufferElement {
        ty: ElementType::UnsignedByte,
        count: 4,
        normalized: true,
    };
    assert_eq!(
        vec![
            Call::BindVertexArray(Some(va.id())),
            Call::BindBuffer(BufferTarget::Array, Some(vb.id())),
            Call::VertexAttrib {
                index: 0,
                element: float2,
                stride: 20,
                offset: 0
            },
            Call::VertexAttrib {
                index: 1,
                element: float2,
                stride: 20,
                offset: 8
            },
            Call::VertexAttrib {
                index: 2,
                element: color,
                stride: 20,
                offset: 16
            },
        ],
        device.calls()
    );
}

#[test]
fn draw_binds_everything_then_draws() {
    let device = Rc::new(HeadlessDevice::new());
    let source = ShaderSource {
        vertex: String::from("void main() {}\n"),
        fragment: String::from("void main() {}\n"),
    };
    let shader = Shader::from_source(device.clone(), &source, "inline").unwrap();
    let vb = VertexBuffer::from_f32(device.clone(), QUAD).unwrap();
    let ib = IndexBuffer::new(device.clone(), INDICES).unwrap();
    let va = VertexArray::new(device.clone()).unwrap();
    let mut layout = VertexBufferLayout::new();
    layout.push(ElementType::Float, 2).push(ElementType::Float, 2);
    va.add_buffer(&vb, &layout).unwrap();

    let renderer = Renderer::new(device.clone());
    device.clear_calls();

    renderer.viewport(960, 540).unwrap();
    renderer.clear_color([0.1, 0.2, 0.3, 1.0]).unwrap();
    renderer.clear().unwrap();
    renderer.draw(&va, &ib, &shader).unwrap();

    assert_eq!(
        vec![
            Call::Viewport(960, 540),
            Call::ClearColor([0.1, 0.2, 0.3, 1.0]),
            Call::Clear,
            Call::UseProgram(Some(shader.id())),
            Call::BindVertexArray(Some(va.id())),
            Call::BindBuffer(BufferTarget::ElementArray, Some(ib.id())),
            Call::DrawElements(6),
        ],
        device.calls()
    );
}
