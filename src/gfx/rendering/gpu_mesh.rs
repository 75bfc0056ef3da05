//! Vertex and index buffers uploaded from CPU-side geometry.

use wgpu::util::DeviceExt;

use crate::gfx::geometry::{AttributePresence, IndexedGeometry, MeshData};

/// An interleaved vertex buffer drawn without indices.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub presence: AttributePresence,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            vertex_count: mesh.vertex_count() as u32,
            presence: mesh.presence,
        }
    }
}

/// A position-only buffer with 16-bit indices, used for the skybox cube.
pub struct GpuIndexedMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuIndexedMesh {
    pub fn new(device: &wgpu::Device, geometry: &IndexedGeometry, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&geometry.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.index_count() as u32,
        }
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
    fn draw_indexed_mesh(&mut self, mesh: &'a GpuIndexedMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.draw(0..mesh.vertex_count, 0..1);
    }

    fn draw_indexed_mesh(&mut self, mesh: &'b GpuIndexedMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
