//! Cuboid mesh emission
//!
//! Everything drawn is a colored cuboid. Geometry is generated CPU-side and
//! re-uploaded each frame; the vertex format carries world-space position
//! and a per-face color.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// 3D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Face color order: +z, -z, +x, -x, +y, -y
pub type FaceColors = [[f32; 4]; 6];

/// Uniform color on every face
pub fn solid(color: [f32; 4]) -> FaceColors {
    [color; 6]
}

/// Append one transformed cuboid (36 vertices, 12 triangles)
pub fn emit_cuboid(out: &mut Vec<Vertex>, transform: Mat4, half: Vec3, faces: &FaceColors) {
    let (w, l, h) = (half.x, half.y, half.z);
    // Two triangles per face, untransformed corner positions
    let face_corners: [[Vec3; 6]; 6] = [
        // +z
        [
            Vec3::new(w, l, h),
            Vec3::new(w, -l, h),
            Vec3::new(-w, -l, h),
            Vec3::new(-w, -l, h),
            Vec3::new(-w, l, h),
            Vec3::new(w, l, h),
        ],
        // -z
        [
            Vec3::new(w, l, -h),
            Vec3::new(w, -l, -h),
            Vec3::new(-w, -l, -h),
            Vec3::new(-w, -l, -h),
            Vec3::new(-w, l, -h),
            Vec3::new(w, l, -h),
        ],
        // +x
        [
            Vec3::new(w, l, h),
            Vec3::new(w, l, -h),
            Vec3::new(w, -l, h),
            Vec3::new(w, l, -h),
            Vec3::new(w, -l, h),
            Vec3::new(w, -l, -h),
        ],
        // -x
        [
            Vec3::new(-w, l, h),
            Vec3::new(-w, l, -h),
            Vec3::new(-w, -l, h),
            Vec3::new(-w, l, -h),
            Vec3::new(-w, -l, h),
            Vec3::new(-w, -l, -h),
        ],
        // +y
        [
            Vec3::new(w, l, h),
            Vec3::new(-w, l, h),
            Vec3::new(w, l, -h),
            Vec3::new(-w, l, h),
            Vec3::new(w, l, -h),
            Vec3::new(-w, l, -h),
        ],
        // -y
        [
            Vec3::new(w, -l, h),
            Vec3::new(-w, -l, h),
            Vec3::new(w, -l, -h),
            Vec3::new(-w, -l, h),
            Vec3::new(w, -l, -h),
            Vec3::new(-w, -l, -h),
        ],
    ];

    for (corners, color) in face_corners.iter().zip(faces.iter()) {
        for corner in corners {
            let p = transform.transform_point3(*corner);
            out.push(Vertex::new([p.x, p.y, p.z], *color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_vertex_count() {
        let mut out = Vec::new();
        emit_cuboid(
            &mut out,
            Mat4::IDENTITY,
            Vec3::new(0.2, 0.2, 0.4),
            &solid([1.0; 4]),
        );
        assert_eq!(out.len(), 36);
    }

    #[test]
    fn test_cuboid_respects_transform() {
        let mut out = Vec::new();
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        emit_cuboid(&mut out, transform, Vec3::splat(0.5), &solid([1.0; 4]));
        for v in &out {
            assert!(v.position[0] >= 0.5 && v.position[0] <= 1.5);
            assert!(v.position[1] >= 1.5 && v.position[1] <= 2.5);
            assert!(v.position[2] >= 2.5 && v.position[2] <= 3.5);
        }
    }

    #[test]
    fn test_face_colors_in_order() {
        let mut faces = solid([0.0; 4]);
        faces[0] = [1.0, 0.0, 0.0, 1.0];
        let mut out = Vec::new();
        emit_cuboid(&mut out, Mat4::IDENTITY, Vec3::splat(0.5), &faces);
        // First six vertices are the +z face
        for v in &out[..6] {
            assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
            assert_eq!(v.position[2], 0.5);
        }
    }
}
