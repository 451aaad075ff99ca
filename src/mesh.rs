use glam::{Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// CPU-side geometry. Render components share meshes through `Arc<Mesh>`; the render
/// target owns whatever GPU buffers back them.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Unit cube centred on the origin, four vertices per face
    pub fn create_cube() -> Self {
        // (normal, tangent u, tangent v) per face
        const FACES: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        ];
        const CORNERS: [(f32, f32); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

        let mut mesh = Self::default();
        for (normal, u, v) in FACES {
            let base = mesh.vertices.len() as u32;
            for (s, t) in CORNERS {
                mesh.vertices.push(Vertex {
                    position: normal * 0.5 + u * (s - 0.5) + v * (t - 0.5),
                    normal,
                    uv: Vec2::new(s, t),
                });
            }
            mesh.indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        mesh
    }

    /// Flat square in the XZ plane, facing -Y (up in world space)
    pub fn create_quad(size: f32) -> Self {
        let half = size * 0.5;
        let corners = [
            (Vec3::new(-half, 0.0, -half), Vec2::new(0.0, 0.0)),
            (Vec3::new(half, 0.0, -half), Vec2::new(1.0, 0.0)),
            (Vec3::new(half, 0.0, half), Vec2::new(1.0, 1.0)),
            (Vec3::new(-half, 0.0, half), Vec2::new(0.0, 1.0)),
        ];

        Self {
            vertices: corners
                .into_iter()
                .map(|(position, uv)| Vertex {
                    position,
                    normal: Vec3::NEG_Y,
                    uv,
                })
                .collect(),
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    pub fn create_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let mut mesh = Self::default();

        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let theta = std::f32::consts::TAU * segment as f32 / segments as f32;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

                mesh.vertices.push(Vertex {
                    position: normal * radius,
                    normal,
                    uv: Vec2::new(segment as f32 / segments as f32, ring as f32 / rings as f32),
                });
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                mesh.indices
                    .extend([current, next, current + 1, current + 1, next, next + 1]);
            }
        }

        mesh
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Axis-aligned bounds (min, max) in local space
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_geometry() {
        let cube = Mesh::create_cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.bounds(), Some((Vec3::splat(-0.5), Vec3::splat(0.5))));

        for vertex in &cube.vertices {
            // Every vertex sits on the face its normal points out of
            assert!((vertex.position.dot(vertex.normal) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quad_and_sphere() {
        let quad = Mesh::create_quad(2.0);
        assert_eq!(quad.bounds(), Some((Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0))));

        let sphere = Mesh::create_sphere(1.0, 8, 4);
        assert_eq!(sphere.vertices.len(), 9 * 5);
        assert_eq!(sphere.indices.len(), 8 * 4 * 6);
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertices.len()));
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert_eq!(Mesh::default().bounds(), None);
    }
}
