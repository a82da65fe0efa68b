use std::f32::consts::{FRAC_PI_2, PI, TAU};

use nalgebra::Point3;

use crate::error::{OrreryError, Result};

/// How finely a sphere is cut up. Stacks are latitude bands, running from the
/// north pole (stack 0) to the south pole; sectors are longitude slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereResolution {
    stacks: u32,
    sectors: u32,
}

impl SphereResolution {
    pub const MIN_STACKS: u32 = 2;
    pub const MIN_SECTORS: u32 = 3;
    /// Far below what a `u32` index buffer can address.
    pub const MAX_VERTICES: u64 = 1 << 24;

    pub fn new(stacks: u32, sectors: u32) -> Result<Self> {
        if stacks < Self::MIN_STACKS || sectors < Self::MIN_SECTORS {
            return Err(OrreryError::geometry(format!(
                "sphere needs at least {} stacks and {} sectors, got {}x{}",
                Self::MIN_STACKS,
                Self::MIN_SECTORS,
                stacks,
                sectors
            )));
        }

        let vertices = (u64::from(stacks) + 1).checked_mul(u64::from(sectors) + 1);
        if vertices.map_or(true, |n| n > Self::MAX_VERTICES) {
            return Err(OrreryError::geometry(format!(
                "a {}x{} sphere would need more than {} vertices",
                stacks,
                sectors,
                Self::MAX_VERTICES
            )));
        }
        Ok(SphereResolution { stacks, sectors })
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    /// Poles are duplicated once per sector, so every row has `sectors + 1`
    /// vertices, including the seam.
    pub fn vertex_count(&self) -> usize {
        (self.stacks as usize + 1) * (self.sectors as usize + 1)
    }

    /// Two triangles per quad, minus the zero-area row at each pole.
    pub fn triangle_count(&self) -> usize {
        2 * self.stacks as usize * self.sectors as usize - 2 * self.sectors as usize
    }

    pub fn index_count(&self) -> usize {
        3 * self.triangle_count()
    }
}

impl Default for SphereResolution {
    fn default() -> Self {
        SphereResolution {
            stacks: 24,
            sectors: 48,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Point3<f32>,
}

/// A UV sphere centered on the origin, with per-vertex colors and a flat
/// triangle list.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    radius: f32,
    resolution: SphereResolution,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl SphereMesh {
    pub fn generate(
        radius: f32,
        base_color: &Point3<f32>,
        resolution: SphereResolution,
    ) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OrreryError::geometry(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        if base_color.iter().any(|c| !c.is_finite()) {
            return Err(OrreryError::geometry(format!(
                "sphere color must be finite, got {:?}",
                base_color
            )));
        }

        let stacks = resolution.stacks;
        let sectors = resolution.sectors;
        let stack_step = PI / stacks as f32;
        let sector_step = TAU / sectors as f32;

        let mut vertices = Vec::with_capacity(resolution.vertex_count());
        for i in 0..=stacks {
            // pi/2 at the north pole, -pi/2 at the south pole
            let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
            let ring_radius = radius * stack_angle.cos();
            let height = radius * stack_angle.sin();

            for j in 0..=sectors {
                // The last column is the same meridian as the first; use the
                // exact same angle so the seam matches bit for bit.
                let sector_angle = (j % sectors) as f32 * sector_step;
                vertices.push(Vertex {
                    position: Point3::new(
                        ring_radius * sector_angle.cos(),
                        height,
                        ring_radius * sector_angle.sin(),
                    ),
                    color: shade(base_color, stack_angle, sector_angle),
                });
            }
        }

        let mut indices = Vec::with_capacity(resolution.index_count());
        for i in 0..stacks {
            let mut k1 = i * (sectors + 1);
            let mut k2 = k1 + sectors + 1;

            for _ in 0..sectors {
                if i != 0 {
                    indices.extend_from_slice(&[k1, k2, k1 + 1]);
                }
                if i != stacks - 1 {
                    indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
                }
                k1 += 1;
                k2 += 1;
            }
        }

        debug_assert_eq!(vertices.len(), resolution.vertex_count());
        debug_assert_eq!(indices.len(), resolution.index_count());

        Ok(SphereMesh {
            radius,
            resolution,
            vertices,
            indices,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn resolution(&self) -> SphereResolution {
        self.resolution
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}

// Cosmetic banding: each channel is dimmed by up to 20% depending on where
// the vertex sits. Only depends on the base color and the two angles.
fn shade(base_color: &Point3<f32>, stack_angle: f32, sector_angle: f32) -> Point3<f32> {
    let band = |wave: f32| 0.8 + 0.2 * (wave + 1.0) / 2.0;
    let r = base_color.x * band(stack_angle.cos());
    let g = base_color.y * band(sector_angle.cos());
    let b = base_color.z * band((2.0 * stack_angle).sin());
    Point3::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn gray() -> Point3<f32> {
        Point3::new(0.5, 0.5, 0.5)
    }

    #[test]
    fn test_buffer_sizes() {
        for (stacks, sectors) in [(2, 3), (3, 4), (24, 48), (10, 7)] {
            let resolution = SphereResolution::new(stacks, sectors).unwrap();
            let mesh = SphereMesh::generate(1.0, &gray(), resolution).unwrap();

            let (s, t) = (stacks as usize, sectors as usize);
            assert_eq!(mesh.vertices().len(), (s + 1) * (t + 1));
            assert_eq!(mesh.indices().len(), 6 * s * t - 6 * t);
            assert_eq!(mesh.triangles().count(), 2 * s * t - 2 * t);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = SphereMesh::generate(3.0, &gray(), SphereResolution::default()).unwrap();
        let n = mesh.vertices().len() as u32;
        assert!(mesh.indices().iter().all(|&k| k < n));
    }

    #[test]
    fn test_vertices_on_surface() {
        let mesh = SphereMesh::generate(2.5, &gray(), SphereResolution::default()).unwrap();
        for v in mesh.vertices() {
            assert_relative_eq!(v.position.coords.norm(), 2.5, max_relative = 1e-5);
        }

        // Row 0 is the north pole, the last row is the south pole
        let row = SphereResolution::default().sectors() as usize + 1;
        for v in &mesh.vertices()[..row] {
            assert_relative_eq!(v.position.y, 2.5, max_relative = 1e-6);
        }
        for v in &mesh.vertices()[mesh.vertices().len() - row..] {
            assert_relative_eq!(v.position.y, -2.5, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_no_degenerate_triangles() {
        let mesh = SphereMesh::generate(1.0, &gray(), SphereResolution::default()).unwrap();
        for [a, b, c] in mesh.triangles() {
            let area = (b.position - a.position)
                .cross(&(c.position - a.position))
                .norm();
            assert!(area > 1e-6, "zero-area triangle {:?} {:?} {:?}", a, b, c);
        }
    }

    #[test]
    fn test_seam_matches() {
        let resolution = SphereResolution::new(8, 12).unwrap();
        let mesh =
            SphereMesh::generate(1.0, &Point3::new(0.9, 0.3, 0.6), resolution).unwrap();
        let row = resolution.sectors() as usize + 1;
        for stack in mesh.vertices().chunks(row) {
            assert_eq!(stack[0], stack[row - 1]);
        }
    }

    #[test]
    fn test_colors_clamped() {
        let resolution = SphereResolution::new(6, 6).unwrap();
        let mesh =
            SphereMesh::generate(1.0, &Point3::new(3.0, -1.0, 1.0), resolution).unwrap();
        for v in mesh.vertices() {
            assert!(v.color.iter().all(|c| (0.0..=1.0).contains(c)));
        }
        // Red is saturated everywhere, green is always clamped to zero
        assert!(mesh.vertices().iter().all(|v| v.color.x == 1.0));
        assert!(mesh.vertices().iter().all(|v| v.color.y == 0.0));
    }

    #[test]
    fn test_colors_depend_only_on_base_color() {
        let color = Point3::new(0.2, 0.5, 0.8);
        let a = SphereMesh::generate(1.0, &color, SphereResolution::default()).unwrap();
        let b = SphereMesh::generate(7.0, &color, SphereResolution::default()).unwrap();
        for (u, v) in a.vertices().iter().zip(b.vertices()) {
            assert_eq!(u.color, v.color);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                SphereMesh::generate(radius, &gray(), SphereResolution::default()),
                Err(OrreryError::InvalidGeometry(_))
            ));
        }
        assert!(matches!(
            SphereMesh::generate(1.0, &Point3::new(f32::NAN, 0.0, 0.0), Default::default()),
            Err(OrreryError::InvalidGeometry(_))
        ));
        assert!(SphereResolution::new(1, 48).is_err());
        assert!(SphereResolution::new(24, 2).is_err());
    }

    #[test]
    fn test_resolution_upper_bound() {
        for (stacks, sectors) in [(2, u32::MAX), (u32::MAX, 3), (u32::MAX, u32::MAX), (4096, 4096)] {
            assert!(
                matches!(
                    SphereResolution::new(stacks, sectors),
                    Err(OrreryError::InvalidGeometry(_))
                ),
                "{}x{} was accepted",
                stacks,
                sectors
            );
        }

        // Exactly at the limit is fine, and every index fits in a u32
        let largest = SphereResolution::new(4095, 4095).unwrap();
        assert_eq!(largest.vertex_count() as u64, SphereResolution::MAX_VERTICES);
        assert!(largest.vertex_count() <= u32::MAX as usize);
    }
}
