use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

use super::body::{Ancestors, BodyInfo, BodyKind, CelestialBody};
use crate::error::{OrreryError, Result};
use crate::math::sphere::{SphereMesh, SphereResolution};
use crate::math::transform::world_transform;

/// A sphere that spins about its own Y axis. On its own it never moves, which
/// makes it the natural root of a system; orbiting bodies embed one.
#[derive(Debug, Clone)]
pub struct SelfRotatingSphere {
    info: BodyInfo,
    position: Point3<f64>,
    // Euler angles, in degrees
    rotation: Vector3<f64>,
    scale: f64,
    // Seconds per full turn; negative spins the other way
    rotation_period: f64,
    self_rotation: bool,
    mesh: Option<SphereMesh>,
}

impl SelfRotatingSphere {
    pub fn new(
        info: BodyInfo,
        position: Point3<f64>,
        rotation_period: f64,
        resolution: SphereResolution,
    ) -> Result<Self> {
        if !rotation_period.is_finite() {
            return Err(OrreryError::config(format!(
                "{}: rotation period must be finite, got {}",
                info.name, rotation_period
            )));
        }

        let mesh = SphereMesh::generate(info.radius, &info.color, resolution)?;
        debug!(
            "Generated {}x{} sphere for {} ({} triangles)",
            resolution.stacks(),
            resolution.sectors(),
            info.name,
            mesh.indices().len() / 3
        );

        Ok(SelfRotatingSphere {
            info,
            position,
            rotation: Vector3::zeros(),
            scale: 1.0,
            rotation_period,
            self_rotation: rotation_period != 0.0,
            mesh: Some(mesh),
        })
    }

    pub fn info(&self) -> &BodyInfo {
        &self.info
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    pub fn rotation_degrees(&self) -> Vector3<f64> {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rotation_period(&self) -> f64 {
        self.rotation_period
    }

    pub fn is_self_rotating(&self) -> bool {
        self.self_rotation
    }

    /// Adds to the current rotation, in degrees.
    pub fn rotate(&mut self, delta_degrees: &Vector3<f64>) {
        self.rotation += delta_degrees;
    }

    /// Turns the sphere about Y by however far it spins in `delta_time`.
    /// X and Z are left alone. Y is kept in (-360, 360).
    pub fn spin(&mut self, delta_time: f64) {
        if !self.self_rotation {
            return;
        }
        // Whole turns are dropped from both the step and the result, so the
        // angle stays within one turn of zero (keeping its sign)
        let turns = (delta_time % self.rotation_period) / self.rotation_period;
        self.rotation.y = (self.rotation.y + 360.0 * turns) % 360.0;
    }

    pub fn world_transform(&self) -> Matrix4<f64> {
        world_transform(&self.position, &self.rotation, self.scale)
    }

    pub fn mesh(&self) -> Option<&SphereMesh> {
        self.mesh.as_ref()
    }

    /// Drops the mesh. Calling this again is a no-op.
    pub fn release(&mut self) {
        if self.mesh.take().is_some() {
            debug!("Released mesh for {}", self.info.name);
        }
    }
}

impl CelestialBody for SelfRotatingSphere {
    fn sphere(&self) -> &SelfRotatingSphere {
        self
    }

    fn sphere_mut(&mut self) -> &mut SelfRotatingSphere {
        self
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Star
    }

    fn update(&mut self, delta_time: f64, _: &Ancestors<'_>) {
        self.spin(delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn make_sphere(rotation_period: f64) -> SelfRotatingSphere {
        SelfRotatingSphere::new(
            BodyInfo::new("Sun", 2.0, None),
            Point3::new(1.0, 2.0, 3.0),
            rotation_period,
            SphereResolution::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_spin() {
        let mut sphere = make_sphere(60.0);
        assert!(sphere.is_self_rotating());
        assert_eq!(sphere.rotation_period(), 60.0);

        sphere.update(15.0, &Ancestors::none());
        assert_relative_eq!(sphere.rotation_degrees(), Vector3::new(0.0, 90.0, 0.0));

        // Whole turns are dropped
        sphere.update(60.0, &Ancestors::none());
        assert_relative_eq!(sphere.rotation_degrees(), Vector3::new(0.0, 90.0, 0.0));
        sphere.update(45.0, &Ancestors::none());
        assert_relative_eq!(sphere.rotation_degrees(), Vector3::new(0.0, 0.0, 0.0));

        // Spinning never moves the sphere
        assert_eq!(sphere.position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_spin_keeps_other_axes() {
        let mut sphere = make_sphere(10.0);
        sphere.rotate(&Vector3::new(15.0, 0.0, -30.0));
        sphere.spin(2.5);
        assert_relative_eq!(sphere.rotation_degrees(), Vector3::new(15.0, 90.0, -30.0));
    }

    #[test]
    fn test_negative_period_spins_backwards() {
        let mut sphere = make_sphere(-60.0);
        sphere.spin(15.0);
        assert_relative_eq!(sphere.rotation_degrees(), Vector3::new(0.0, -90.0, 0.0));
    }

    #[test]
    fn test_huge_step_tiny_period() {
        let mut sphere = make_sphere(1e-10);
        sphere.spin(1e300);
        let y = sphere.rotation_degrees().y;
        assert!(y.is_finite() && y.abs() < 360.0, "spun to {}", y);
        assert!(sphere.world_transform().iter().all(|c| c.is_finite()));

        let mut sphere = make_sphere(-1e-10);
        sphere.spin(f64::MAX);
        assert!(sphere.rotation_degrees().y.abs() < 360.0);
    }

    #[test]
    fn test_zero_period_disables_spin() {
        let mut sphere = make_sphere(0.0);
        assert!(!sphere.is_self_rotating());
        for _ in 0..100 {
            sphere.spin(0.37);
        }
        assert_eq!(sphere.rotation_degrees(), Vector3::zeros());
    }

    #[test]
    fn test_defaults() {
        let sphere = make_sphere(1.0);
        assert_eq!(sphere.info().color, Point3::new(0.5, 0.5, 0.5));
        assert_eq!(sphere.scale(), 1.0);
        assert_eq!(sphere.kind(), BodyKind::Star);
        assert_eq!(sphere.parent(), None);
        assert_eq!(
            sphere.mesh().map(|m| m.radius()),
            Some(2.0),
        );
    }

    #[test]
    fn test_release_twice() {
        let mut sphere = make_sphere(1.0);
        assert!(sphere.mesh().is_some());
        sphere.release();
        assert!(sphere.mesh().is_none());
        sphere.release();
        assert!(sphere.mesh().is_none());

        // The body is still usable after release
        sphere.spin(0.25);
        assert_relative_eq!(sphere.rotation_degrees().y, 90.0);
    }

    #[test]
    fn test_bad_construction() {
        let result = SelfRotatingSphere::new(
            BodyInfo::new("Nothing", 0.0, None),
            Point3::origin(),
            1.0,
            SphereResolution::default(),
        );
        assert!(matches!(result, Err(OrreryError::InvalidGeometry(_))));

        let result = SelfRotatingSphere::new(
            BodyInfo::new("Spinning", 1.0, None),
            Point3::origin(),
            f64::NAN,
            SphereResolution::default(),
        );
        assert!(matches!(result, Err(OrreryError::InvalidConfiguration(_))));
    }
}
