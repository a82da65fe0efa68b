use nalgebra::{Point3, Vector3};

use super::body::{Ancestors, BodyID, BodyInfo, BodyKind, CelestialBody};
use super::orbit::CircularOrbit;
use super::sphere::SelfRotatingSphere;
use crate::error::Result;
use crate::math::sphere::SphereResolution;

/// A body that circles a parent, if it has one. Without a parent it circles
/// the world origin instead; without an orbital period it sits exactly on
/// whatever it would have circled.
#[derive(Debug, Clone)]
pub struct Planet {
    sphere: SelfRotatingSphere,
    orbit: CircularOrbit,
    parent: Option<BodyID>,
    // Offset from the parent as of the last update
    relative_position: Vector3<f64>,
}

impl Planet {
    pub fn new(
        info: BodyInfo,
        parent: Option<BodyID>,
        orbital_radius: f64,
        orbital_period: f64,
        rotation_period: f64,
        resolution: SphereResolution,
    ) -> Result<Self> {
        let orbit = CircularOrbit::new(orbital_radius, orbital_period)?;
        let sphere =
            SelfRotatingSphere::new(info, Point3::origin(), rotation_period, resolution)?;
        Ok(Planet {
            sphere,
            orbit,
            parent,
            relative_position: Vector3::zeros(),
        })
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }

    pub fn relative_position(&self) -> Vector3<f64> {
        self.relative_position
    }
}

impl CelestialBody for Planet {
    fn sphere(&self) -> &SelfRotatingSphere {
        &self.sphere
    }

    fn sphere_mut(&mut self) -> &mut SelfRotatingSphere {
        &mut self.sphere
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Planet
    }

    fn parent(&self) -> Option<BodyID> {
        self.parent
    }

    fn orbital_angle(&self) -> Option<f64> {
        Some(self.orbit.angle())
    }

    fn update(&mut self, delta_time: f64, ancestors: &Ancestors<'_>) {
        self.sphere.spin(delta_time);

        if self.orbit.is_active() {
            self.orbit.advance(delta_time);
            self.relative_position = self.orbit.offset();
        } else {
            self.relative_position = Vector3::zeros();
        }

        let parent_position = match self.parent {
            Some(id) => ancestors.position_of(id),
            None => Point3::origin(),
        };
        self.sphere
            .set_position(parent_position + self.relative_position);
    }
}
