use nalgebra::Point3;

use super::body::{Ancestors, BodyID, BodyInfo, BodyKind, CelestialBody};
use super::orbit::CircularOrbit;
use super::sphere::SelfRotatingSphere;
use crate::error::{OrreryError, Result};
use crate::math::sphere::SphereResolution;

/// A body that is always attached to a parent. With an orbital period it
/// circles the parent; without one it sits exactly on top of it.
#[derive(Debug, Clone)]
pub struct Moon {
    sphere: SelfRotatingSphere,
    orbit: CircularOrbit,
    parent: BodyID,
}

impl Moon {
    /// Fails with `InvalidConfiguration` if `parent` is `None`.
    pub fn new(
        info: BodyInfo,
        parent: Option<BodyID>,
        orbital_radius: f64,
        orbital_period: f64,
        rotation_period: f64,
        resolution: SphereResolution,
    ) -> Result<Self> {
        let parent = parent.ok_or_else(|| {
            OrreryError::config(format!("moon {} must orbit a parent body", info.name))
        })?;
        let orbit = CircularOrbit::new(orbital_radius, orbital_period)?;
        let sphere =
            SelfRotatingSphere::new(info, Point3::origin(), rotation_period, resolution)?;
        Ok(Moon {
            sphere,
            orbit,
            parent,
        })
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }
}

impl CelestialBody for Moon {
    fn sphere(&self) -> &SelfRotatingSphere {
        &self.sphere
    }

    fn sphere_mut(&mut self) -> &mut SelfRotatingSphere {
        &mut self.sphere
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Moon
    }

    fn parent(&self) -> Option<BodyID> {
        Some(self.parent)
    }

    fn orbital_angle(&self) -> Option<f64> {
        Some(self.orbit.angle())
    }

    fn update(&mut self, delta_time: f64, ancestors: &Ancestors<'_>) {
        self.sphere.spin(delta_time);

        let parent_position = ancestors.position_of(self.parent);
        if self.orbit.is_active() {
            self.orbit.advance(delta_time);
            self.sphere
                .set_position(parent_position + self.orbit.offset());
        } else {
            self.sphere.set_position(parent_position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    fn planet_at(position: Point3<f64>) -> Vec<Box<dyn CelestialBody>> {
        let planet = SelfRotatingSphere::new(
            BodyInfo::new("Mars", 1.0, None),
            position,
            0.0,
            SphereResolution::default(),
        )
        .unwrap();
        vec![Box::new(planet)]
    }

    fn make_moon(parent: Option<BodyID>, radius: f64, period: f64) -> Result<Moon> {
        Moon::new(
            BodyInfo::new("Phobos", 0.1, Some(Point3::new(0.5, 0.45, 0.4))),
            parent,
            radius,
            period,
            0.318,
            SphereResolution::default(),
        )
    }

    #[test]
    fn test_requires_parent() {
        assert!(matches!(
            make_moon(None, 1.0, 1.0),
            Err(OrreryError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            make_moon(None, 0.0, 0.0),
            Err(OrreryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_orbits_parent() {
        let bodies = planet_at(Point3::new(0.0, 3.0, 10.0));
        let mut moon = make_moon(Some(BodyID(0)), 1.0, 4.0).unwrap();
        moon.update(5.0, &Ancestors::new(&bodies));
        assert_abs_diff_eq!(moon.position(), Point3::new(0.0, 3.0, 11.0), epsilon = 1e-9);
        assert_eq!(moon.parent(), Some(BodyID(0)));
    }

    #[test]
    #[should_panic(expected = "before it was updated")]
    fn test_parent_must_be_in_ancestors() {
        // Only the body at index 0 has been updated
        let bodies = planet_at(Point3::origin());
        let mut moon = make_moon(Some(BodyID(1)), 1.0, 4.0).unwrap();
        moon.update(1.0, &Ancestors::new(&bodies));
    }

    #[test]
    fn test_no_orbit_snaps_to_parent() {
        let bodies = planet_at(Point3::new(-6.0, 1.0, 2.0));
        let mut moon = make_moon(Some(BodyID(0)), 3.0, 0.0).unwrap();
        moon.set_position(Point3::new(100.0, 100.0, 100.0));
        moon.update(0.5, &Ancestors::new(&bodies));
        assert_eq!(moon.position(), Point3::new(-6.0, 1.0, 2.0));
        assert_eq!(moon.orbital_angle(), Some(0.0));
    }
}
