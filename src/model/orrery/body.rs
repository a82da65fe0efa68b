use std::fmt::Debug;

use nalgebra::{Matrix4, Point3, Vector3};

use super::sphere::SelfRotatingSphere;
use crate::math::sphere::SphereMesh;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub radius: f32,
    pub color: Point3<f32>,
}

impl BodyInfo {
    pub fn new(name: impl Into<String>, radius: f32, color: Option<Point3<f32>>) -> Self {
        BodyInfo {
            name: name.into(),
            radius,
            color: color.unwrap_or_else(|| Point3::new(0.5, 0.5, 0.5)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

/// Read-only view of the bodies that have already been updated this frame.
/// A body can only ever look up its parent through this, so a parent that
/// hasn't been updated yet (or doesn't exist) can't be observed.
#[derive(Clone, Copy)]
pub struct Ancestors<'a> {
    bodies: &'a [Box<dyn CelestialBody>],
}

impl<'a> Ancestors<'a> {
    pub fn new(bodies: &'a [Box<dyn CelestialBody>]) -> Self {
        Ancestors { bodies }
    }

    pub fn none() -> Ancestors<'static> {
        Ancestors { bodies: &[] }
    }

    /// This frame's position of an already-updated body.
    ///
    /// # Panics
    ///
    /// If `id` is not in the view, i.e. the parent hasn't been updated yet or
    /// doesn't exist. `Orrery` never lets that happen; callers driving
    /// `CelestialBody::update` by hand must pass every parent in.
    pub fn position_of(&self, id: BodyID) -> Point3<f64> {
        match self.bodies.get(id.0) {
            Some(body) => body.position(),
            None => panic!(
                "{:?} was read before it was updated; parents must come before their children",
                id
            ),
        }
    }
}

/// Everything the scene needs from a body. Every body is built around a
/// `SelfRotatingSphere`, which supplies the default implementations; a
/// variant only has to say how it moves.
pub trait CelestialBody: Debug {
    fn sphere(&self) -> &SelfRotatingSphere;
    fn sphere_mut(&mut self) -> &mut SelfRotatingSphere;

    fn kind(&self) -> BodyKind;

    /// Advances the body by `delta_time` seconds. Parent positions are read
    /// from `ancestors`, which must already hold this frame's values.
    ///
    /// # Panics
    ///
    /// If the body has a parent that `ancestors` doesn't contain.
    fn update(&mut self, delta_time: f64, ancestors: &Ancestors<'_>);

    fn parent(&self) -> Option<BodyID> {
        None
    }

    /// Current phase of the orbit, for bodies that have one.
    fn orbital_angle(&self) -> Option<f64> {
        None
    }

    fn info(&self) -> &BodyInfo {
        self.sphere().info()
    }

    fn position(&self) -> Point3<f64> {
        self.sphere().position()
    }

    fn set_position(&mut self, position: Point3<f64>) {
        self.sphere_mut().set_position(position)
    }

    fn rotation_degrees(&self) -> Vector3<f64> {
        self.sphere().rotation_degrees()
    }

    fn world_transform(&self) -> Matrix4<f64> {
        self.sphere().world_transform()
    }

    /// `None` once the body has been released.
    fn mesh(&self) -> Option<&SphereMesh> {
        self.sphere().mesh()
    }

    fn release(&mut self) {
        self.sphere_mut().release()
    }
}
