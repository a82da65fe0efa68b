use log::{debug, info, warn};
use nalgebra::Point3;

use crate::error::{OrreryError, Result};
use crate::math::sphere::SphereResolution;

mod body;
mod moon;
mod orbit;
mod planet;
mod sphere;

pub use body::{Ancestors, BodyID, BodyInfo, BodyKind, CelestialBody};
pub use moon::Moon;
pub use orbit::CircularOrbit;
pub use planet::Planet;
pub use sphere::SelfRotatingSphere;

/// Owns every body in the system, in update order.
///
/// Bodies can only name parents that are already in the orrery, so insertion
/// order is always a valid parents-before-children order. `update_by` walks
/// the bodies in that order and hands each one the slice of bodies before it,
/// so a child always sees its parent's position for the current frame.
#[derive(Debug)]
pub struct Orrery {
    bodies: Vec<Box<dyn CelestialBody>>,
    resolution: SphereResolution,
    time: f64,
}

impl Orrery {
    pub fn new() -> Self {
        Self::with_resolution(SphereResolution::default())
    }

    pub fn with_resolution(resolution: SphereResolution) -> Self {
        Orrery {
            bodies: vec![],
            resolution,
            time: 0.0,
        }
    }

    pub fn resolution(&self) -> SphereResolution {
        self.resolution
    }

    /// Total simulated time, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Adds a body fixed at the origin that only spins.
    pub fn add_star(&mut self, info: BodyInfo, rotation_period: f64) -> Result<BodyID> {
        let star =
            SelfRotatingSphere::new(info, Point3::origin(), rotation_period, self.resolution)?;
        Ok(self.insert_new_body(Box::new(star)))
    }

    pub fn add_planet(
        &mut self,
        info: BodyInfo,
        parent: Option<BodyID>,
        orbital_radius: f64,
        orbital_period: f64,
        rotation_period: f64,
    ) -> Result<BodyID> {
        if let Some(id) = parent {
            self.check_parent(id, &info)?;
        }
        let planet = Planet::new(
            info,
            parent,
            orbital_radius,
            orbital_period,
            rotation_period,
            self.resolution,
        )?;
        Ok(self.insert_new_body(Box::new(planet)))
    }

    pub fn add_moon(
        &mut self,
        info: BodyInfo,
        parent: Option<BodyID>,
        orbital_radius: f64,
        orbital_period: f64,
        rotation_period: f64,
    ) -> Result<BodyID> {
        if let Some(id) = parent {
            self.check_parent(id, &info)?;
        }
        let moon = Moon::new(
            info,
            parent,
            orbital_radius,
            orbital_period,
            rotation_period,
            self.resolution,
        )?;
        Ok(self.insert_new_body(Box::new(moon)))
    }

    fn check_parent(&self, id: BodyID, info: &BodyInfo) -> Result<()> {
        if id.0 >= self.bodies.len() {
            return Err(OrreryError::config(format!(
                "{} refers to unknown parent {:?}",
                info.name, id
            )));
        }
        Ok(())
    }

    fn insert_new_body(&mut self, mut body: Box<dyn CelestialBody>) -> BodyID {
        let id = BodyID(self.bodies.len());

        // Resolve the starting position against the parent's current one
        body.update(0.0, &Ancestors::new(&self.bodies));
        debug!(
            "Added {:?} {} as {:?} at {:?}",
            body.kind(),
            body.info().name,
            id,
            body.position()
        );

        self.bodies.push(body);
        id
    }

    /// Advances every body by `delta_time` seconds, parents first.
    pub fn update_by(&mut self, delta_time: f64) {
        if !delta_time.is_finite() {
            warn!("Ignoring non-finite time step {}", delta_time);
            return;
        }

        for idx in 0..self.bodies.len() {
            let (updated, rest) = self.bodies.split_at_mut(idx);
            rest[0].update(delta_time, &Ancestors::new(updated));
        }
        self.time += delta_time;
    }

    pub fn get_body(&self, id: BodyID) -> &dyn CelestialBody {
        &*self.bodies[id.0]
    }

    pub fn get_body_mut(&mut self, id: BodyID) -> &mut dyn CelestialBody {
        &mut *self.bodies[id.0]
    }

    /// All bodies, in update order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyID, &dyn CelestialBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(idx, body)| (BodyID(idx), &**body))
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.bodies()
            .find(|(_, body)| body.info().name.eq_ignore_ascii_case(name))
            .map(|(id, _)| id)
    }

    pub fn parent_of(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[id.0].parent()
    }

    pub fn children_of(&self, id: BodyID) -> impl Iterator<Item = BodyID> + '_ {
        self.bodies()
            .filter(move |(_, body)| body.parent() == Some(id))
            .map(|(child, _)| child)
    }

    /// Frees every body's mesh. Safe to call more than once.
    pub fn release_all(&mut self) {
        let live = self
            .bodies
            .iter()
            .filter(|body| body.mesh().is_some())
            .count();
        for body in self.bodies.iter_mut() {
            body.release();
        }
        if live > 0 {
            info!("Released {} of {} bodies", live, self.bodies.len());
        }
    }
}

impl Default for Orrery {
    fn default() -> Self {
        Self::new()
    }
}
