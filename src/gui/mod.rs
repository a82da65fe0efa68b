use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::model::orrery::Orrery;

mod camera;
mod controller;
mod renderers;
mod view;

pub use camera::FlyCamera;

/// The frame loop: each frame, input is handled, every body is advanced by
/// the frame's (scaled) wall-clock time, and then every body is drawn.
pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    /// Needs a live window, since this uploads every mesh to the GPU.
    pub fn new(orrery: Orrery, time_scale: f64) -> Self {
        Self {
            view: View::new(orrery),
            controller: Controller::new(time_scale),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(&event.value);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        let timestep = self.controller.next_timestep();
        if !self.controller.is_paused() {
            self.view.update_state_by(timestep);
        }
        self.view.prerender_scene(window, &self.controller);
        self.controller.increment_frame_counter();
    }
}
