use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::Window;
use nalgebra::{Matrix4, Point2, Point3};

use super::camera::FlyCamera;
use super::controller::Controller;
use super::renderers::BodyRenderer;
use crate::model::orrery::Orrery;

pub struct View {
    orrery: Orrery,
    camera: FlyCamera,
    renderer: BodyRenderer,
}

impl View {
    pub fn new(orrery: Orrery) -> Self {
        // Frame the whole system: the farthest body plus its own radius
        let extent = orrery
            .bodies()
            .map(|(_, body)| body.position().coords.norm() as f32 + body.info().radius)
            .fold(0.0, f32::max);
        let camera = FlyCamera::overlooking(extent);

        let mut renderer = BodyRenderer::new();
        for (id, body) in orrery.bodies() {
            if let Some(mesh) = body.mesh() {
                renderer.upload(id, mesh);
            }
        }

        Self {
            orrery,
            camera,
            renderer,
        }
    }

    pub fn update_state_by(&mut self, timestep: f64) {
        self.orrery.update_by(timestep);
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        for (id, body) in self.orrery.bodies() {
            if body.mesh().is_none() {
                // Released since the last frame
                if self.renderer.has_mesh(id) {
                    self.renderer.remove(id);
                }
                continue;
            }
            let transform: Matrix4<f32> = nalgebra::convert(body.world_transform());
            self.renderer.draw_body(id, transform);
        }

        // Draw text
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.overlay_text(controller),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn overlay_text(&self, controller: &Controller) -> String {
        format!(
            "Time: {}
Time scale: {}x{}
FPS: {:.0}
Bodies: {}",
            format_seconds(self.orrery.time()),
            controller.time_scale(),
            if controller.is_paused() { " (paused)" } else { "" },
            controller.fps(),
            self.orrery.len(),
        )
    }

    /// Frees every body's mesh, on the CPU and the GPU. Safe to call more
    /// than once.
    pub fn release(&mut self) {
        self.orrery.release_all();
        self.renderer.clear();
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

impl Drop for View {
    fn drop(&mut self) {
        self.release();
    }
}

fn format_seconds(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let mut total_seconds = seconds.abs() as u64;
    let n_minutes = 60;
    let n_hours = n_minutes * 60;
    let n_days = n_hours * 24;

    macro_rules! count_and_remainder {
        ($variable:ident, $divisor:expr) => {
            let $variable = total_seconds / $divisor;
            total_seconds %= $divisor;
        };
    }

    count_and_remainder!(days, n_days);
    count_and_remainder!(hours, n_hours);
    count_and_remainder!(minutes, n_minutes);

    format!(
        "{}{}d, {:02}:{:02}:{:02}",
        sign, days, hours, minutes, total_seconds
    )
}
