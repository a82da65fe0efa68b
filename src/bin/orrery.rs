use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use log::info;

use solar_orrery::file::{default_system, read_file};
use solar_orrery::gui::Simulation;
use solar_orrery::math::sphere::SphereResolution;
use solar_orrery::{Orrery, OrreryError};

/// Watch a star, its planets, and their moons go round.
///
/// Fly with WASD, Space and Left Shift; drag with the left mouse button to
/// look around; scroll to change flying speed. P pauses, `.` and `,` speed
/// time up and slow it down, R runs it backwards.
#[derive(Debug, Parser)]
struct Args {
    /// System description to load; the built-in solar system if omitted
    system: Option<PathBuf>,
    /// Simulated seconds per wall-clock second
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    time_scale: f64,
    /// Frame-rate limit
    #[arg(long, default_value_t = 60)]
    fps: u64,
    /// Latitude bands per sphere
    #[arg(long, default_value_t = 24)]
    stacks: u32,
    /// Longitude slices per sphere
    #[arg(long, default_value_t = 48)]
    sectors: u32,
    /// Load the system, print a summary, and exit without opening a window
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !args.time_scale.is_finite() {
        return Err(OrreryError::InvalidConfiguration(format!(
            "time scale must be finite, got {}",
            args.time_scale
        ))
        .into());
    }

    let resolution = SphereResolution::new(args.stacks, args.sectors)?;
    let orrery = match &args.system {
        Some(path) => read_file(path, resolution)?,
        None => default_system(resolution)?,
    };

    if args.validate {
        print_summary(&orrery);
        return Ok(());
    }

    let mut window = Window::new("Solar System");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(args.fps));
    window.set_background_color(0.02, 0.02, 0.05);

    info!(
        "Starting simulation at {}x with {}x{} spheres",
        args.time_scale,
        resolution.stacks(),
        resolution.sectors()
    );
    let simulation = Simulation::new(orrery, args.time_scale);
    window.render_loop(simulation);

    Ok(())
}

fn print_summary(orrery: &Orrery) {
    println!("{} bodies", orrery.len());
    for (id, body) in orrery.bodies() {
        let parent = match orrery.parent_of(id) {
            Some(parent) => orrery.get_body(parent).info().name.as_str(),
            None => "-",
        };
        let position = body.position();
        let spin = match body.sphere().rotation_period() {
            period if period == 0.0 => "no spin".to_string(),
            period => format!("spins every {}s", period),
        };
        println!(
            "- {} ({:?}, radius {}, {}) around {} at ({:.3}, {:.3}, {:.3})",
            body.info().name,
            body.kind(),
            body.info().radius,
            spin,
            parent,
            position.x,
            position.y,
            position.z,
        );
    }
}
