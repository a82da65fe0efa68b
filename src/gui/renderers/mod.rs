mod body_renderer;

pub use body_renderer::BodyRenderer;
