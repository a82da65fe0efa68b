use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};
use log::debug;
use nalgebra::{Matrix4, Point3};

use crate::math::sphere::SphereMesh;
use crate::model::orrery::BodyID;

// One body's mesh, unrolled into a flat triangle list so it can be drawn
// with `draw_arrays`.
struct GpuMesh {
    positions: GPUVec<Point3<f32>>,
    colors: GPUVec<Point3<f32>>,
}

impl GpuMesh {
    fn new(mesh: &SphereMesh) -> Self {
        let mut positions = Vec::with_capacity(mesh.indices().len());
        let mut colors = Vec::with_capacity(mesh.indices().len());
        for triangle in mesh.triangles() {
            for vertex in triangle {
                positions.push(vertex.position);
                colors.push(vertex.color);
            }
        }

        GpuMesh {
            positions: GPUVec::new(positions, BufferType::Array, AllocationType::StaticDraw),
            colors: GPUVec::new(colors, BufferType::Array, AllocationType::StaticDraw),
        }
    }
}

/// Draws body meshes with per-vertex colours. Meshes are uploaded once with
/// `upload`; each frame, `draw_body` queues a body at a given transform and
/// `render` draws (and clears) the queue.
pub struct BodyRenderer {
    // OpenGL stuff
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    model: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    // Data storage
    meshes: HashMap<BodyID, GpuMesh>,
    queued: Vec<(BodyID, Matrix4<f32>)>,
}

impl BodyRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        BodyRenderer {
            position: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            model: shader
                .get_uniform::<Matrix4<f32>>("model")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            shader,
            meshes: HashMap::new(),
            queued: vec![],
        }
    }

    pub fn upload(&mut self, id: BodyID, mesh: &SphereMesh) {
        debug!(
            "Uploading mesh for {:?} ({} triangles)",
            id,
            mesh.indices().len() / 3
        );
        self.meshes.insert(id, GpuMesh::new(mesh));
    }

    /// Drops the GPU copy of a body's mesh. Does nothing if there isn't one.
    pub fn remove(&mut self, id: BodyID) {
        self.queued.retain(|(queued_id, _)| *queued_id != id);
        if self.meshes.remove(&id).is_some() {
            debug!("Dropped mesh for {:?}", id);
        }
    }

    pub fn clear(&mut self) {
        self.queued.clear();
        self.meshes.clear();
    }

    pub fn has_mesh(&self, id: BodyID) -> bool {
        self.meshes.contains_key(&id)
    }

    pub fn draw_body(&mut self, id: BodyID, transform: Matrix4<f32>) {
        self.queued.push((id, transform));
    }
}

impl Renderer for BodyRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.queued.is_empty() {
            return;
        }

        self.shader.use_program();
        self.position.enable();
        self.color.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let ctxt = Context::get();
        ctxt.enable(Context::DEPTH_TEST);

        for (id, transform) in self.queued.iter() {
            let mesh = match self.meshes.get_mut(id) {
                Some(mesh) => mesh,
                None => continue,
            };

            self.model.upload(transform);
            self.position.bind_sub_buffer(&mut mesh.positions, 0, 0);
            self.color.bind_sub_buffer(&mut mesh.colors, 0, 0);

            ctxt.draw_arrays(Context::TRIANGLES, 0, mesh.positions.len() as i32);
        }

        self.position.disable();
        self.color.disable();

        self.queued.clear();
    }
}

/// Vertex shader: places each vertex in the world and passes its colour on.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    uniform   mat4 proj;
    uniform   mat4 view;
    uniform   mat4 model;
    varying   vec3 v_color;

    void main() {
        gl_Position = proj * view * model * vec4(position, 1.0);
        v_color = color;
    }";

/// Fragment shader: flat per-vertex colour, interpolated across the face.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 v_color;
    void main() {
        gl_FragColor = vec4(v_color, 1.0);
    }";
