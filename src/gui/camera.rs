use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector2, Vector3};

const KEY_CAMERA_FORWARD: Key = Key::W;
const KEY_CAMERA_BACK: Key = Key::S;
const KEY_CAMERA_LEFT: Key = Key::A;
const KEY_CAMERA_RIGHT: Key = Key::D;
const KEY_CAMERA_UP: Key = Key::Space;
const KEY_CAMERA_DOWN: Key = Key::LShift;

// A first-person camera. The mouse, dragged with the left button held,
// turns the view (yaw and pitch, no roll); the movement keys are polled once
// a frame and slide the eye along the view direction, its right vector, and
// the world's up axis. Scrolling changes how far one frame of movement goes.
//
// The world is Y-up, and the orbital plane is XZ.
pub struct FlyCamera {
    // -- position --
    position: Point3<f32>,
    yaw: f32,   // degrees, measured from +X towards +Z
    pitch: f32, // degrees above the horizon
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    // -- knobs to fiddle with --
    sensitivity: f32,
    move_speed: f32,
    scroll_ratio: f32,
    pitch_limit: f32,
    speed_limits: (f32, f32),
}

impl FlyCamera {
    pub fn new(position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = FlyCamera {
            position,
            yaw,
            pitch: 0.0,
            width: 800,
            height: 600,
            fovy: std::f32::consts::FRAC_PI_4,
            znear: 0.05,
            zfar: 2000.0,
            last_cursor_pos: Vector2::zeros(),
            sensitivity: 0.1,
            move_speed: 0.08,
            scroll_ratio: 1.25,
            pitch_limit: 89.0,
            speed_limits: (0.001, 50.0),
        };
        camera.look(0.0, -pitch / camera.sensitivity);
        camera
    }

    /// Places the camera above and behind the origin, tilted down far enough
    /// to take in everything within `extent` of it.
    pub fn overlooking(extent: f32) -> Self {
        let extent = extent.max(1.0);
        let position = Point3::new(0.0, 0.4 * extent, 1.5 * extent);
        let pitch = -(0.4f32 / 1.5).atan().to_degrees();
        let mut camera = Self::new(position, -90.0, pitch);
        camera.zfar = camera.zfar.max(4.0 * extent);
        camera.move_speed = nalgebra::clamp(
            extent / 500.0,
            camera.speed_limits.0,
            camera.speed_limits.1,
        );
        camera
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.width as f32 / self.height.max(1) as f32,
            self.fovy,
            self.znear,
            self.zfar,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Unit vector the camera is looking along.
    pub fn front(&self) -> Vector3<f32> {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(&Vector3::y()).normalize()
    }

    /// Turns the camera by a mouse motion of `(dx, dy)` pixels. Moving the
    /// mouse up (negative `dy`) looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw = (self.yaw + dx * self.sensitivity) % 360.0;
        self.pitch = nalgebra::clamp(
            self.pitch - dy * self.sensitivity,
            -self.pitch_limit,
            self.pitch_limit,
        );
    }

    /// Moves the eye by `(forward, right, up)` steps of the current speed.
    pub fn translate(&mut self, forward: f32, right: f32, up: f32) {
        let offset = self.front() * forward + self.right() * right + Vector3::y() * up;
        self.position += offset * self.move_speed;
    }

    pub fn scale_speed(&mut self, factor: f32) {
        self.move_speed = nalgebra::clamp(
            self.move_speed * factor,
            self.speed_limits.0,
            self.speed_limits.1,
        );
    }
}

impl Camera for FlyCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    let dpos = curr_pos - self.last_cursor_pos;
                    self.look(dpos.x, dpos.y);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == faster
                if off > 0.0 {
                    self.scale_speed(self.scroll_ratio);
                } else if off < 0.0 {
                    self.scale_speed(self.scroll_ratio.recip());
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.width = w;
                self.height = h;
            }
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.position
    }

    fn view_transform(&self) -> Isometry3<f32> {
        let target = self.position + self.front();
        Isometry3::look_at_rh(&self.position, &target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, canvas: &Canvas) {
        let axis = |positive: Key, negative: Key| -> f32 {
            let held = |key| canvas.get_key(key) == Action::Press;
            match (held(positive), held(negative)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };

        let forward = axis(KEY_CAMERA_FORWARD, KEY_CAMERA_BACK);
        let right = axis(KEY_CAMERA_RIGHT, KEY_CAMERA_LEFT);
        let up = axis(KEY_CAMERA_UP, KEY_CAMERA_DOWN);
        if forward != 0.0 || right != 0.0 || up != 0.0 {
            self.translate(forward, right, up);
        }
    }

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_front_and_right() {
        let camera = FlyCamera::new(Point3::origin(), -90.0, 0.0);
        assert_relative_eq!(camera.front(), -Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vector3::x(), epsilon = 1e-6);

        let camera = FlyCamera::new(Point3::origin(), 0.0, 45.0);
        let expected = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(camera.front(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FlyCamera::new(Point3::origin(), -90.0, 0.0);
        camera.look(0.0, -1e5);
        assert_relative_eq!(camera.pitch(), 89.0);
        camera.look(0.0, 1e5);
        assert_relative_eq!(camera.pitch(), -89.0);

        // Straight up is never reached, so the view stays well defined
        let camera = FlyCamera::new(Point3::origin(), 0.0, 120.0);
        assert_relative_eq!(camera.pitch(), 89.0);
        assert!(camera.right().norm() > 0.99);
    }

    #[test]
    fn test_translate() {
        let mut camera = FlyCamera::new(Point3::new(1.0, 2.0, 3.0), -90.0, 0.0);
        let speed = camera.move_speed();
        camera.translate(1.0, 0.0, 0.0);
        assert_relative_eq!(camera.eye(), Point3::new(1.0, 2.0, 3.0 - speed), epsilon = 1e-6);
        camera.translate(0.0, -1.0, 2.0);
        assert_relative_eq!(
            camera.eye(),
            Point3::new(1.0 - speed, 2.0 + 2.0 * speed, 3.0 - speed),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_speed_limits() {
        let mut camera = FlyCamera::new(Point3::origin(), -90.0, 0.0);
        for _ in 0..100 {
            camera.scale_speed(2.0);
        }
        assert_relative_eq!(camera.move_speed(), 50.0);
        for _ in 0..100 {
            camera.scale_speed(0.5);
        }
        assert_relative_eq!(camera.move_speed(), 0.001);
    }

    #[test]
    fn test_overlooking_sees_origin() {
        let camera = FlyCamera::overlooking(60.0);
        let to_origin = (Point3::origin() - camera.eye()).normalize();
        assert_relative_eq!(camera.front(), to_origin, epsilon = 1e-5);
        assert!(camera.clip_planes().1 >= 240.0);
    }
}
