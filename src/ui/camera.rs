use super::PanelPointerCapture;
use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use std::f32::consts::FRAC_PI_2;
use std::ops::{Mul, Sub};

// Share of each input buffer applied per 60 Hz frame
const DAMPING: f32 = 0.05;
const ROTATE_SPEED: f32 = 0.005;
const PAN_SPEED: f32 = 0.0015;
const ZOOM_SPEED: f32 = 0.1;
const PIXELS_PER_LINE: f32 = 100.0;

const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 90.0;
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);

    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Orbit controls around `target`.
/// Pointer input is pushed into buffers that drain over several frames, so motion eases out.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    rotate_buffer: Vec2,
    pan_buffer: Vec2,
    smooth_zoom_buffer: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // starts at (0, 0, 3)
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance: 3.0,
            rotate_buffer: Vec2::ZERO,
            pan_buffer: Vec2::ZERO,
            smooth_zoom_buffer: 0.0,
        }
    }
}

impl OrbitCamera {
    fn direction(&self) -> Vec3 {
        vec3(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    fn translation(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    /// Camera right and up vectors
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = -self.direction();
        let right = forward.cross(Vec3::Y).normalize();
        (right, right.cross(forward))
    }

    fn apply_input(&mut self, rotate: Vec2, pan: Vec2, zoom: f32) {
        self.rotate_buffer += rotate * ROTATE_SPEED;
        self.pan_buffer += pan * PAN_SPEED;
        self.smooth_zoom_buffer -= zoom * ZOOM_SPEED;
    }

    fn update(&mut self, factor: f32) {
        let rotate = drain(&mut self.rotate_buffer, factor);
        self.yaw -= rotate.x;
        self.pitch = (self.pitch + rotate.y).clamp(-MAX_PITCH, MAX_PITCH);

        let pan = drain(&mut self.pan_buffer, factor);
        let (right, up) = self.screen_axes();
        self.target += (up * pan.y - right * pan.x) * self.distance;

        let zoom = drain(&mut self.smooth_zoom_buffer, factor);
        self.distance = (self.distance * zoom.exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Removes `factor` of the buffer and returns the removed part.
fn drain<T>(buffer: &mut T, factor: f32) -> T
where
    T: Copy + Mul<f32, Output = T> + Sub<Output = T>,
{
    let step = *buffer * factor;
    *buffer = *buffer - step;
    step
}

// frame rate independent version of DAMPING
fn damping_factor(delta_secs: f32) -> f32 {
    1.0 - (1.0 - DAMPING).powf(delta_secs * 60.0)
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    pointer_capture: Res<PanelPointerCapture>,
    time: Res<Time>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };

    let motion: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let scroll: f32 = scroll_evr
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_LINE,
        })
        .sum();

    // the panel keeps the pointer while it is over it
    if !pointer_capture.0 {
        let (rotate, pan) = if mouse_buttons.pressed(MouseButton::Left) {
            (motion, Vec2::ZERO)
        } else if mouse_buttons.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            (Vec2::ZERO, motion)
        } else {
            (Vec2::ZERO, Vec2::ZERO)
        };
        orbit.apply_input(rotate, pan, scroll);
    }

    orbit.update(damping_factor(time.delta_secs()));

    *transform = Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y);
}
