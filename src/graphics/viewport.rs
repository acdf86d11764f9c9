use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportSize>()
            .add_systems(Update, track_viewport_size);
    }
}

/// Logical size of the primary window.
/// The camera aspect and the surface resolution are kept in step by Bevy itself.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

fn track_viewport_size(
    mut resize_events: EventReader<WindowResized>,
    primary: Query<(), With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    for event in resize_events.read() {
        if !primary.contains(event.window) {
            continue;
        }
        *viewport = ViewportSize {
            width: event.width,
            height: event.height,
        };
        debug!(
            "Viewport resized to {}x{} (aspect {:.3})",
            event.width,
            event.height,
            viewport.aspect_ratio()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;

    fn viewport_app() -> App {
        let mut app = App::new();
        app.add_event::<WindowResized>().add_plugins(ViewportPlugin);
        app
    }

    #[test]
    fn resize_updates_size_and_leaves_the_window_alone() {
        let mut app = viewport_app();
        let mut resolution = WindowResolution::new(3600.0, 2700.0);
        resolution.set_scale_factor(3.0);
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution,
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();

        app.world_mut().send_event(WindowResized {
            window,
            width: 800.0,
            height: 400.0,
        });
        app.update();

        let viewport = *app.world().resource::<ViewportSize>();
        assert_eq!(
            viewport,
            ViewportSize {
                width: 800.0,
                height: 400.0
            }
        );
        assert_eq!(viewport.aspect_ratio(), 2.0);

        // high density displays keep their native scale, the window is never resized from here
        let window = app.world().get::<Window>(window).expect("window");
        assert_eq!(window.resolution.scale_factor_override(), None);
        assert_eq!(window.resolution.physical_width(), 3600);
        assert_eq!(window.resolution.physical_height(), 2700);
        assert_eq!(window.resolution.width(), 1200.0);
    }

    #[test]
    fn other_windows_are_ignored() {
        let mut app = viewport_app();
        let secondary = app.world_mut().spawn(Window::default()).id();

        app.world_mut().send_event(WindowResized {
            window: secondary,
            width: 640.0,
            height: 480.0,
        });
        app.update();

        assert_eq!(*app.world().resource::<ViewportSize>(), ViewportSize::default());
    }

    #[test]
    fn collapsed_viewport_keeps_a_usable_aspect() {
        let viewport = ViewportSize {
            width: 640.0,
            height: 0.0,
        };
        assert_eq!(viewport.aspect_ratio(), 1.0);
    }
}
