use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowTheme};
use bevy_egui::EguiPlugin;

mod galaxy;
mod graphics;
mod ui;

mod prelude;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Galaxy Generator".into(),
                        name: Some("galaxy_generator.app".into()),
                        // one frame per display refresh
                        present_mode: PresentMode::AutoVsync,
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        window_theme: Some(WindowTheme::Dark),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,galaxy_generator=debug".into(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: false,
        })
        .add_plugins((
            galaxy::GalaxyConfigPlugin,
            graphics::GraphicsPlugin,
            ui::UiPlugin,
        ))
        .run();
}
