use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;

mod camera;
mod config_egui;

/// True while the pointer belongs to the parameter panel, camera input is ignored then.
#[derive(Resource, Default)]
pub struct PanelPointerCapture(pub bool);

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelPointerCapture>().add_plugins((
            FrameTimeDiagnosticsPlugin::default(),
            config_egui::ConfigEguiPlugin,
            camera::CameraPlugin,
        ));
    }
}
