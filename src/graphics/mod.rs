use bevy::prelude::*;

mod point_cloud;
mod viewport;

pub use viewport::ViewportSize;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((point_cloud::PointCloudPlugin, viewport::ViewportPlugin));
    }
}
