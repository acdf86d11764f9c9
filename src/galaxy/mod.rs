mod galaxy_config;
mod generator;

pub use galaxy_config::{
    CommittedParameters, GalaxyConfigPlugin, GalaxyParameters, ParameterEditState,
    RegenerateGalaxy,
};
pub use generator::{generate, GalaxyMesh};
