pub use crate::galaxy::{
    CommittedParameters, GalaxyMesh, GalaxyParameters, ParameterEditState, RegenerateGalaxy,
};
pub use crate::graphics::ViewportSize;
