use crate::galaxy::generate;
use crate::prelude::*;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey, NotShadowCaster},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError,
        },
        view::NoFrustumCulling,
    },
};
use bytemuck::{Pod, Zeroable};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

// billboard corners, expanded along the camera axes in the vertex shader
const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub struct PointCloudPlugin;

impl Plugin for PointCloudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<PointCloudMaterial>::default())
            .add_systems(Startup, spawn_point_cloud)
            .add_systems(PostUpdate, rebuild_point_cloud);
    }
}

#[derive(Component)]
struct GalaxyPointCloud;

/// Owner of the one live galaxy mesh.
#[derive(Resource)]
pub struct GalaxyPoints {
    entity: Entity,
    mesh: Option<Handle<Mesh>>,
    material: Handle<PointCloudMaterial>,
    generation: i32,
}

impl GalaxyPoints {
    fn new(entity: Entity, material: Handle<PointCloudMaterial>) -> Self {
        Self {
            entity,
            mesh: None,
            material,
            generation: -1,
        }
    }

    /// Releases the current mesh asset, then hands the entity the new one.
    pub fn set_mesh(&mut self, commands: &mut Commands, meshes: &mut Assets<Mesh>, mesh: Mesh) {
        if let Some(old) = self.mesh.take() {
            meshes.remove(&old);
        }

        let handle = meshes.add(mesh);
        commands.entity(self.entity).insert(Mesh3d(handle.clone()));
        self.mesh = Some(handle);
    }
}

fn spawn_point_cloud(
    mut commands: Commands,
    mut materials: ResMut<Assets<PointCloudMaterial>>,
    committed: Res<CommittedParameters>,
) {
    let material = materials.add(PointCloudMaterial::new(committed.params.size));

    let entity = commands
        .spawn((
            Transform::IDENTITY,
            Visibility::Inherited,
            MeshMaterial3d(material.clone()),
            GalaxyPointCloud,
            NotShadowCaster,
            // quads are expanded on the gpu so the cpu side bounds are meaningless
            NoFrustumCulling,
        ))
        .id();

    commands.insert_resource(GalaxyPoints::new(entity, material));
}

fn rebuild_point_cloud(
    mut commands: Commands,
    committed: Res<CommittedParameters>,
    mut points: ResMut<GalaxyPoints>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PointCloudMaterial>>,
) {
    if points.generation == committed.generation {
        return;
    }

    let galaxy = generate(&committed.params);
    points.set_mesh(&mut commands, &mut meshes, build_point_cloud(&galaxy));
    points.generation = committed.generation;

    if let Some(mat) = materials.get_mut(&points.material) {
        mat.settings.size = committed.params.size;
    }

    info!(
        "Galaxy point cloud rebuilt: {} particles (generation {})",
        galaxy.len(),
        committed.generation
    );
}

/// One camera facing quad per particle: 4 vertices sharing the particle center and color.
pub fn build_point_cloud(galaxy: &GalaxyMesh) -> Mesh {
    let vertex_count = galaxy.len() * QUAD_CORNERS.len();

    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(galaxy.len() * QUAD_INDICES.len());

    for (particle, (position, color)) in galaxy.positions.iter().zip(&galaxy.colors).enumerate()
    {
        let base = (particle * QUAD_CORNERS.len()) as u32;
        for corner in QUAD_CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

// Duplicated in galaxy_points.wgsl, keep both in sync
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, Default)]
#[repr(C)]
struct PointCloudSettings {
    size: f32,
    pad: Vec3,
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct PointCloudMaterial {
    #[uniform(0)]
    settings: PointCloudSettings,
    alpha_mode: AlphaMode,
}

impl PointCloudMaterial {
    pub fn new(size: f32) -> Self {
        Self {
            settings: PointCloudSettings {
                size,
                pad: Vec3::ZERO,
            },
            alpha_mode: AlphaMode::Add,
        }
    }
}

impl Material for PointCloudMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        // additive points should never occlude each other
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}
