use super::GalaxyParameters;
use bevy::color::Mix;
use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Particles drawn from one rng stream.
/// Fixed so a seed gives the same buffers no matter how many threads rayon uses.
const CHUNK_SIZE: usize = 4096;

/// Positions and linear RGB colors, index aligned
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GalaxyMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl GalaxyMesh {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `3 * len` floats, xyz per particle
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// `3 * len` floats, rgb per particle
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// One particle before it is turned into buffer entries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSample {
    /// distance from the center along the arm, in `[0, params.radius]`
    pub radius: f32,
    /// arm angle plus the spin twist
    pub base_angle: f32,
    pub offset: Vec3,
}

impl ParticleSample {
    pub fn position(&self) -> Vec3 {
        vec3(
            self.base_angle.cos() * (self.radius + self.offset.x),
            self.offset.y,
            self.base_angle.sin() * (self.radius + self.offset.z),
        )
    }
}

/// Angle of the arm particle `index` belongs to.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Where along the inside -> outside gradient a particle sits.
/// A zero radius galaxy would give 0/0, which is pinned to the inside color.
pub fn color_fraction(radius: f32, max_radius: f32) -> f32 {
    let fraction = radius / max_radius;
    if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Uniform draw raised to `power`, so most offsets land near zero with the odd long excursion
fn power_scatter(rng: &mut impl Rng, power: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

pub fn sample_particle(
    params: &GalaxyParameters,
    index: usize,
    rng: &mut impl Rng,
) -> ParticleSample {
    let radius = rng.random::<f32>() * params.radius;
    let spin_angle = radius * params.spin;

    let offset = vec3(
        power_scatter(rng, params.randomness_power),
        power_scatter(rng, params.randomness_power),
        power_scatter(rng, params.randomness_power),
    );

    ParticleSample {
        radius,
        base_angle: branch_angle(index, params.branches) + spin_angle,
        offset,
    }
}

// Chunk streams of neighbouring seeds must not line up, so the index is spread over all 64 bits
fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed ^ (chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Builds a fresh galaxy. Two calls with the same parameters look alike but are not identical.
pub fn generate(params: &GalaxyParameters) -> GalaxyMesh {
    generate_seeded(params, rand::random())
}

/// Deterministic form of [`generate`].
pub fn generate_seeded(params: &GalaxyParameters, seed: u64) -> GalaxyMesh {
    let count = params.count as usize;
    let inside = LinearRgba::from(params.inside_color);
    let outside = LinearRgba::from(params.outside_color);

    let mut positions = vec![[0.0; 3]; count];
    let mut colors = vec![[0.0; 3]; count];

    positions
        .par_chunks_mut(CHUNK_SIZE)
        .zip(colors.par_chunks_mut(CHUNK_SIZE))
        .enumerate()
        .for_each(|(chunk, (position_chunk, color_chunk))| {
            let mut rng = StdRng::seed_from_u64(chunk_seed(seed, chunk));

            for (i, (position, color)) in position_chunk
                .iter_mut()
                .zip(color_chunk.iter_mut())
                .enumerate()
            {
                let sample = sample_particle(params, chunk * CHUNK_SIZE + i, &mut rng);
                *position = sample.position().to_array();

                let mixed = inside.mix(&outside, color_fraction(sample.radius, params.radius));
                *color = [mixed.red, mixed.green, mixed.blue];
            }
        });

    GalaxyMesh { positions, colors }
}
