//! Seeded gradient noise for terrain heights.
//!
//! Fractal Perlin from the `noise` crate. Each octave is a Perlin source with
//! its own seeded permutation table and a quintic fade.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

const OCTAVES: usize = 3;
const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;

/// Continuous 3D noise with values in [-1, 1]
#[derive(Clone)]
pub struct GradientNoise {
    fbm: Fbm<Perlin>,
}

impl GradientNoise {
    pub fn new(seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(OCTAVES)
            .set_persistence(PERSISTENCE)
            .set_lacunarity(LACUNARITY);
        Self { fbm }
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.fbm.get([x, y, z]).clamp(-1.0, 1.0)
    }
}
