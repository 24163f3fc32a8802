//! Seeded 2D gradient noise and fractal (fBm) layering.

use rand::Rng;
use rand::seq::SliceRandom;

/// Classic 2D Perlin noise with a shuffled permutation table.
#[derive(Debug, Clone)]
pub struct Perlin {
    perm: [u8; 512],
}

impl Perlin {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut base: Vec<u8> = (0..=255).collect();
        base.shuffle(rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    /// Noise at `(x, y)`, mapped into `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.perm[self.perm[xi] as usize + yi];
        let ab = self.perm[self.perm[xi] as usize + yi + 1];
        let ba = self.perm[self.perm[xi + 1] as usize + yi];
        let bb = self.perm[self.perm[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        let n = lerp(x1, x2, v);

        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Sum `octaves` layers, halving amplitude and doubling frequency each time.
///
/// Normalized by total amplitude, so the result stays in `[0, 1]`.
pub fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32) -> f64 {
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut sum = 0.0;
    let mut max = 0.0;

    for _ in 0..octaves {
        sum += amp * noise.sample(x * freq, y * freq);
        max += amp;
        amp *= 0.5;
        freq *= 2.0;
    }

    if max == 0.0 { 0.0 } else { sum / max }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sample_stays_in_unit_range() {
        let noise = Perlin::new(&mut StdRng::seed_from_u64(7));
        for i in 0..500 {
            let x = i as f64 * 0.37 + 1234.5;
            let y = i as f64 * 0.11 - 88.0;
            let v = noise.sample(x, y);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn lattice_points_sit_at_midpoint() {
        // Gradient noise is zero at integer coordinates.
        let noise = Perlin::new(&mut StdRng::seed_from_u64(1));
        assert!((noise.sample(3.0, 9.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fbm_is_deterministic_per_seed() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(42));
        let b = Perlin::new(&mut StdRng::seed_from_u64(42));
        assert_eq!(fbm(&a, 10.3, 4.7, 4), fbm(&b, 10.3, 4.7, 4));
    }

    #[test]
    fn zero_octaves_is_zero() {
        let noise = Perlin::new(&mut StdRng::seed_from_u64(3));
        assert_eq!(fbm(&noise, 1.5, 2.5, 0), 0.0);
    }
}
