use std::fs;
use std::path::Path;

const WIDTH: usize = 1280;
const HEIGHT: usize = 64;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Column position of a wavelength under the default field calibration
/// (pixel 0 → 400 nm, pixel 640 → 550 nm, pixel 1279 → 700 nm).
fn pixel_for_wavelength(nm: f64) -> f64 {
    if nm <= 550.0 {
        (nm - 400.0) / 150.0 * 640.0
    } else {
        640.0 + (nm - 550.0) / 150.0 * 639.0
    }
}

/// Simulate one detector frame: dark-current noise around 100 counts plus
/// emission lines uniform along the slit, with slight per-row illumination
/// variation, clipped to the 12-bit sensor range.
fn generate_frame(
    width: usize,
    height: usize,
    peaks_nm: &[(f64, f64, f64)],
    rng: &mut SimpleRng,
) -> Vec<Vec<u16>> {
    let profiles: Vec<Vec<f64>> = peaks_nm
        .iter()
        .map(|&(nm, sigma, amplitude)| {
            let center = pixel_for_wavelength(nm);
            (0..width)
                .map(|col| gaussian(col as f64, center, sigma, amplitude))
                .collect()
        })
        .collect();

    (0..height)
        .map(|_| {
            let jitter: Vec<f64> = profiles
                .iter()
                .map(|_| 1.0 + 0.1 * rng.gauss(0.0, 1.0))
                .collect();
            (0..width)
                .map(|col| {
                    let mut value = rng.gauss(100.0, 10.0);
                    for (profile, j) in profiles.iter().zip(&jitter) {
                        value += profile[col] * j;
                    }
                    value.clamp(0.0, 4095.0).round() as u16
                })
                .collect()
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(7);

    let out_dir = Path::new("demo_frames");
    fs::create_dir_all(out_dir).expect("Failed to create output directory");

    // Emission lines per sample kind, as (wavelength nm, sigma px, amplitude).
    let scenarios: Vec<(&str, Vec<(f64, f64, f64)>)> = vec![
        (
            "biotic_mat",
            vec![
                (430.0, 18.0, 1500.0),
                (505.0, 25.0, 1200.0),
                (660.0, 20.0, 1400.0),
            ],
        ),
        ("carotenoid_film", vec![(495.0, 30.0, 1100.0)]),
        (
            "organic_residue",
            vec![(412.0, 16.0, 900.0), (443.0, 14.0, 1000.0)],
        ),
        (
            "mineral_regolith",
            vec![(585.0, 22.0, 1300.0), (620.0, 18.0, 900.0)],
        ),
    ];

    for (name, peaks) in &scenarios {
        let frame = generate_frame(WIDTH, HEIGHT, peaks, &mut rng);
        let path = out_dir.join(format!("{name}.csv"));

        let mut writer = csv::Writer::from_path(&path).expect("Failed to create output file");
        for row in &frame {
            writer
                .write_record(row.iter().map(|v| v.to_string()))
                .expect("Failed to write frame row");
        }
        writer.flush().expect("Failed to flush output file");

        println!(
            "Wrote {HEIGHT}x{WIDTH} frame with {} emission lines to {}",
            peaks.len(),
            path.display()
        );
    }
}
