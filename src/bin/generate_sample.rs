use std::env;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// One cross-section slice of a synthetic fish body.
struct Slice {
    area: f64,
    perimeter: f64,
    width: f64,
    height: f64,
}

/// Elliptical cross-sections under a smooth body envelope, with per-slice
/// noise.  The envelope keeps a positive floor so no slice degenerates.
fn generate_body(
    slices: usize,
    max_width: f64,
    max_height: f64,
    rng: &mut SimpleRng,
) -> Vec<Slice> {
    let scale = rng.gauss(1.0, 0.05);
    (0..slices)
        .map(|i| {
            let t = i as f64 / (slices - 1) as f64;
            let envelope = 0.12 + 0.88 * (PI * t).sin();

            let width = max_width * scale * envelope * (1.0 + rng.gauss(0.0, 0.03));
            let height = max_height * scale * envelope * (1.0 + rng.gauss(0.0, 0.03));

            // Ellipse area and Ramanujan's perimeter approximation.
            let (a, b) = (width / 2.0, height / 2.0);
            let area = PI * a * b;
            let perimeter = PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt());

            Slice {
                area,
                perimeter,
                width,
                height,
            }
        })
        .collect()
}

fn write_specimen(root: &Path, name: &str, body: &[Slice]) {
    // Slice spacing is one unit, so the integrals are plain sums.
    let volume: f64 = body.iter().map(|s| s.area).sum();
    let surface: f64 = body.iter().map(|s| s.perimeter).sum();

    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("Failed to create specimen directory");

    let file = dir.join(format!(
        "statistics_{volume:.1}_{surface:.1}_s0_e{}_gen.csv",
        body.len()
    ));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&file)
        .expect("Failed to create result file");

    writer
        .write_record(["Slice", "Area", "Perim.", "Width", "Height"])
        .expect("Failed to write header");
    for (i, slice) in body.iter().enumerate() {
        writer
            .write_record([
                (i + 1).to_string(),
                format!("{:.3}", slice.area),
                format!("{:.3}", slice.perimeter),
                format!("{:.3}", slice.width),
                format!("{:.3}", slice.height),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush result file");
}

fn main() {
    let root = env::args().nth(1).unwrap_or_else(|| "sample_data".to_string());
    let root = Path::new(&root);
    let mut rng = SimpleRng::new(42);

    // (class, specimens, max width, max height)
    let classes: [(&str, [&str; 3], f64, f64); 2] = [
        ("wild-type", ["wt_1", "wt_2", "wt_3"], 6.0, 4.5),
        ("mutant", ["mut_1", "mut_2", "mut_3"], 5.0, 5.2),
    ];
    let slices = 50;

    for (_, specimens, max_width, max_height) in &classes {
        for name in specimens {
            let body = generate_body(slices, *max_width, *max_height, &mut rng);
            write_specimen(root, name, &body);
        }
    }

    println!(
        "Wrote {} specimens ({} slices each) under {}",
        classes.iter().map(|(_, s, _, _)| s.len()).sum::<usize>(),
        slices,
        root.display()
    );
    println!("Matching class configuration:");
    println!(
        "{{\"wild-type\": [\"wt_1\", \"wt_2\", \"wt_3\"], \"mutant\": [\"mut_1\", \"mut_2\", \"mut_3\"]}}"
    );
}
