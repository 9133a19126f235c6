use std::time::{Duration, Instant};

use qrframe::{ECLevel, QRBuilder, Version};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ITERATIONS: u32 = 20;

fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random::<u8>()).collect()
}

fn bench(data: &[u8], ecl: ECLevel) -> Duration {
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        let qr = QRBuilder::new(data).ec_level(ecl).build().unwrap();
        std::hint::black_box(qr);
    }
    start.elapsed() / ITERATIONS
}

fn main() {
    println!("🚀 Running QR Encoding Benchmark");
    println!("=================================\n");

    let mut rng = StdRng::seed_from_u64(42);
    let total_start = Instant::now();

    let divider = "-".repeat(49);
    println!("{divider}");
    println!("| {:<8}| {:<8}| {:<8}| {:<17}|", "Version", "Level", "Bytes", "Avg build time");
    println!("{divider}");

    for v in [1, 5, 10, 20, 30, 40] {
        let ver = Version::new(v).unwrap();
        for ecl in ECLevel::ALL {
            let len = ver.byte_capacity(ecl);
            let data = random_payload(&mut rng, len);
            let elapsed = bench(&data, ecl);
            println!("| {v:<8}| {:<8}| {len:<8}| {:<17}|", format!("{ecl:?}"), format!("{elapsed:?}"));
        }
    }
    println!("{divider}\n");

    println!("✅ Benchmark completed!");
    println!("Total time elapsed: {:?}", total_start.elapsed());
}
