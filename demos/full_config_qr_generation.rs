use std::error::Error;

use image::Rgb;
use qrframe::{ECLevel, MaskPattern, QRBuilder, Version};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG=qrframe=trace shows version search & mask scores
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let data = "This example shows all available configuration options for QR code generation.";

    let qr = QRBuilder::new(data.as_bytes())
        .version(Version::new(9)?)    // QR version (size) - if not provided, finds smallest version to fit data
        .ec_level(ECLevel::H)         // Error correction level - if not provided, defaults to ECLevel::M
        .mask(MaskPattern::new(2)?)   // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    // Convert to image and save
    let img = qr.render(6, Rgb([20, 40, 120]), Rgb([250, 250, 240])); // 6x scale factor
    img.save("configured_qr.png")?;

    println!("Configured QR code saved to: configured_qr.png");
    println!("QR metadata: {}", qr.metadata());
    println!("Penalty score: {}", qr.penalty());

    Ok(())
}
