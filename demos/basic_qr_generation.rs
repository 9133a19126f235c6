use std::error::Error;

use qrframe::QRBuilder;

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings are automatically chosen
    let qr = QRBuilder::new(b"Hello, World!").build()?;

    // Print to terminal
    println!("{}", qr.to_str(1));

    // Convert to image and save
    let img = qr.to_image(4); // 4x scale factor
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    Ok(())
}
