mod ec;
mod qr;
mod render;

pub use qr::{Module, QR};

use tracing::{debug, instrument};

use crate::common::{
    bitstream::BitStream,
    codec::{encode, encode_with_version},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

/// Configures and builds a byte mode QR symbol.
///
/// Version defaults to the smallest that fits the data, the level to
/// [`ECLevel::M`] and the mask to the lowest penalty pattern.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| (*m).to_string());
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    #[instrument(level = "debug", skip_all, fields(len = self.data.len(), ecl = ?self.ec_level))]
    pub fn build(&self) -> QRResult<QR> {
        debug!("Encoding data...");
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_with_version(self.data, v, self.ec_level)?, v),
            None => encode(self.data, self.ec_level)?,
        };

        debug!(version = *version, "Constructing payload with ecc & interleaving...");
        let (data_blocks, ecc_blocks) = ec::ecc(encoded_data.data(), version, self.ec_level);
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&ec::interleave(&data_blocks));
        payload.extend(&ec::interleave(&ecc_blocks));

        debug!("Drawing functional patterns & encoding region...");
        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        debug!(
            mask = *mask,
            dark_modules = qr.count_dark_modules(),
            total_modules = version.width() * version.width(),
            "QR generated {}",
            qr.metadata()
        );

        Ok(qr)
    }
}
