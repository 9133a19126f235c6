mod galois;

pub use galois::*;

// Reed-Solomon generator
//------------------------------------------------------------------------------

/// Reed-Solomon encoder for a fixed number of ecc codewords per block.
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    // Log of generator polynomial coefficients, highest degree first,
    // monic leading term omitted
    gen_poly: Vec<u8>,
}

impl ReedSolomon {
    pub fn new(ecc_count: usize) -> Self {
        Self { gen_poly: generator_polynomial(ecc_count) }
    }

    // Performs polynomial long division with data polynomial(num)
    // and generator polynomial(den) to compute remainder polynomial,
    // the coefficients of which are the ecc
    pub fn ecc(&self, block: &[u8]) -> Vec<u8> {
        let len = block.len();
        let ecc_count = self.gen_poly.len();

        let mut res = block.to_vec();
        res.resize(len + ecc_count, 0);

        for i in 0..len {
            let lead_coeff = res[i] as usize;
            if lead_coeff == 0 {
                continue;
            }

            let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
            for (u, v) in res[i + 1..].iter_mut().zip(self.gen_poly.iter()) {
                let mut log_sum = *v as usize + log_lead_coeff;
                debug_assert!(log_sum < 510, "Log sum has crossed 510: {log_sum}");
                if log_sum >= 255 {
                    log_sum -= 255;
                }
                *u ^= EXP_TABLE[log_sum];
            }
        }

        res.split_off(len)
    }
}

// Product of (x - a^i) for i in 0..degree, in log domain
pub fn generator_polynomial(degree: usize) -> Vec<u8> {
    debug_assert!(degree > 0 && degree < 256, "Invalid generator degree {degree}");

    let mut poly = vec![0u8; degree];
    poly[degree - 1] = 1;
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            poly[j] = gf_mul(poly[j], root);
            if j + 1 < degree {
                poly[j] ^= poly[j + 1];
            }
        }
        root = gf_mul(root, 2);
    }

    poly.iter()
        .map(|&c| {
            debug_assert!(c != 0, "Generator polynomial has a zero coefficient");
            LOG_TABLE[c as usize]
        })
        .collect()
}
