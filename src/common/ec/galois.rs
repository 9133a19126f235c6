// Galois field GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11d;

const fn build_tables() -> ([u8; 256], [u8; 256]) {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    exp[255] = exp[0];
    // Zero has no discrete log
    log[0] = 0xff;
    (exp, log)
}

const TABLES: ([u8; 256], [u8; 256]) = build_tables();

pub static EXP_TABLE: [u8; 256] = TABLES.0;

pub static LOG_TABLE: [u8; 256] = TABLES.1;

pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}
