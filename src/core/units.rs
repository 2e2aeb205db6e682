pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn bytes_to_mb(bytes: f64) -> f64 {
    bytes / BYTES_PER_MB
}

pub fn mb_to_bytes(mb: f64) -> f64 {
    mb * BYTES_PER_MB
}
