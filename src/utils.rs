use rand::Rng;
use std::time::{Duration, SystemTime, UNIX_EPOCH};


const ID_CHARSET: &[u8] = b"0123456789abcdef";

pub type ErrorStr = &'static str;
pub type Result<T> = std::result::Result<T, ErrorStr>;
pub type ResultV = Result<()>;


pub fn generate_hex_id(length: u32) -> String {
    let mut rng = rand::thread_rng();

    (0..length).map(
        |_| {
            let idx = rng.gen_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        }
    ).collect()
}


fn current_duration() -> Duration {
    // a clock before 1970 reads as zero
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

pub fn time_us() -> u128 {
    current_duration().as_micros()
}
