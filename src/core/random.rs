//! Random number generation (xorshift32)
//!
//! Cheap, deterministic per seed, and `Copy` state so every worker or
//! per-particle pass can own its own stream.

/// Advance the xorshift32 state and return the new value
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Integer in `0..n` (n = 0 yields 0)
#[inline]
pub fn below(state: &mut u32, n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    xorshift32(state) % n
}

/// Float in `[0, 1)`
#[inline]
pub fn unit_f32(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Float in `[lo, hi)`
#[inline]
pub fn range_f32(state: &mut u32, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * unit_f32(state)
}

/// `true` with probability `1 / n`
#[inline]
pub fn one_in(state: &mut u32, n: u32) -> bool {
    below(state, n) == 0
}

/// Non-zero seed for an independent stream keyed by (seed, frame, salt).
///
/// Used where work is split across threads and each item needs its own
/// reproducible stream (per-particle integrator jitter).
#[inline]
pub fn stream_seed(seed: u32, frame: u64, salt: u32) -> u32 {
    // splitmix-style finalizer over the packed inputs
    let mut z = (seed as u64) ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ ((salt as u64) << 32);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    let s = (z as u32) ^ ((z >> 32) as u32);
    if s == 0 { 0x9E37_79B9 } else { s }
}
