//! Shared numeric helpers
//!
//! Pure functions with no side effects. They go through `libm` so the engine
//! keeps building without `std`.

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if decimals <= 0 {
        return libm::round(value);
    }
    let scale = libm::pow(10.0, decimals as f64);
    libm::round(value * scale) / scale
}
