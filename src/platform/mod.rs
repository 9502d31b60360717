//! Platform glue
//!
//! The browser build gets the route hash, the clock, and a canvas painter.
//! Native builds only need the clock.

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{HashSink, context_2d, initial_route, now_ms, paint};

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Fill colour for a named sprite and whether it paints as a circle
pub fn sprite_fallback(name: &str) -> (&'static str, bool) {
    match name {
        "bird" => ("#D62828", true),
        "pig" => ("#70C050", true),
        "pig_squished" => ("#4E8A38", true),
        "poof" => ("#DDDDDD", true),
        "star" => ("#FFD700", true),
        "slingshot" => ("#6B3E1E", false),
        _ => ("#FF00FF", false),
    }
}
