//! Uniform integer source behind randomised rank draws.

use rand::Rng;

/// Draws a uniformly distributed integer from an inclusive range.
///
/// Rank resolution assigns a position somewhere inside a score's band rather
/// than a fixed slot. Injecting the source keeps production on the thread
/// generator while tests script exact draws.
pub trait RandomSource: Send + Sync {
    /// Returns a value in `[start, end]`. Callers guarantee `start <= end`.
    fn pick(&self, start: u32, end: u32) -> u32;
}

/// Production source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick(&self, start: u32, end: u32) -> u32 {
        rand::thread_rng().gen_range(start..=end)
    }
}
