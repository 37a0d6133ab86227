//! Compute-on-demand values
//!
//! A [`Cached`] holds one derived value. Mutating the inputs calls
//! [`Cached::invalidate`]; the next read recomputes through the supplied closure.

/// Lazily recomputed derived value with single-value invalidation
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: Option<T>,
}

impl<T> Cached<T> {
    /// Create an empty cache; the first read computes the value
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Drop the stored value so the next read recomputes it
    pub fn invalidate(&mut self) {
        self.value = None;
    }

    /// Whether a computed value is currently stored
    pub const fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// Return the stored value, computing it first if it was invalidated
    pub fn get_or_compute(&mut self, compute: impl FnOnce() -> T) -> &T {
        self.value.get_or_insert_with(compute)
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}
