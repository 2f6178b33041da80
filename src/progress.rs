use std::sync::atomic::{AtomicU64, Ordering};

/// Reports completion in `0.0..=1.0`; returning `false` is ignored by this
/// crate (the pipeline has no cancellation semantics) but kept for parity
/// with common raster libraries.
pub type ProgressCallback<'a> = dyn Fn(f64) -> bool + Sync + 'a;

pub(crate) struct ProgressCounter<'a> {
    count: f64,
    counter: AtomicU64,
    callback: Option<&'a ProgressCallback<'a>>,
}

impl<'a> ProgressCounter<'a> {
    pub(crate) fn new(count: u64, callback: Option<&'a ProgressCallback<'a>>) -> Self {
        Self {
            count: count as f64,
            counter: AtomicU64::new(1),
            callback,
        }
    }

    pub(crate) fn increment(&self) {
        if let Some(callback) = self.callback {
            callback(self.counter.fetch_add(1, Ordering::Relaxed) as f64 / self.count);
        }
    }
}
