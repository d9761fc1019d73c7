use std::sync::atomic::{AtomicUsize, Ordering};

// -------------------------------------------------------------------------------------------------

/// Generates a unique usize number, by simply counting atomically upwards from 1.
pub fn unique_usize_id() -> usize {
    static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);
    ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids() {
        let first = unique_usize_id();
        let second = unique_usize_id();
        assert!(first > 0);
        assert!(second > first);
    }
}
