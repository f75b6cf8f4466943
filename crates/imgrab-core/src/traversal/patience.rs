//! Scroll-offset stall detection, the termination oracle for carousel traversal.

/// Counts consecutive iterations whose scroll offset did not change.
#[derive(Debug, Clone)]
pub struct ScrollPatience {
    threshold: u32,
    last_offset: f64,
    stalls: u32,
}

impl ScrollPatience {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            last_offset: 0.0,
            stalls: 0,
        }
    }

    /// Records the offset observed after advancing; returns true once the
    /// offset has been unchanged for `threshold` consecutive observations.
    /// An unreadable offset (`None`) counts as unchanged so the loop cannot
    /// spin forever on a broken page.
    pub fn observe(&mut self, offset: Option<f64>) -> bool {
        match offset {
            Some(offset) if offset != self.last_offset => {
                self.last_offset = offset;
                self.stalls = 0;
            }
            _ => self.stalls += 1,
        }
        self.exhausted()
    }

    pub fn exhausted(&self) -> bool {
        self.stalls >= self.threshold
    }

    pub fn stalls(&self) -> u32 {
        self.stalls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_resets_the_counter() {
        let mut p = ScrollPatience::new(3);
        assert!(!p.observe(Some(100.0)));
        assert!(!p.observe(Some(100.0)));
        assert!(!p.observe(Some(100.0)));
        assert_eq!(p.stalls(), 2);
        assert!(!p.observe(Some(250.0)));
        assert_eq!(p.stalls(), 0);
    }

    #[test]
    fn terminates_after_threshold_stalls() {
        let mut p = ScrollPatience::new(3);
        assert!(!p.observe(Some(0.0)));
        assert!(!p.observe(Some(0.0)));
        assert!(p.observe(Some(0.0)));
    }

    #[test]
    fn unreadable_offset_counts_as_stall() {
        let mut p = ScrollPatience::new(2);
        assert!(!p.observe(None));
        assert!(p.observe(None));
    }
}
