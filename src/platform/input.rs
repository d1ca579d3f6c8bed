//! Pointer sampling
//!
//! Hosts report absolute pointer positions. The sampler turns them into
//! per-tick deltas and, while the view is locked and focused, warps the
//! pointer back to the anchor so it never hits the screen edge.

use glam::Vec2;

/// Absolute pointer position source provided by the host
pub trait PointerSource {
    /// Current pointer position in screen pixels
    fn position(&mut self) -> Vec2;
    /// Move the pointer to `pos`
    fn warp_to(&mut self, pos: Vec2);
}

/// Converts absolute pointer positions into deltas
#[derive(Debug, Clone, Copy)]
pub struct PointerSampler {
    /// Recentre point, normally the middle of the window
    anchor: Vec2,
    /// Position seen at the previous sample
    last: Vec2,
}

impl PointerSampler {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            anchor,
            last: anchor,
        }
    }

    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Change the recentre point (window resized)
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    /// Forget the previous sample so the next delta starts from `pos`
    pub fn resync(&mut self, pos: Vec2) {
        self.last = pos;
    }

    /// Read the pointer and return the movement since the previous sample
    ///
    /// With `recenter` set the pointer is warped to the anchor in the same
    /// step, and the anchor becomes the baseline for the next delta. No
    /// movement can slip in between the read and the warp.
    pub fn sample(&mut self, source: &mut dyn PointerSource, recenter: bool) -> Vec2 {
        let pos = source.position();
        let delta = pos - self.last;
        if recenter {
            if pos != self.anchor {
                source.warp_to(self.anchor);
            }
            self.last = self.anchor;
        } else {
            self.last = pos;
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePointer {
        pos: Vec2,
        warps: u32,
    }

    impl PointerSource for FakePointer {
        fn position(&mut self) -> Vec2 {
            self.pos
        }

        fn warp_to(&mut self, pos: Vec2) {
            self.pos = pos;
            self.warps += 1;
        }
    }

    #[test]
    fn test_recenter_keeps_deltas_relative_to_anchor() {
        let anchor = Vec2::new(960.0, 540.0);
        let mut sampler = PointerSampler::new(anchor);
        let mut pointer = FakePointer {
            pos: anchor,
            warps: 0,
        };

        pointer.pos += Vec2::new(12.0, -4.0);
        assert_eq!(sampler.sample(&mut pointer, true), Vec2::new(12.0, -4.0));
        assert_eq!(pointer.pos, anchor);
        assert_eq!(pointer.warps, 1);

        pointer.pos += Vec2::new(3.0, 0.0);
        assert_eq!(sampler.sample(&mut pointer, true), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_no_warp_when_not_recentering() {
        let mut sampler = PointerSampler::new(Vec2::ZERO);
        let mut pointer = FakePointer {
            pos: Vec2::new(5.0, 5.0),
            warps: 0,
        };
        assert_eq!(sampler.sample(&mut pointer, false), Vec2::new(5.0, 5.0));
        pointer.pos = Vec2::new(7.0, 5.0);
        assert_eq!(sampler.sample(&mut pointer, false), Vec2::new(2.0, 0.0));
        assert_eq!(pointer.warps, 0);
    }

    #[test]
    fn test_still_pointer_is_not_warped() {
        let anchor = Vec2::new(100.0, 100.0);
        let mut sampler = PointerSampler::new(anchor);
        let mut pointer = FakePointer {
            pos: anchor,
            warps: 0,
        };
        assert_eq!(sampler.sample(&mut pointer, true), Vec2::ZERO);
        assert_eq!(pointer.warps, 0);
    }
}
