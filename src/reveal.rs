use super::*;

pub(crate) const REVEALED_CLASS: &str = "visible";

/// Delay before the `index`-th newly intersecting element of a batch is
/// revealed.
pub fn stagger_delay(index: usize, step_ms: i64) -> i64 {
    i64::try_from(index)
        .unwrap_or(i64::MAX)
        .saturating_mul(step_ms.max(0))
}

/// One-shot reveal of `[data-animate]` elements as they scroll into view.
#[derive(Debug, Clone)]
pub(crate) struct RevealAnimator {
    observer: IntersectionObserver,
    stagger_ms: i64,
}

impl RevealAnimator {
    pub(crate) fn new(observer: IntersectionObserver, stagger_ms: i64) -> Self {
        Self {
            observer,
            stagger_ms,
        }
    }

    pub(crate) fn register(&mut self, targets: &[NodeId]) {
        for target in targets {
            self.observer.observe(*target);
        }
    }

    pub(crate) fn is_observing(&self, target: NodeId) -> bool {
        self.observer.is_observing(target)
    }

    pub(crate) fn observed_count(&self) -> usize {
        self.observer.observed_count()
    }

    pub(crate) fn check(&mut self, dom: &Dom, viewport: &Viewport) -> Vec<IntersectionEntry> {
        self.observer.check(dom, viewport)
    }

    /// Handles one observer callback batch: every intersecting entry stops
    /// being observed and gets a reveal delay from its position in the batch,
    /// counting the entries that do not intersect too.
    pub(crate) fn plan_batch(&mut self, entries: &[IntersectionEntry]) -> Vec<(NodeId, i64)> {
        let mut planned = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if !entry.is_intersecting {
                continue;
            }
            self.observer.unobserve(entry.target);
            planned.push((entry.target, stagger_delay(index, self.stagger_ms)));
        }
        planned
    }
}

/// Marks `target` revealed; returns false when it already was.
pub(crate) fn reveal(dom: &mut Dom, target: NodeId) -> Result<bool> {
    if dom.class_contains(target, REVEALED_CLASS)? {
        return Ok(false);
    }
    dom.class_add(target, REVEALED_CLASS)?;
    Ok(true)
}
