use super::*;
use crate::geometry::intersection_ratio;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IntersectionEntry {
    pub(crate) target: NodeId,
    pub(crate) is_intersecting: bool,
    pub(crate) ratio: f64,
}

#[derive(Debug, Clone)]
struct Observation {
    target: NodeId,
    // `None` until the first check has reported the target.
    last_state: Option<bool>,
}

/// Viewport observation over laid-out elements. A target is reported on its
/// first check and again whenever it crosses the threshold.
#[derive(Debug, Clone)]
pub(crate) struct IntersectionObserver {
    threshold: f64,
    root_margin: RootMargin,
    observations: Vec<Observation>,
}

impl IntersectionObserver {
    pub(crate) fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
            observations: Vec::new(),
        }
    }

    pub(crate) fn observe(&mut self, target: NodeId) {
        if self.observations.iter().any(|obs| obs.target == target) {
            return;
        }
        self.observations.push(Observation {
            target,
            last_state: None,
        });
    }

    pub(crate) fn unobserve(&mut self, target: NodeId) -> bool {
        let before = self.observations.len();
        self.observations.retain(|obs| obs.target != target);
        before != self.observations.len()
    }

    pub(crate) fn is_observing(&self, target: NodeId) -> bool {
        self.observations.iter().any(|obs| obs.target == target)
    }

    pub(crate) fn observed_count(&self) -> usize {
        self.observations.len()
    }

    /// Computes one callback batch against the current viewport. Detached
    /// targets never intersect.
    pub(crate) fn check(&mut self, dom: &Dom, viewport: &Viewport) -> Vec<IntersectionEntry> {
        let root = self.root_margin.apply(viewport.document_rect());
        let mut entries = Vec::new();
        for obs in &mut self.observations {
            let ratio = if dom.is_connected(obs.target) {
                dom.layout(obs.target)
                    .ok()
                    .and_then(|rect| intersection_ratio(&rect, &root))
            } else {
                None
            };
            let is_intersecting = ratio.is_some_and(|ratio| ratio >= self.threshold);
            if obs.last_state == Some(is_intersecting) {
                continue;
            }
            obs.last_state = Some(is_intersecting);
            entries.push(IntersectionEntry {
                target: obs.target,
                is_intersecting,
                ratio: ratio.unwrap_or(0.0),
            });
        }
        entries
    }
}
