use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::coords::Rect;
use crate::host::HostCapabilities;

use super::record::{ElementId, IntersectionEntry, Thresholds, VisibilityRecord};

pub type VisibilityCallback = Box<dyn FnMut(VisibilityRecord)>;

struct Observed {
    token: u64,
    thresholds: Thresholds,
    band: Option<usize>,
    record: Option<VisibilityRecord>,
    /// Taken out while the callback runs so the gate is not borrowed during it.
    callback: Option<VisibilityCallback>,
}

struct GateInner {
    fail_open: bool,
    next_token: u64,
    observed: HashMap<ElementId, Observed>,
}

/// Per-element viewport visibility.
///
/// Cheap to clone; clones share the same set of observations.
#[derive(Clone)]
pub struct VisibilityGate {
    inner: Rc<RefCell<GateInner>>,
}

impl VisibilityGate {
    /// Creates a gate for a host with `caps`.
    ///
    /// Without intersection support the gate is fail-open: every observation
    /// reports `{ is_intersecting: true, ratio: 1.0 }` as soon as it starts.
    pub fn new(caps: HostCapabilities) -> Self {
        if !caps.intersection_observer {
            log::debug!("intersection observation unavailable; visibility gate is fail-open");
        }
        Self {
            inner: Rc::new(RefCell::new(GateInner {
                fail_open: !caps.intersection_observer,
                next_token: 1,
                observed: HashMap::new(),
            })),
        }
    }

    pub fn is_fail_open(&self) -> bool {
        self.inner.borrow().fail_open
    }

    /// Starts observing `element`.
    ///
    /// Observing an element twice replaces the earlier observation; the old
    /// [`Observation`] goes inert.
    pub fn observe(
        &self,
        element: ElementId,
        thresholds: &[f32],
        callback: VisibilityCallback,
    ) -> Observation {
        let (token, fail_open) = {
            let mut inner = self.inner.borrow_mut();
            let token = inner.next_token;
            inner.next_token += 1;
            inner.observed.insert(
                element,
                Observed {
                    token,
                    thresholds: Thresholds::new(thresholds),
                    band: None,
                    record: None,
                    callback: Some(callback),
                },
            );
            (token, inner.fail_open)
        };

        if fail_open {
            let record = VisibilityRecord { element, is_intersecting: true, ratio: 1.0 };
            if let Some(observed) = self.inner.borrow_mut().observed.get_mut(&element) {
                observed.record = Some(record);
            }
            self.emit(element, token, record);
        }

        Observation {
            gate: Rc::downgrade(&self.inner),
            element,
            token,
            active: Cell::new(true),
        }
    }

    /// Applies a batch of host measurements, emitting updates for crossings.
    ///
    /// Entries for elements that are no longer observed are dropped.
    pub fn deliver(&self, entries: impl IntoIterator<Item = IntersectionEntry>) {
        let mut pending = Vec::new();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_open {
                return;
            }
            for entry in entries {
                let Some(observed) = inner.observed.get_mut(&entry.element) else {
                    continue;
                };
                let ratio = if entry.ratio.is_finite() { entry.ratio.clamp(0.0, 1.0) } else { 0.0 };
                let band = observed.thresholds.band(ratio);
                let record = VisibilityRecord {
                    element: entry.element,
                    is_intersecting: observed.thresholds.is_intersecting(ratio),
                    ratio,
                };
                let crossed = observed.band != Some(band)
                    || observed.record.map(|r| r.is_intersecting) != Some(record.is_intersecting);
                observed.record = Some(record);
                if crossed {
                    observed.band = Some(band);
                    pending.push((entry.element, observed.token, record));
                }
            }
        }

        for (element, token, record) in pending {
            self.emit(element, token, record);
        }
    }

    /// Measures page-space element rects against the visible page rect and
    /// delivers the result. Hosts without a layout engine of their own use this.
    pub fn measure_layout(
        &self,
        visible: Rect,
        elements: impl IntoIterator<Item = (ElementId, Rect)>,
    ) {
        self.deliver(elements.into_iter().map(|(element, rect)| IntersectionEntry {
            element,
            ratio: rect.coverage_in(visible),
        }));
    }

    pub fn record(&self, element: ElementId) -> Option<VisibilityRecord> {
        self.inner.borrow().observed.get(&element).and_then(|o| o.record)
    }

    pub fn observed_count(&self) -> usize {
        self.inner.borrow().observed.len()
    }

    fn emit(&self, element: ElementId, token: u64, record: VisibilityRecord) {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            match inner.observed.get_mut(&element) {
                Some(o) if o.token == token => o.callback.take(),
                _ => None,
            }
        };
        let Some(mut callback) = callback else { return };

        callback(record);

        // The callback may have unobserved (or re-observed) the element.
        let mut inner = self.inner.borrow_mut();
        if let Some(o) = inner.observed.get_mut(&element) {
            if o.token == token && o.callback.is_none() {
                o.callback = Some(callback);
            }
        }
    }
}

/// Live observation of one element. Dropping it unobserves.
pub struct Observation {
    gate: Weak<RefCell<GateInner>>,
    element: ElementId,
    token: u64,
    active: Cell<bool>,
}

impl Observation {
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stops observing. Idempotent, and safe after the gate itself is gone.
    pub fn unobserve(&self) {
        if !self.active.replace(false) {
            return;
        }
        let Some(gate) = self.gate.upgrade() else { return };
        let Ok(mut inner) = gate.try_borrow_mut() else {
            log::warn!("unobserve of {:?} during gate dispatch ignored", self.element);
            return;
        };
        if inner.observed.get(&self.element).is_some_and(|o| o.token == self.token) {
            inner.observed.remove(&self.element);
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.unobserve();
    }
}
