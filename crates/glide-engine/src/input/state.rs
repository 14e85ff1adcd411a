use std::collections::HashMap;

use super::types::TouchPhase;

/// Tracks active touch contacts and turns their motion into scroll deltas.
///
/// Only the first contact drives scrolling; additional fingers are remembered so
/// that lifting the primary one does not produce a jump when another takes over.
#[derive(Debug, Default)]
pub struct TouchTracker {
    /// Last known vertical position per contact.
    contacts: HashMap<u64, f32>,

    /// Contact currently driving the scroll.
    primary: Option<u64>,
}

impl TouchTracker {
    /// Applies a touch event and returns the page delta it implies.
    ///
    /// Dragging a finger up scrolls the page down, so the delta is the negated
    /// finger motion.
    pub fn apply(&mut self, id: u64, phase: TouchPhase, y: f32) -> Option<f32> {
        match phase {
            TouchPhase::Started => {
                self.contacts.insert(id, y);
                if self.primary.is_none() {
                    self.primary = Some(id);
                }
                None
            }

            TouchPhase::Moved => {
                let last = self.contacts.get_mut(&id)?;
                let previous = std::mem::replace(last, y);
                if self.primary == Some(id) {
                    Some(previous - y)
                } else {
                    None
                }
            }

            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.contacts.remove(&id);
                if self.primary == Some(id) {
                    self.primary = self.contacts.keys().min().copied();
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_drag_scrolls_down() {
        let mut t = TouchTracker::default();
        assert_eq!(t.apply(1, TouchPhase::Started, 500.0), None);
        assert_eq!(t.apply(1, TouchPhase::Moved, 440.0), Some(60.0));
        assert_eq!(t.apply(1, TouchPhase::Moved, 460.0), Some(-20.0));
    }

    #[test]
    fn secondary_finger_takes_over_without_jump() {
        let mut t = TouchTracker::default();
        t.apply(1, TouchPhase::Started, 500.0);
        t.apply(2, TouchPhase::Started, 300.0);
        assert_eq!(t.apply(2, TouchPhase::Moved, 250.0), None);

        t.apply(1, TouchPhase::Ended, 500.0);
        assert_eq!(t.apply(2, TouchPhase::Moved, 240.0), Some(10.0));
    }

    #[test]
    fn move_without_start_is_ignored() {
        let mut t = TouchTracker::default();
        assert_eq!(t.apply(7, TouchPhase::Moved, 10.0), None);
        assert_eq!(t.apply(7, TouchPhase::Moved, 20.0), None);
        assert!(t.contacts.is_empty());
    }

    #[test]
    fn unstarted_contact_never_takes_over() {
        let mut t = TouchTracker::default();
        t.apply(5, TouchPhase::Started, 500.0);
        assert_eq!(t.apply(2, TouchPhase::Moved, 300.0), None);

        t.apply(5, TouchPhase::Ended, 500.0);
        assert!(t.contacts.is_empty());
        assert_eq!(t.primary, None);
        assert_eq!(t.apply(2, TouchPhase::Moved, 200.0), None);
    }
}
