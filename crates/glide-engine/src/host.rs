//! Host environment contracts.
//!
//! The engine never talks to a platform directly. Whatever embeds it (the winit
//! runtime in this crate, or a test harness) provides these.

use crate::coords::Viewport;
use crate::input::ScrollInput;

/// Reports the current viewport on demand.
pub trait ViewportSource {
    fn viewport(&self) -> Viewport;
}

impl ViewportSource for Viewport {
    fn viewport(&self) -> Viewport {
        *self
    }
}

/// Optional host facilities, feature-detected once at mount.
///
/// Absence of either facility degrades fidelity but is never fatal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HostCapabilities {
    /// The host can report element/viewport intersection.
    pub intersection_observer: bool,
    /// The host can schedule per-frame callbacks.
    pub animation_frames: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            animation_frames: true,
        }
    }
}

/// What a scroll listener did with an input event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputDisposition {
    /// The host should suppress its native scroll handling for this event.
    Consumed,
    /// The host may apply its native handling.
    PassThrough,
}

/// Identifies a registered scroll listener.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(pub u64);

pub type ScrollListener = Box<dyn FnMut(&ScrollInput) -> InputDisposition>;

/// Input listener registry provided by the host.
pub trait InputHost {
    fn add_scroll_listener(&mut self, listener: ScrollListener) -> ListenerId;

    /// Removing an unknown id is a no-op.
    fn remove_scroll_listener(&mut self, id: ListenerId);

    /// Number of currently registered scroll listeners.
    fn scroll_listener_count(&self) -> usize;
}

/// Plain listener list; the host side of [`InputHost`].
///
/// Used by the winit runtime and by tests.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, ScrollListener)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `input` to every listener in registration order.
    ///
    /// Returns `Consumed` if any listener consumed it.
    pub fn dispatch(&mut self, input: &ScrollInput) -> InputDisposition {
        let mut disposition = InputDisposition::PassThrough;
        for (_, listener) in &mut self.listeners {
            if listener(input) == InputDisposition::Consumed {
                disposition = InputDisposition::Consumed;
            }
        }
        disposition
    }
}

impl InputHost for ListenerRegistry {
    fn add_scroll_listener(&mut self, listener: ScrollListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, listener));
        id
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn scroll_listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScrollInput;

    #[test]
    fn dispatch_reports_consumed_if_any_listener_consumes() {
        let mut registry = ListenerRegistry::new();
        registry.add_scroll_listener(Box::new(|_| InputDisposition::PassThrough));
        let consumer = registry.add_scroll_listener(Box::new(|_| InputDisposition::Consumed));

        let input = ScrollInput::pixels(10.0);
        assert_eq!(registry.dispatch(&input), InputDisposition::Consumed);

        registry.remove_scroll_listener(consumer);
        assert_eq!(registry.dispatch(&input), InputDisposition::PassThrough);
        assert_eq!(registry.scroll_listener_count(), 1);
    }

    #[test]
    fn removing_unknown_listener_is_noop() {
        let mut registry = ListenerRegistry::new();
        registry.add_scroll_listener(Box::new(|_| InputDisposition::PassThrough));
        registry.remove_scroll_listener(ListenerId(99));
        assert_eq!(registry.scroll_listener_count(), 1);
    }
}
