use std::cell::{Cell, RefCell};

use crate::coords::Viewport;
use crate::host::{InputDisposition, InputHost, ListenerId};
use crate::input::ScrollInput;

use super::config::ScrollConfig;
use super::smooth::{ScrollState, SmoothScroll};
use super::tease::TeaseId;

/// The live smooth-scroll instance.
///
/// Lifetime rules:
/// - constructed by the first [`SmoothScrollController::attach`]
/// - destroyed by [`SmoothScrollController::detach`] with its handle
/// - scoped to the event-loop thread: the engine is single-threaded and every
///   host callback (input, frames) runs on that thread
struct Instance {
    generation: u64,
    listener: ListenerId,
    scroll: SmoothScroll,
}

thread_local! {
    static INSTANCE: RefCell<Option<Instance>> = const { RefCell::new(None) };
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(1) };
}

/// Owner token for the live scroll instance.
///
/// Handles are cheap copies. A handle whose instance was detached goes stale:
/// every operation through it becomes a no-op, including a second `detach`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScrollHandle {
    generation: u64,
}

/// Entry points to the process-wide smooth-scroll instance.
///
/// Mutation goes through the owning [`ScrollHandle`]; reads (`position`, `state`)
/// are open to every component and never block.
pub struct SmoothScrollController;

impl SmoothScrollController {
    /// Attaches smooth scrolling, registering one input listener with `host`.
    ///
    /// If an instance is already live its handle is returned and nothing new is
    /// registered.
    pub fn attach(config: ScrollConfig, host: &mut dyn InputHost) -> ScrollHandle {
        if let Some(existing) = Self::handle() {
            log::debug!("smooth scroll already attached (generation {})", existing.generation);
            return existing;
        }

        let generation = NEXT_GENERATION.with(|next| {
            let g = next.get();
            next.set(g.wrapping_add(1));
            g
        });

        let listener = host.add_scroll_listener(Box::new(move |input| {
            Self::dispatch(generation, input)
        }));

        INSTANCE.with_borrow_mut(|slot| {
            *slot = Some(Instance {
                generation,
                listener,
                scroll: SmoothScroll::new(config),
            });
        });

        log::debug!("smooth scroll attached (generation {generation})");
        ScrollHandle { generation }
    }

    /// Removes the listener and frees the instance.
    ///
    /// Returns `false` (and does nothing) when `handle` is stale.
    pub fn detach(handle: ScrollHandle, host: &mut dyn InputHost) -> bool {
        match Self::release(handle) {
            Some(listener) => {
                host.remove_scroll_listener(listener);
                true
            }
            None => false,
        }
    }

    /// Frees the instance without a host at hand.
    ///
    /// The listener stays registered with its host but no longer reaches any
    /// instance. Returns its id, or `None` when `handle` is stale.
    pub fn release(handle: ScrollHandle) -> Option<ListenerId> {
        let taken = INSTANCE.with_borrow_mut(|slot| {
            if slot.as_ref().is_some_and(|i| i.generation == handle.generation) {
                slot.take()
            } else {
                None
            }
        });

        taken.map(|instance| {
            log::debug!("smooth scroll detached (generation {})", handle.generation);
            instance.listener
        })
    }

    /// Handle of the live instance, if any.
    pub fn handle() -> Option<ScrollHandle> {
        INSTANCE.with_borrow(|slot| {
            slot.as_ref().map(|i| ScrollHandle { generation: i.generation })
        })
    }

    pub fn is_attached() -> bool {
        Self::handle().is_some()
    }

    /// Current virtual scroll position; `0.0` when nothing is attached.
    pub fn position() -> f32 {
        Self::state().map_or(0.0, |s| s.virtual_position)
    }

    pub fn state() -> Option<ScrollState> {
        INSTANCE.with(|cell| {
            let slot = cell.try_borrow().ok()?;
            slot.as_ref().map(|i| i.scroll.state())
        })
    }

    /// Listener body. Input addressed to a dead generation is ignored.
    fn dispatch(generation: u64, input: &ScrollInput) -> InputDisposition {
        INSTANCE.with(|cell| {
            let Ok(mut slot) = cell.try_borrow_mut() else {
                return InputDisposition::PassThrough;
            };
            match slot.as_mut() {
                Some(instance) if instance.generation == generation => {
                    instance.scroll.apply_input(input)
                }
                _ => InputDisposition::PassThrough,
            }
        })
    }
}

impl ScrollHandle {
    /// Whether this handle still owns the live instance.
    pub fn is_live(self) -> bool {
        SmoothScrollController::handle() == Some(self)
    }

    /// Runs `f` on the instance if this handle owns it.
    pub fn with<R>(self, f: impl FnOnce(&mut SmoothScroll) -> R) -> Option<R> {
        INSTANCE.with(|cell| {
            let mut slot = cell.try_borrow_mut().ok()?;
            match slot.as_mut() {
                Some(instance) if instance.generation == self.generation => {
                    Some(f(&mut instance.scroll))
                }
                _ => None,
            }
        })
    }

    /// Advances the integrator; returns the new position, `None` if stale.
    pub fn tick(self, dt: f32) -> Option<f32> {
        self.with(|s| {
            s.tick(dt);
            s.position()
        })
    }

    pub fn set_extent(self, viewport: Viewport, content_height: f32) -> bool {
        self.with(|s| s.set_extent(viewport, content_height)).is_some()
    }

    pub fn tease(self) -> Option<TeaseId> {
        self.with(SmoothScroll::tease)
    }

    pub fn cancel_tease(self, id: TeaseId) -> bool {
        self.with(|s| s.cancel_tease(id)).unwrap_or(false)
    }

    pub fn scroll_to(self, target: f32, immediate: bool) -> bool {
        self.with(|s| s.scroll_to(target, immediate)).is_some()
    }
}
