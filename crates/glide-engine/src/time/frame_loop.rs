/// Proof that a frame callback is currently running.
///
/// Returned by [`FrameLoop::begin`] and handed back to [`FrameLoop::end`].
#[derive(Debug)]
#[must_use = "a frame must be ended with FrameLoop::end"]
pub struct FrameToken {
    frame_index: u64,
}

impl FrameToken {
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

/// Guards the per-frame render callback.
///
/// - at most one callback is in flight; a request that arrives while one runs is
///   refused and the host simply schedules the next frame later
/// - after [`FrameLoop::stop`] every callback is refused, so a frame that was
///   already queued by the host when teardown happened does nothing
#[derive(Debug, Default)]
pub struct FrameLoop {
    alive: bool,
    in_flight: bool,
    frames: u64,
}

impl FrameLoop {
    /// Creates a live loop.
    pub fn new() -> Self {
        Self {
            alive: true,
            in_flight: false,
            frames: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn frames_run(&self) -> u64 {
        self.frames
    }

    /// Starts a frame, or `None` if the loop is stopped or a frame is already running.
    pub fn begin(&mut self) -> Option<FrameToken> {
        if !self.alive || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(FrameToken { frame_index: self.frames })
    }

    pub fn end(&mut self, token: FrameToken) {
        debug_assert_eq!(token.frame_index, self.frames);
        self.in_flight = false;
        self.frames = self.frames.wrapping_add(1);
    }

    /// Marks the loop dead. Idempotent.
    pub fn stop(&mut self) {
        self.alive = false;
    }
}
