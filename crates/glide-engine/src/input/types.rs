/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input (classic wheels); `Pixel` is
/// high precision (trackpads). Positive `y` scrolls the page down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Touch contact phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Keys that scroll the page.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScrollKey {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
}

/// Raw scroll input delivered by the host.
///
/// Devices differ wildly in units and cadence; the scroll controller turns every
/// variant into a pixel delta (see `ScrollConfig::normalize_wheel`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollInput {
    Wheel(MouseWheelDelta),

    /// Touch contact at vertical position `y` (logical px).
    Touch { id: u64, phase: TouchPhase, y: f32 },

    /// Scrollbar dragged to an absolute page position (logical px).
    Scrollbar { position: f32 },

    Key(ScrollKey),
}

impl ScrollInput {
    /// High-precision wheel delta along Y.
    pub const fn pixels(dy: f32) -> Self {
        Self::Wheel(MouseWheelDelta::Pixel { x: 0.0, y: dy })
    }

    /// Line-based wheel delta along Y.
    pub const fn lines(dy: f32) -> Self {
        Self::Wheel(MouseWheelDelta::Line { x: 0.0, y: dy })
    }
}
