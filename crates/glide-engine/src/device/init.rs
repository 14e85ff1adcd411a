/// How the GPU context is set up for a presentation window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Pace frames to the display. Scroll smoothing assumes steady frame
    /// deltas, so turning this off is mostly useful for profiling.
    pub vsync: bool,

    /// Composite the window over the desktop using the scene's alpha.
    pub transparent: bool,

    pub power_preference: wgpu::PowerPreference,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: true,
            transparent: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}
