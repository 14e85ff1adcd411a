use super::SurfaceErrorAction;

/// sRGB formats first when `prefer_srgb`, else whatever the surface lists first.
pub(crate) fn pick_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    prefer_srgb
        .then(|| srgb.into_iter().find(|f| caps.formats.contains(f)))
        .flatten()
        .or_else(|| caps.formats.first().copied())
}

/// A blending mode when `transparent` and the surface offers one, else opaque.
pub(crate) fn pick_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    let blended = [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ];
    let preferred = if transparent {
        blended.into_iter().find(|m| caps.alpha_modes.contains(m))
    } else {
        None
    };
    preferred
        .or_else(|| {
            caps.alpha_modes
                .contains(&wgpu::CompositeAlphaMode::Opaque)
                .then_some(wgpu::CompositeAlphaMode::Opaque)
        })
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Classifies a surface error. Lost/outdated surfaces are reconfigured by the caller.
pub(crate) fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}
