//! Easing curves over normalized time `t ∈ [0, 1]`.
//!
//! Inputs outside the unit interval are clamped.

/// Cubic ease-in-out.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
    }
}

/// Exponential ease-out, the curve used for programmatic `scroll_to`.
pub fn ease_out_expo(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 { 1.0 } else { 1.0 - 2f32.powf(-10.0 * t) }
}
