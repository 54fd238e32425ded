//! Easing curves for the breath pulse and the intro pop.
//!
//! Both take and return a progress value in `0.0 ..= 1.0`.

/// Quadratic ease-in-out (GSAP `power1.inOut`).
pub fn power1_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out (GSAP `power2.out`).
pub fn power2_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Quartic ease-out (GSAP `power3.out`).
pub fn power3_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// Inverse of [`power1_in_out`]: the progress at which the curve reaches `y`.
pub fn power1_in_out_inverse(y: f64) -> f64 {
    let y = y.clamp(0.0, 1.0);
    if y < 0.5 {
        (y / 2.0).sqrt()
    } else {
        1.0 - (2.0 * (1.0 - y)).sqrt() / 2.0
    }
}
