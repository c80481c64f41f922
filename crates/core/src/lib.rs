//! Core units, constants, and shared primitives for the Orrery workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravitational parameter of the Sun (m³/s²).
    pub const MU_SUN: f64 = 1.327_124_400_18e20;
    /// Metres per astronomical unit as used for display scaling.
    pub const AU_M: f64 = 1.496e11;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per Julian year.
    pub const DAYS_PER_YEAR: f64 = 365.25;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_M;

    /// Convert astronomical units to metres.
    #[inline]
    pub fn au_to_m(v: f64) -> f64 {
        v * AU_M
    }

    /// Convert metres to astronomical units.
    #[inline]
    pub fn m_to_au(v: f64) -> f64 {
        v / AU_M
    }

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{DAYS_PER_YEAR, SECONDS_PER_DAY};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert Julian years to seconds.
    #[inline]
    pub fn years_to_seconds(years: f64) -> f64 {
        years * DAYS_PER_YEAR * SECONDS_PER_DAY
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in metres or m/s depending on context.
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Linear interpolation `(1 - alpha) * a + alpha * b`.
    #[inline]
    pub fn lerp(a: &Vector3, b: &Vector3, alpha: f64) -> Vector3 {
        add(&scale(a, 1.0 - alpha), &scale(b, alpha))
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

/// Wrap a computed value as "no value" when arithmetic produced NaN or ±∞.
///
/// Every transfer and porkchop figure passes through here at the point of
/// computation, so callers only ever see `Some(finite)` or `None`.
#[inline]
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
