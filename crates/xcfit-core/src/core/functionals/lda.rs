//! Local spin-density exchange: Slater exchange and its X-Alpha scaling.

use super::{DENSITY_THRESHOLD, PointInput};
use std::f64::consts::PI;

/// `-3/8 (3/pi)^(1/3) 4^(2/3)`
pub const LDA_X_FACTOR: f64 = -0.930_525_736_349_100_0;
/// `(3 / (4 pi))^(1/3)`
pub const RS_FACTOR: f64 = 0.620_350_490_899_400_1;

/// Wigner-Seitz radius and spin polarization of a grid point.
///
/// `zeta` is clamped to `[-1, 1]` so that fractional powers of `1 +- zeta` stay real.
#[inline]
pub fn rs_zeta(rho_a: f64, rho_b: f64) -> (f64, f64) {
    let rho = rho_a + rho_b;
    let rs = (3.0 / (4.0 * PI * rho)).cbrt();
    let zeta = ((rho_a - rho_b) / rho).clamp(-1.0, 1.0);
    (rs, zeta)
}

/// Spin interpolation function `f(zeta)`, zero for unpolarized and one for fully polarized
/// densities.
#[inline]
pub fn spin_interpolation(zeta: f64) -> f64 {
    ((1.0 + zeta).powf(4.0 / 3.0) + (1.0 - zeta).powf(4.0 / 3.0) - 2.0)
        / (2.0_f64.powf(4.0 / 3.0) - 2.0)
}

#[inline]
fn exchange_spin_channel(rs: f64, zeta: f64, lda_x_factor: f64) -> f64 {
    lda_x_factor * (1.0 + zeta).powf(4.0 / 3.0) * 2.0_f64.powf(-4.0 / 3.0) * (RS_FACTOR / rs)
}

/// Slater exchange energy per particle.
#[inline]
pub fn slater_exchange(rs: f64, zeta: f64, lda_x_factor: f64) -> f64 {
    exchange_spin_channel(rs, zeta, lda_x_factor) + exchange_spin_channel(rs, -zeta, lda_x_factor)
}

/// X-Alpha: Slater exchange scaled by `c[0]` (1.05 for the conventional alpha = 0.7).
pub fn xalpha(point: &PointInput, c: &[f64]) -> f64 {
    let rho = point.density();
    if rho < DENSITY_THRESHOLD {
        return 0.0;
    }
    let (rs, zeta) = rs_zeta(point.rho_a, point.rho_b);
    c[0] * slater_exchange(rs, zeta, LDA_X_FACTOR)
}
