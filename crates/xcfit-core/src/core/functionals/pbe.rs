//! Perdew-Burke-Ernzerhof GGA exchange-correlation.
//!
//! Constant layout (24 columns, further columns are ignored):
//!
//! | columns | meaning                                           |
//! |---------|---------------------------------------------------|
//! | 0       | `beta` of the gradient correction                 |
//! | 1       | `gamma = (1 - ln 2) / pi^2`                       |
//! | 2       | `f''(0)` of the PW92 spin interpolation           |
//! | 3..15   | PW92 `beta1..beta4`, three channels each          |
//! | 15..18  | PW92 `A`                                          |
//! | 18..21  | PW92 `alpha1`                                     |
//! | 21      | Slater exchange prefactor                         |
//! | 22      | `kappa`                                           |
//! | 23      | `mu`                                              |

use super::lda::rs_zeta;
use super::pw92::pw92_correlation;
use super::{DENSITY_THRESHOLD, PointInput};
use std::f64::consts::PI;

pub const N_CONSTANTS: usize = 24;

/// Exchange enhancement factor `F_x(s)`.
#[inline]
pub fn exchange_enhancement(s: f64, kappa: f64, mu: f64) -> f64 {
    1.0 + kappa - kappa / (1.0 + mu * s * s / kappa)
}

/// Spin-scaled PBE exchange energy per particle.
///
/// `E_x[rho_a, rho_b] = (E_x[2 rho_a] + E_x[2 rho_b]) / 2`, each channel evaluated with its own
/// reduced gradient unless `enhancement` overrides `F_x`.
pub fn pbe_exchange(point: &PointInput, c: &[f64]) -> f64 {
    let rho = point.density();
    let (lda_x_factor, kappa, mu) = (c[21], c[22], c[23]);
    let channels = [(point.rho_a, point.sigma[0]), (point.rho_b, point.sigma[2])];

    let energy: f64 = channels
        .iter()
        .filter(|(rho_s, _)| *rho_s >= DENSITY_THRESHOLD)
        .map(|&(rho_s, sigma_ss)| {
            let rho2 = 2.0 * rho_s;
            let k_f = (3.0 * PI * PI * rho2).cbrt();
            let s = 2.0 * sigma_ss.max(0.0).sqrt() / (2.0 * k_f * rho2);
            let fx = point
                .enhancement
                .unwrap_or_else(|| exchange_enhancement(s, kappa, mu));
            let e_unif = lda_x_factor * 2.0_f64.powf(-1.0 / 3.0) * rho2.cbrt();
            rho_s * e_unif * fx
        })
        .sum();

    energy / rho
}

/// PBE correlation energy per particle: PW92 plus the gradient correction `H`.
pub fn pbe_correlation(point: &PointInput, c: &[f64]) -> f64 {
    let (beta, gamma) = (c[0], c[1]);
    let rho = point.density();
    let (rs, zeta) = rs_zeta(point.rho_a, point.rho_b);
    let ec_lsda = pw92_correlation(rs, zeta, c);

    let phi = ((1.0 + zeta).powf(2.0 / 3.0) + (1.0 - zeta).powf(2.0 / 3.0)) / 2.0;
    let phi3 = phi.powi(3);
    let k_f = (3.0 * PI * PI * rho).cbrt();
    let k_s = (4.0 * k_f / PI).sqrt();
    let grad = (point.sigma[0] + 2.0 * point.sigma[1] + point.sigma[2])
        .max(0.0)
        .sqrt();
    let t = grad / (2.0 * phi * k_s * rho);
    let t2 = t * t;

    let a = beta / gamma / ((-ec_lsda / (gamma * phi3)).exp() - 1.0);
    let at2 = a * t2;
    let h = gamma * phi3 * (1.0 + beta / gamma * t2 * (1.0 + at2) / (1.0 + at2 + at2 * at2)).ln();

    ec_lsda + h
}

pub fn pbe(point: &PointInput, c: &[f64]) -> f64 {
    if point.density() < DENSITY_THRESHOLD {
        return 0.0;
    }
    pbe_exchange(point, c) + pbe_correlation(point, c)
}
