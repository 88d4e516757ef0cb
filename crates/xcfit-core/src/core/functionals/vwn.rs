//! SVWN3: Slater exchange plus Vosko-Wilk-Nusair (form III) correlation.
//!
//! Constant layout (21 columns):
//!
//! | columns  | meaning                                                   |
//! |----------|-----------------------------------------------------------|
//! | 0..2     | `A` of the VWN paramagnetic / ferromagnetic fits          |
//! | 2..4     | `b`                                                       |
//! | 4..6     | `c`                                                       |
//! | 6..8     | `x0`                                                      |
//! | 8..11    | `A` of the RPA paramagnetic / ferromagnetic / stiffness fits |
//! | 11..14   | `b` (RPA)                                                 |
//! | 14..17   | `c` (RPA)                                                 |
//! | 17..20   | `x0` (RPA)                                                |
//! | 20       | exchange scale                                            |

use super::lda::{LDA_X_FACTOR, rs_zeta, slater_exchange, spin_interpolation};
use super::{DENSITY_THRESHOLD, PointInput};

pub const N_CONSTANTS: usize = 21;

/// `f''(0)` of the spin interpolation function.
const FPP_VWN: f64 = 1.709_920_934_161_365_3;

#[derive(Debug, Clone, Copy)]
struct VwnFit {
    a: f64,
    b: f64,
    c: f64,
    x0: f64,
}

impl VwnFit {
    /// Fit `channel` of the VWN block (channels 0, 1).
    fn vwn(c: &[f64], channel: usize) -> Self {
        Self {
            a: c[channel],
            b: c[2 + channel],
            c: c[4 + channel],
            x0: c[6 + channel],
        }
    }

    /// Fit `channel` of the RPA block (channels 0, 1, 2).
    fn rpa(c: &[f64], channel: usize) -> Self {
        Self {
            a: c[8 + channel],
            b: c[11 + channel],
            c: c[14 + channel],
            x0: c[17 + channel],
        }
    }

    /// The VWN interpolation formula at `rs`.
    fn eval(&self, rs: f64) -> f64 {
        let Self { a, b, c, x0 } = *self;
        let x = rs.sqrt();
        let big_x = rs + b * x + c;
        let q = (4.0 * c - b * b).abs().sqrt();
        let f1 = 2.0 * b / q;
        let f2 = b * x0 / (x0 * x0 + b * x0 + c);
        let f3 = 2.0 * (2.0 * x0 + b) / q;

        a * ((rs / big_x).ln() + (f1 - f2 * f3) * (q / (2.0 * x + b)).atan()
            - f2 * ((x - x0).powi(2) / big_x).ln())
    }
}

/// VWN3 correlation energy per particle.
pub fn vwn3_correlation(rs: f64, zeta: f64, c: &[f64]) -> f64 {
    let para = VwnFit::vwn(c, 0).eval(rs);
    let delta_mc = VwnFit::vwn(c, 1).eval(rs) - para;
    let delta_rpa = VwnFit::rpa(c, 1).eval(rs) - VwnFit::rpa(c, 0).eval(rs);
    let stiffness = VwnFit::rpa(c, 2).eval(rs);

    let fz = spin_interpolation(zeta);
    let z4 = zeta.powi(4);

    para + delta_mc / delta_rpa * stiffness * fz * (1.0 - z4) / FPP_VWN + delta_mc * fz * z4
}

pub fn svwn3(point: &PointInput, c: &[f64]) -> f64 {
    let rho = point.density();
    if rho < DENSITY_THRESHOLD {
        return 0.0;
    }
    let (rs, zeta) = rs_zeta(point.rho_a, point.rho_b);
    c[20] * slater_exchange(rs, zeta, LDA_X_FACTOR) + vwn3_correlation(rs, zeta, c)
}
