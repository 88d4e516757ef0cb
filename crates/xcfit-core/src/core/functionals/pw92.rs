//! Perdew-Wang 1992 local spin-density correlation, with its parameters read from the PBE
//! constant row (see [`super::pbe`] for the layout).

use super::lda::spin_interpolation;

/// Parameters of one PW92 fit channel (0 paramagnetic, 1 ferromagnetic, 2 spin stiffness).
#[derive(Debug, Clone, Copy)]
struct Pw92Channel {
    a: f64,
    alpha1: f64,
    beta: [f64; 4],
}

impl Pw92Channel {
    fn from_constants(c: &[f64], channel: usize) -> Self {
        Self {
            a: c[15 + channel],
            alpha1: c[18 + channel],
            beta: [
                c[3 + channel],
                c[6 + channel],
                c[9 + channel],
                c[12 + channel],
            ],
        }
    }

    fn eval(&self, rs: f64) -> f64 {
        let sqrt_rs = rs.sqrt();
        let [b1, b2, b3, b4] = self.beta;
        let denominator = 2.0 * self.a * (b1 * sqrt_rs + b2 * rs + b3 * rs * sqrt_rs + b4 * rs * rs);
        -2.0 * self.a * (1.0 + self.alpha1 * rs) * (1.0 + 1.0 / denominator).ln()
    }
}

/// PW92 correlation energy per particle; `c[2]` is `f''(0)`.
pub fn pw92_correlation(rs: f64, zeta: f64, c: &[f64]) -> f64 {
    let fz20 = c[2];
    let g0 = Pw92Channel::from_constants(c, 0).eval(rs);
    let g1 = Pw92Channel::from_constants(c, 1).eval(rs);
    let g2 = Pw92Channel::from_constants(c, 2).eval(rs);
    let fz = spin_interpolation(zeta);
    let z4 = zeta.powi(4);

    g0 + z4 * fz * (g1 - g0 + g2 / fz20) - fz * g2 / fz20
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::functionals::reference::PBE_REFERENCE;

    #[test]
    fn unpolarized_value_at_rs_one() {
        let ec = pw92_correlation(1.0, 0.0, &PBE_REFERENCE);
        assert!((ec - (-0.059_773_864_184_404_085)).abs() < 1e-9);
    }

    #[test]
    fn partially_polarized_value() {
        let ec = pw92_correlation(2.0, 0.5, &PBE_REFERENCE);
        assert!((ec - (-0.040_739_706_500_927_376)).abs() < 1e-9);
    }

    #[test]
    fn fully_polarized_limit_is_ferromagnetic_channel() {
        let ec = pw92_correlation(1.0, 1.0, &PBE_REFERENCE);
        let ferro = Pw92Channel::from_constants(&PBE_REFERENCE, 1).eval(1.0);
        assert!((ec - ferro).abs() < 1e-12);
        assert!((ec - (-0.031_592_478_127_710_37)).abs() < 1e-9);
    }
}
