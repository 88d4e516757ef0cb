/// Hartree to kcal/mol.
pub const HARTREE_TO_KCAL: f64 = 627.5095;

#[inline]
pub fn hartree_to_kcal(energy: f64) -> f64 {
    energy * HARTREE_TO_KCAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_one_hartree() {
        assert_eq!(hartree_to_kcal(1.0), 627.5095);
        assert_eq!(hartree_to_kcal(-0.5), -313.75475);
    }
}
