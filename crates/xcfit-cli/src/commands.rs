pub mod evaluate;
pub mod functionals;
