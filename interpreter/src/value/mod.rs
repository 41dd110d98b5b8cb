mod poly;

pub use poly::Polynomial;

/// Polynomials of this degree or above are rejected.
pub const MAX_DEGREE: usize = 255;

pub trait Expression: Sized + Clone {
    fn evaluate(&self, x: f64) -> f64;
    fn derivative(&self) -> Self;
    fn as_num(&self) -> Option<f64>;
    fn degree(&self) -> usize;
}
