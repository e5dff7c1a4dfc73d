// Numerical primitives used by the modulation inverter
//
// Scalar only: adaptive quadrature with error estimate, bounded minimizer
// and a secant root finder.

pub mod minimize;
pub mod quadrature;
pub mod roots;

pub use minimize::{minimize_bounded, Minimum};
pub use quadrature::{integrate, Quadrature, QuadratureFailure};
pub use roots::{secant, RootFailure, RootOutcome};
