/// modified Bessel functions, complete elliptic integral of the first kind, gamma function
pub mod special_functions;
/// derivative-free minimization of functions of one variable (Nelder-Mead simplex)
pub mod optimization;
/// adaptive Gauss-Legendre quadrature
pub mod integration;
