use super::ConfigNonlinearSolver;
use crate::StrError;
use russell_lab::{mat_copy, solve_lin_sys, vec_copy, vec_norm, vec_update, Matrix, Norm, Vector};

/// Holds the parameters of the local Newton-Raphson solver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonRaphsonParams {
    /// Maximum number of iterations
    ///
    /// **Note:** Zero is allowed; then, no iteration is ever performed and all solutions fail.
    /// Otherwise, the residual is evaluated once more after the last correction.
    pub maximum_iterations: usize,

    /// Tolerance on the Euclidean norm of the residual vector
    pub error_tolerance: f64,

    /// Prints the norm of the residual at each iteration
    pub verbose: bool,
}

impl NewtonRaphsonParams {
    /// Allocates a new instance
    pub fn new(maximum_iterations: usize, error_tolerance: f64) -> Result<Self, StrError> {
        if !(error_tolerance > 0.0) {
            return Err("error_tolerance must be > 0.0");
        }
        Ok(NewtonRaphsonParams {
            maximum_iterations,
            error_tolerance,
            verbose: false,
        })
    }

    /// Allocates a new instance from the configuration
    pub fn from_config(config: &ConfigNonlinearSolver) -> Result<Self, StrError> {
        let mut params = NewtonRaphsonParams::new(config.maximum_iterations, config.error_tolerance)?;
        params.verbose = config.verbose;
        Ok(params)
    }
}

/// Holds the outcome of the Newton-Raphson iterations
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NewtonOutcome {
    /// The norm of the residual became smaller than the tolerance
    Converged {
        /// Number of corrections performed before convergence
        iterations: usize,

        /// Norm of the residual at convergence
        norm_rr: f64,
    },

    /// The iterations budget was exhausted, the residual became NaN/Inf, or the Jacobian became singular
    Diverged {
        /// Number of corrections performed
        iterations: usize,
    },
}

impl NewtonOutcome {
    /// Indicates convergence
    pub fn converged(&self) -> bool {
        matches!(self, NewtonOutcome::Converged { .. })
    }
}

/// Implements a plain (undamped) Newton-Raphson solver for small dense systems
///
/// ```text
/// for k in 0..=max:
///     r, J ← F(x)
///     if ‖r‖ < tol: converged
///     if k == max: diverged
///     J Δx = -r
///     x ← x + Δx
/// ```
pub struct NewtonRaphson {
    /// Holds the parameters
    params: NewtonRaphsonParams,

    /// Holds the residual vector
    rr: Vector,

    /// Holds the Jacobian matrix (at the last evaluation)
    jj: Matrix,

    /// Holds a copy of the Jacobian matrix that is destroyed by the linear solver
    kk: Matrix,

    /// Holds the (minus) correction vector
    mdx: Vector,
}

impl NewtonRaphson {
    /// Allocates a new instance
    pub fn new(params: NewtonRaphsonParams, size: usize) -> Self {
        NewtonRaphson {
            params,
            rr: Vector::new(size),
            jj: Matrix::new(size, size),
            kk: Matrix::new(size, size),
            mdx: Vector::new(size),
        }
    }

    /// Returns the Jacobian matrix corresponding to the last evaluation
    ///
    /// After convergence, this is the Jacobian at the solution.
    pub fn jacobian(&self) -> &Matrix {
        &self.jj
    }

    /// Returns the residual vector corresponding to the last evaluation
    pub fn residual(&self) -> &Vector {
        &self.rr
    }

    /// Solves the nonlinear system r(x) = 0
    ///
    /// # Input
    ///
    /// * `x` -- the initial guess; it will hold the solution on output
    /// * `calc_rr_and_jj` -- a function `(r, J, x)` that computes the residual and Jacobian at x
    ///
    /// # Output
    ///
    /// Returns the outcome of the iterations. An error is only returned if the callback fails.
    pub fn solve<F>(&mut self, x: &mut Vector, mut calc_rr_and_jj: F) -> Result<NewtonOutcome, StrError>
    where
        F: FnMut(&mut Vector, &mut Matrix, &Vector) -> Result<(), StrError>,
    {
        let size = self.rr.dim();
        if x.dim() != size {
            return Err("the dimension of x is incompatible with the Newton-Raphson solver");
        }
        let max = self.params.maximum_iterations;
        if max == 0 {
            return Ok(NewtonOutcome::Diverged { iterations: 0 });
        }
        for iteration in 0..=max {
            // residual and Jacobian
            calc_rr_and_jj(&mut self.rr, &mut self.jj, x)?;

            // check convergence
            let norm_rr = vec_norm(&self.rr, Norm::Euc);
            if self.params.verbose {
                println!("{:>5} {:>13.6e}", iteration, norm_rr);
            }
            if !norm_rr.is_finite() {
                return Ok(NewtonOutcome::Diverged { iterations: iteration });
            }
            if norm_rr < self.params.error_tolerance {
                return Ok(NewtonOutcome::Converged { iterations: iteration, norm_rr });
            }
            if iteration == max {
                break;
            }

            // solve the linear system J mdx = r (the factorization destroys the matrix)
            vec_copy(&mut self.mdx, &self.rr)?;
            mat_copy(&mut self.kk, &self.jj)?;
            if solve_lin_sys(&mut self.mdx, &mut self.kk).is_err() {
                return Ok(NewtonOutcome::Diverged { iterations: iteration });
            }

            // update x ← x - mdx
            vec_update(x, -1.0, &self.mdx)?;
        }
        Ok(NewtonOutcome::Diverged { iterations: max })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
