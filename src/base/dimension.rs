use russell_tensor::Mandel;

/// Specifies the space dimension of the constitutive model
///
/// The dimension is fixed when the model is instantiated; thus, all Mandel vectors
/// and matrices have a size known by the model type.
pub trait Dimension: Send + Sync + 'static {
    /// Indicates 2D (plane-strain) instead of 3D
    const TWO_DIM: bool;

    /// Holds the Mandel representation of symmetric second-order tensors
    const MANDEL: Mandel;

    /// Holds the number of components of the Mandel (Kelvin) vector
    const KELVIN_SIZE: usize;

    /// Holds the size of the local residual vector and Jacobian matrix
    ///
    /// ```text
    /// 2 × KELVIN_SIZE + 3
    /// ```
    ///
    /// where 2 is the number of tensor-valued unknowns (stress and deviatoric plastic strain)
    /// and 3 is the number of scalar unknowns (volumetric and equivalent plastic strains and λ)
    const LOCAL_SIZE: usize = 2 * Self::KELVIN_SIZE + 3;
}

/// Plane-strain (2D) dimension
#[derive(Clone, Copy, Debug)]
pub struct Dim2;

/// Three-dimensional (3D) dimension
#[derive(Clone, Copy, Debug)]
pub struct Dim3;

impl Dimension for Dim2 {
    const TWO_DIM: bool = true;
    const MANDEL: Mandel = Mandel::Symmetric2D;
    const KELVIN_SIZE: usize = 4;
}

impl Dimension for Dim3 {
    const TWO_DIM: bool = false;
    const MANDEL: Mandel = Mandel::Symmetric;
    const KELVIN_SIZE: usize = 6;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
