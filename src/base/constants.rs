/// Defines the directory where the output files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/minkley/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/minkley/test";

/// Defines the tolerance below which an increment of equivalent plastic strain is considered null
pub const TOL_EPS_P_EFF_INCREMENT: f64 = 1e-16;

/// Defines the (dimensionless) tolerance on √J2/G below which the Lode dependence is ignored
pub const TOL_SQRT_JJ2: f64 = 1e-10;
