//! Engine selection and numeric settings.
//!
//! Everything here is a plain value type: build one with `Default` or a named
//! constructor, tweak it with the `with_*` builders, and hand it to
//! [`CircuitFactory`][crate::circuit::CircuitFactory], which validates it and
//! builds the engines.

use std::sync::Arc;
use crate::{
    error::ConfigError,
    matrix::DEFAULT_TOLERANCE,
    parallel::WorkerPool,
    statevector::{
        DirectStatevectorTransformation,
        ElementByElementStatevectorTransformation,
        MatrixStatevectorTransformation,
        RowByRowStatevectorTransformation,
        StatevectorTransformation,
    },
};

/// Which statevector engine to use, and with how many workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatevectorConfiguration {
    /// Update amplitudes directly from the gate matrix.
    Direct { max_concurrency: usize },
    /// Build the full circuit-scale matrix for every gate.
    Matrix { max_concurrency: usize },
    /// Build one circuit-scale row at a time.
    RowByRow { max_concurrency: usize },
    /// Evaluate circuit-scale matrix elements one by one.
    ElementByElement { max_concurrency: usize },
}

impl Default for StatevectorConfiguration {
    fn default() -> Self { Self::Direct { max_concurrency: 1 } }
}

impl StatevectorConfiguration {
    pub fn max_concurrency(&self) -> usize {
        match self {
            Self::Direct { max_concurrency }
            | Self::Matrix { max_concurrency }
            | Self::RowByRow { max_concurrency }
            | Self::ElementByElement { max_concurrency }
            => *max_concurrency,
        }
    }

    /// Build the engine this configuration describes.
    pub fn make_transformation(&self)
        -> Result<Arc<dyn StatevectorTransformation>, ConfigError>
    {
        let pool = WorkerPool::new(self.max_concurrency())?;
        let transformation: Arc<dyn StatevectorTransformation>
            = match self {
                Self::Direct { .. }
                    => Arc::new(DirectStatevectorTransformation::new(pool)),
                Self::Matrix { .. }
                    => Arc::new(MatrixStatevectorTransformation::new(pool)),
                Self::RowByRow { .. }
                    => Arc::new(RowByRowStatevectorTransformation::new(pool)),
                Self::ElementByElement { .. }
                    => Arc::new(ElementByElementStatevectorTransformation::new(pool)),
            };
        Ok(transformation)
    }
}

/// Worker count for the unitary engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnitaryConfiguration {
    pub max_concurrency: usize,
}

impl Default for UnitaryConfiguration {
    fn default() -> Self { Self { max_concurrency: 1 } }
}

/// Worker count for the density-matrix engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DensityMatrixConfiguration {
    pub max_concurrency: usize,
}

impl Default for DensityMatrixConfiguration {
    fn default() -> Self { Self { max_concurrency: 1 } }
}

/// Full simulator configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    pub statevector: StatevectorConfiguration,
    pub unitary: UnitaryConfiguration,
    pub density_matrix: DensityMatrixConfiguration,
    /// Bound used when checking normalization, unitarity and the density
    /// matrix invariants of results.
    pub tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            statevector: StatevectorConfiguration::default(),
            unitary: UnitaryConfiguration::default(),
            density_matrix: DensityMatrixConfiguration::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SimulatorConfig {
    /// Use `max_concurrency` workers in every engine.
    pub fn parallel(max_concurrency: usize) -> Self {
        Self {
            statevector: StatevectorConfiguration::Direct { max_concurrency },
            unitary: UnitaryConfiguration { max_concurrency },
            density_matrix: DensityMatrixConfiguration { max_concurrency },
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_statevector(mut self, statevector: StatevectorConfiguration) -> Self {
        self.statevector = statevector;
        self
    }

    pub fn with_unitary(mut self, unitary: UnitaryConfiguration) -> Self {
        self.unitary = unitary;
        self
    }

    pub fn with_density_matrix(mut self, density_matrix: DensityMatrixConfiguration) -> Self {
        self.density_matrix = density_matrix;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::ToleranceHasToBePositive(self.tolerance));
        }
        let counts = [
            self.statevector.max_concurrency(),
            self.unitary.max_concurrency,
            self.density_matrix.max_concurrency,
        ];
        if counts.contains(&0) {
            return Err(ConfigError::MaxConcurrencyHasToBeBiggerThanZero);
        }
        Ok(())
    }
}
