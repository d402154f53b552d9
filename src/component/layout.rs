//! Error-state layout
//!
//! The estimator stacks the error states of all its components into one vector. An
//! [`ErrorStateLayout`] records which contiguous block belongs to which component and
//! routes each block, converted to the right correction type, into that component.

use crate::component::inject::{correction_from_slice, Coordinates, TangentDim};
use crate::component::{Component, Correction, State};
use crate::error::{EstimableError, EstimableResult};
use nalgebra::DVector;
use std::ops::Range;
use tracing::debug;

/// One component's slice of the error-state vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    name: String,
    offset: usize,
    dof: usize,
}

impl Block {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn dof(&self) -> usize {
        self.dof
    }

    /// Index range of this block inside the error-state vector.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.dof
    }
}

/// Ordered, contiguous blocks of an estimator's error-state vector.
///
/// # Example
/// ```rust
/// use estimable::component::ErrorStateLayout;
/// use estimable::manifold::so3::SO3;
/// use nalgebra::Vector3;
///
/// # fn main() -> estimable::error::EstimableResult<()> {
/// let layout = ErrorStateLayout::new()
///     .with_component::<SO3>("attitude")?
///     .with_component::<Vector3<f64>>("gyro_bias")?
///     .with_block("camera_intrinsics", 4)?;
///
/// assert_eq!(layout.dim(), 10);
/// assert_eq!(layout.block("gyro_bias").map(|b| b.range()), Some(3..6));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStateLayout {
    blocks: Vec<Block>,
    dim: usize,
}

impl ErrorStateLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of `dof` coordinates.
    pub fn with_block(mut self, name: impl Into<String>, dof: usize) -> EstimableResult<Self> {
        let name = name.into();
        if dof == 0 {
            return Err(EstimableError::InvalidBlock(format!(
                "{name} has zero degrees of freedom"
            )));
        }
        if self.block(&name).is_some() {
            return Err(EstimableError::DuplicateBlock(name));
        }

        self.blocks.push(Block {
            name,
            offset: self.dim,
            dof,
        });
        self.dim += dof;
        Ok(self)
    }

    /// Append a block sized by the correction type of `S`.
    ///
    /// Dynamically sized corrections (e.g. `DVector<f64>`) need [`with_block`](Self::with_block).
    pub fn with_component<S>(self, name: impl Into<String>) -> EstimableResult<Self>
    where
        S: State,
        Correction<S>: Coordinates,
    {
        let name = name.into();
        match <Correction<S> as Coordinates>::DOF {
            Some(dof) => self.with_block(name, dof),
            None => Err(EstimableError::InvalidBlock(format!(
                "{name} has a dynamically sized correction, use with_block"
            ))),
        }
    }

    /// Total dimension of the error-state vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    fn check_dim(&self, error_state: &DVector<f64>) -> EstimableResult<()> {
        if error_state.len() != self.dim {
            return Err(EstimableError::DimensionMismatch {
                expected: self.dim,
                actual: error_state.len(),
            });
        }
        Ok(())
    }

    /// Slice of `error_state` belonging to the block `name`.
    pub fn segment<'a>(&self, name: &str, error_state: &'a DVector<f64>) -> EstimableResult<&'a [f64]> {
        self.check_dim(error_state)?;
        let block = self
            .block(name)
            .ok_or_else(|| EstimableError::UnknownBlock(name.to_string()))?;
        Ok(&error_state.as_slice()[block.range()])
    }

    /// Inject the block `name` of `error_state` into `component`.
    ///
    /// The block must be as wide as the component's current error state, which matters
    /// for dynamically sized states. The component's nominal state is left untouched
    /// when an error is returned.
    pub fn inject<C>(&self, name: &str, component: &mut C, error_state: &DVector<f64>) -> EstimableResult<()>
    where
        C: Component,
        C::State: TangentDim,
        Correction<C::State>: Coordinates,
    {
        let values = self.segment(name, error_state)?;
        let expected = component.state().tangent_dim();
        if values.len() != expected {
            return Err(EstimableError::DimensionMismatch {
                expected,
                actual: values.len(),
            });
        }
        let correction = correction_from_slice::<C::State>(values)?;
        debug!(block = name, dof = values.len(), "injecting error-state correction");
        component.update_state(&correction);
        Ok(())
    }
}
