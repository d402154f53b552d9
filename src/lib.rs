//! # Estimable
//!
//! Statically-typed nominal-state components for error-state estimators (ESKF-style
//! visual-inertial navigation and friends).
//!
//! Each estimable module (IMU, camera, feature group, ...) keeps its own nominal state
//! and implements [`Component`]. The estimator reads that state to linearize and injects
//! its solved correction back through [`Component::update_state`], whose argument type is
//! fixed at compile time by the state's geometry:
//!
//! - **Euclidean states** (`f64`, `SVector<f64, D>`, `DVector<f64>`): the correction has the
//!   state's own type and composes by addition.
//! - **Manifold states** ([`SO3`], [`SE3`]): the correction is the tangent type and composes
//!   through the exponential map.
//!
//! ## Modules
//!
//! - [`component`]: the `State`/`Component` contract, composition helpers and the error-state layout
//! - [`manifold`]: Lie groups used as nominal states
//! - [`error`]: error and result types for the flat error-state plumbing
//! - [`logger`]: `tracing` subscriber setup

pub mod component;
pub mod error;
pub mod logger;
pub mod manifold;

pub use component::{
    add_in_place, has_tangent, plus_in_place, Component, Correction, Coordinates, ErrorStateLayout,
    Euclidean, HasTangent, OnManifold, State, TangentDim,
};
pub use error::{EstimableError, EstimableResult};
pub use logger::{init_logger, init_logger_with_level};
pub use manifold::se3::{SE3Tangent, SE3};
pub use manifold::so3::{SO3Tangent, SO3};
pub use manifold::{LieGroup, Tangent};
