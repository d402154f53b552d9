//! Composition rules for injecting corrections into nominal states
//!
//! Components pick the rule that matches their state's geometry:
//! [`add_in_place`] for Euclidean states and [`plus_in_place`] for Lie group states.
//! The bounds make the wrong pairing a compile error, e.g. adding a rotation vector to
//! a quaternion.
//!
//! [`Coordinates`] is the bridge from the estimator's flat error-state vector to typed
//! corrections. [`TangentDim`] tells how many of those coordinates a given state takes.

use crate::component::{Correction, Euclidean, OnManifold, State};
use crate::error::{EstimableError, EstimableResult};
use crate::manifold::se3::{SE3Tangent, SE3};
use crate::manifold::so3::{SO3Tangent, SO3};
use crate::manifold::LieGroup;
use nalgebra::{DVector, SVector, Vector3, Vector6};
use std::ops::AddAssign;
use tracing::trace;

/// Vector-space update: `x ← x + δ`.
pub fn add_in_place<S>(state: &mut S, delta: &S)
where
    S: State<Geometry = Euclidean> + for<'a> AddAssign<&'a S>,
{
    *state += delta;
}

/// Right-plus update on a Lie group: `x ← x ∘ exp(δ)`, projected back onto the manifold.
pub fn plus_in_place<S>(state: &mut S, delta: &<S as LieGroup>::TangentVector)
where
    S: LieGroup + State<Geometry = OnManifold<<S as LieGroup>::TangentVector>>,
{
    *state = state.right_plus(delta);
    state.normalize();
}

/// Flat coordinate view of a correction type.
pub trait Coordinates: Sized {
    /// Number of coordinates, `None` when it is only known at runtime.
    const DOF: Option<usize>;

    /// Build a correction from its coordinates.
    fn from_coordinates(values: &[f64]) -> EstimableResult<Self>;

    /// Coordinates of this correction.
    fn coordinates(&self) -> DVector<f64>;
}

/// Error-state dimension of a nominal state value.
///
/// Fixed for most states. Dynamically sized states report their current length, so a
/// correction can be checked against the state it is injected into.
pub trait TangentDim {
    fn tangent_dim(&self) -> usize;
}

impl TangentDim for f64 {
    fn tangent_dim(&self) -> usize {
        1
    }
}

impl<const D: usize> TangentDim for SVector<f64, D> {
    fn tangent_dim(&self) -> usize {
        D
    }
}

impl TangentDim for DVector<f64> {
    fn tangent_dim(&self) -> usize {
        self.len()
    }
}

impl TangentDim for SO3 {
    fn tangent_dim(&self) -> usize {
        SO3::DOF
    }
}

impl TangentDim for SE3 {
    fn tangent_dim(&self) -> usize {
        SE3::DOF
    }
}

fn check_len(expected: usize, actual: usize) -> EstimableResult<()> {
    if expected != actual {
        return Err(EstimableError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Convert a slice of the error-state vector into the correction type of `S`.
pub fn correction_from_slice<S>(values: &[f64]) -> EstimableResult<Correction<S>>
where
    S: State,
    Correction<S>: Coordinates,
{
    trace!(len = values.len(), "building correction from coordinates");
    <Correction<S> as Coordinates>::from_coordinates(values)
}

impl Coordinates for f64 {
    const DOF: Option<usize> = Some(1);

    fn from_coordinates(values: &[f64]) -> EstimableResult<Self> {
        check_len(1, values.len())?;
        Ok(values[0])
    }

    fn coordinates(&self) -> DVector<f64> {
        DVector::from_element(1, *self)
    }
}

impl<const D: usize> Coordinates for SVector<f64, D> {
    const DOF: Option<usize> = Some(D);

    fn from_coordinates(values: &[f64]) -> EstimableResult<Self> {
        check_len(D, values.len())?;
        Ok(SVector::from_column_slice(values))
    }

    fn coordinates(&self) -> DVector<f64> {
        DVector::from_column_slice(self.as_slice())
    }
}

impl Coordinates for DVector<f64> {
    const DOF: Option<usize> = None;

    fn from_coordinates(values: &[f64]) -> EstimableResult<Self> {
        Ok(DVector::from_column_slice(values))
    }

    fn coordinates(&self) -> DVector<f64> {
        self.clone()
    }
}

impl Coordinates for SO3Tangent {
    const DOF: Option<usize> = Some(3);

    fn from_coordinates(values: &[f64]) -> EstimableResult<Self> {
        check_len(3, values.len())?;
        Ok(SO3Tangent::new(Vector3::from_column_slice(values)))
    }

    fn coordinates(&self) -> DVector<f64> {
        DVector::from_column_slice(self.coeffs().as_slice())
    }
}

/// Coordinates are ordered `[rho, theta]`.
impl Coordinates for SE3Tangent {
    const DOF: Option<usize> = Some(6);

    fn from_coordinates(values: &[f64]) -> EstimableResult<Self> {
        check_len(6, values.len())?;
        Ok(SE3Tangent::from_vector(Vector6::from_column_slice(values)))
    }

    fn coordinates(&self) -> DVector<f64> {
        DVector::from_column_slice(self.coeffs().as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::Tangent;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_add_in_place_additivity() {
        let a = Vector3::new(0.1, -0.2, 0.05);
        let b = Vector3::new(-0.3, 0.4, 0.0);

        let mut sequential = Vector3::new(1.0, 2.0, 3.0);
        add_in_place(&mut sequential, &a);
        add_in_place(&mut sequential, &b);

        let mut direct = Vector3::new(1.0, 2.0, 3.0);
        add_in_place(&mut direct, &(a + b));

        assert!((sequential - direct).norm() < TOLERANCE);
    }

    #[test]
    fn test_add_in_place_scalar_and_dynamic() {
        let mut scale = 1.0;
        add_in_place(&mut scale, &0.25);
        assert_eq!(scale, 1.25);

        let mut intrinsics = DVector::from_vec(vec![500.0, 500.0, 320.0, 240.0]);
        add_in_place(&mut intrinsics, &DVector::from_vec(vec![1.0, -1.0, 0.5, 0.0]));
        assert_eq!(intrinsics, DVector::from_vec(vec![501.0, 499.0, 320.5, 240.0]));
    }

    #[test]
    fn test_plus_in_place_invertible() {
        let original = SO3::random();
        let delta = SO3Tangent::random();

        let mut state = original.clone();
        plus_in_place(&mut state, &delta);
        assert!(state.distance(&original) > 0.0);
        plus_in_place(&mut state, &-&delta);
        assert!(state.distance(&original) < 1e-10);

        let original = SE3::random();
        let delta = SE3Tangent::random();
        let mut state = original.clone();
        plus_in_place(&mut state, &delta);
        plus_in_place(&mut state, &-&delta);
        assert!(state.distance(&original) < 1e-10);
    }

    #[test]
    fn test_plus_in_place_keeps_unit_quaternion() {
        let mut state = SO3::identity();
        for _ in 0..1000 {
            plus_in_place(&mut state, &SO3Tangent::from_components(0.01, -0.02, 0.03));
        }
        assert!(state.is_valid(TOLERANCE));
    }

    #[test]
    fn test_coordinates_dimension_checks() {
        assert_eq!(
            SO3Tangent::from_coordinates(&[0.1, 0.2]),
            Err(EstimableError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(SE3Tangent::from_coordinates(&[0.0; 7]).is_err());
        assert!(<Vector3<f64>>::from_coordinates(&[1.0; 4]).is_err());
        assert!(f64::from_coordinates(&[]).is_err());
        assert_eq!(DVector::<f64>::from_coordinates(&[1.0; 5]).map(|v| v.len()), Ok(5));
    }

    #[test]
    fn test_coordinates_layout_order() {
        let tangent = SE3Tangent::from_coordinates(&[1.0, 2.0, 3.0, 0.1, 0.2, 0.3]).unwrap();
        assert_eq!(tangent.rho(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(tangent.theta(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(tangent.coordinates().as_slice(), &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_correction_from_slice_selects_type() {
        let correction: SO3Tangent = correction_from_slice::<SO3>(&[0.0, 0.0, 0.1]).unwrap();
        assert!((correction.norm() - 0.1).abs() < TOLERANCE);

        let correction: Vector3<f64> = correction_from_slice::<Vector3<f64>>(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(correction, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_dof_constants() {
        assert_eq!(<SO3Tangent as Coordinates>::DOF, Some(3));
        assert_eq!(<SE3Tangent as Coordinates>::DOF, Some(6));
        assert_eq!(<Vector6<f64> as Coordinates>::DOF, Some(6));
        assert_eq!(<DVector<f64> as Coordinates>::DOF, None);
    }

    #[test]
    fn test_tangent_dim() {
        assert_eq!(0.5_f64.tangent_dim(), 1);
        assert_eq!(Vector6::<f64>::zeros().tangent_dim(), 6);
        assert_eq!(DVector::<f64>::zeros(9).tangent_dim(), 9);
        assert_eq!(SO3::identity().tangent_dim(), 3);
        assert_eq!(SE3::identity().tangent_dim(), 6);
    }
}
