//! Estimable components and the static update contract
//!
//! Modules whose parameters are estimated (IMU intrinsics, camera intrinsics, feature
//! groups, ...) keep their own *nominal* state. The estimator holds the error state
//! and covariance, reads each module's nominal state to linearize, and injects the
//! solved correction back into the module.
//!
//! Two pieces make that safe at compile time:
//!
//! - [`State`] declares whether a nominal state is [`Euclidean`] or lives
//!   [`OnManifold`]. A manifold state names its tangent type in the marker,
//!   `OnManifold<Tangent>`, and [`HasTangent`] is derived from it. [`has_tangent`]
//!   answers the question as a `const fn`.
//! - [`Component`] requires exactly one `update_state` whose argument is
//!   [`Correction<Self::State>`](Correction): the tangent type for manifold states,
//!   the state type itself otherwise.
//!
//! Everything is resolved through trait bounds; there is no `dyn` and no runtime flag.
//!
//! # Example
//!
//! ```rust
//! use estimable::component::{add_in_place, plus_in_place, Component};
//! use estimable::manifold::so3::{SO3, SO3Tangent};
//! use nalgebra::Vector3;
//!
//! struct GyroBias {
//!     bias: Vector3<f64>,
//! }
//!
//! impl Component for GyroBias {
//!     type State = Vector3<f64>;
//!
//!     fn state(&self) -> &Vector3<f64> {
//!         &self.bias
//!     }
//!
//!     // Euclidean: the correction is a Vector3 too
//!     fn update_state(&mut self, correction: &Vector3<f64>) {
//!         add_in_place(&mut self.bias, correction);
//!     }
//! }
//!
//! struct Attitude {
//!     rotation: SO3,
//! }
//!
//! impl Component for Attitude {
//!     type State = SO3;
//!
//!     fn state(&self) -> &SO3 {
//!         &self.rotation
//!     }
//!
//!     // Manifold: the correction is the 3-DoF tangent, not a quaternion
//!     fn update_state(&mut self, correction: &SO3Tangent) {
//!         plus_in_place(&mut self.rotation, correction);
//!     }
//! }
//! ```
//!
//! Taking the state type for a manifold state is rejected:
//!
//! ```compile_fail
//! use estimable::component::Component;
//! use estimable::manifold::so3::SO3;
//!
//! struct Attitude {
//!     rotation: SO3,
//! }
//!
//! impl Component for Attitude {
//!     type State = SO3;
//!
//!     fn state(&self) -> &SO3 {
//!         &self.rotation
//!     }
//!
//!     fn update_state(&mut self, correction: &SO3) {
//!         self.rotation = correction.clone();
//!     }
//! }
//! ```
//!
//! and so is taking a tangent type for a Euclidean state:
//!
//! ```compile_fail
//! use estimable::component::Component;
//! use estimable::manifold::so3::SO3Tangent;
//! use nalgebra::Vector3;
//!
//! struct GyroBias {
//!     bias: Vector3<f64>,
//! }
//!
//! impl Component for GyroBias {
//!     type State = Vector3<f64>;
//!
//!     fn state(&self) -> &Vector3<f64> {
//!         &self.bias
//!     }
//!
//!     fn update_state(&mut self, correction: &SO3Tangent) {
//!         self.bias += correction.coeffs();
//!     }
//! }
//! ```
//!
//! A tangent type can only be declared through the geometry. Naming one on a
//! Euclidean state conflicts with the derived [`HasTangent`]:
//!
//! ```compile_fail
//! use estimable::component::HasTangent;
//! use estimable::euclidean_state;
//!
//! struct Yaw(f64);
//! struct YawDelta(f64);
//!
//! euclidean_state!(Yaw);
//!
//! impl HasTangent for Yaw {
//!     type Tangent = YawDelta;
//! }
//! ```
//!
//! Only [`Euclidean`] and [`OnManifold`] are geometries. A third marker cannot
//! decouple `HAS_TANGENT` from the correction type:
//!
//! ```compile_fail
//! use estimable::component::{Geometry, State};
//!
//! struct Rot(f64);
//!
//! enum Rogue {}
//!
//! impl Geometry<Rot> for Rogue {
//!     const HAS_TANGENT: bool = true;
//!     type Correction = Rot;
//! }
//!
//! impl State for Rot {
//!     type Geometry = Rogue;
//! }
//! ```

use crate::manifold::{se3, so3};
use nalgebra::{DVector, SVector};
use std::marker::PhantomData;

pub mod inject;
pub mod layout;

pub use inject::{add_in_place, plus_in_place, Coordinates, TangentDim};
pub use layout::{Block, ErrorStateLayout};

mod sealed {
    pub trait Sealed {}
}

/// Geometry of a nominal state: decides the type of its corrections.
///
/// Sealed. Implemented only by the two markers [`Euclidean`] and [`OnManifold`].
pub trait Geometry<S>: sealed::Sealed {
    /// Whether the state declares a dedicated tangent type.
    const HAS_TANGENT: bool;

    /// Type of the error-state correction injected into a state `S`.
    type Correction;
}

/// Marker for states living in a vector space; corrections have the state's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Euclidean {}

/// Marker for states on a non-Euclidean manifold whose corrections live in `T`.
pub struct OnManifold<T>(PhantomData<fn() -> T>);

impl sealed::Sealed for Euclidean {}

impl<T> sealed::Sealed for OnManifold<T> {}

impl<S> Geometry<S> for Euclidean {
    const HAS_TANGENT: bool = false;
    type Correction = S;
}

impl<S, T> Geometry<S> for OnManifold<T> {
    const HAS_TANGENT: bool = true;
    type Correction = T;
}

/// Tangent type of a manifold-valued state.
///
/// Derived from `State::Geometry = OnManifold<T>` and never implemented by hand.
/// Only the presence of the name matters here; whether `Tangent` supports the
/// arithmetic a perturbation needs is up to the code that uses it.
pub trait HasTangent: State {
    type Tangent;
}

impl<S, T> HasTangent for S
where
    S: State<Geometry = OnManifold<T>>,
{
    type Tangent = T;
}

/// A nominal state held by a [`Component`].
pub trait State: Sized {
    /// [`Euclidean`] or [`OnManifold<Tangent>`](OnManifold).
    type Geometry: Geometry<Self>;
}

/// The correction type accepted by components whose nominal state is `S`.
pub type Correction<S> = <<S as State>::Geometry as Geometry<S>>::Correction;

/// Does `S` declare a tangent type distinct from itself?
///
/// Usable in constant context:
/// ```rust
/// use estimable::component::has_tangent;
/// use estimable::manifold::so3::SO3;
///
/// const _: () = assert!(has_tangent::<SO3>());
/// const _: () = assert!(!has_tangent::<f64>());
/// ```
pub const fn has_tangent<S: State>() -> bool {
    <S::Geometry as Geometry<S>>::HAS_TANGENT
}

/// Contract for every module whose nominal state the estimator can correct.
///
/// The module exclusively owns its nominal state. The estimator only reads it through
/// [`state`](Component::state) and hands corrections to
/// [`update_state`](Component::update_state), which applies them in place with the
/// module's own composition rule (addition for Euclidean states, group composition
/// through the exponential map for manifold states).
///
/// Repeated calls keep moving the state: each call applies one delta. Corrections for
/// a batch must be computed against the states as they were before the batch.
pub trait Component {
    type State: State;

    /// Current nominal state, used by the estimator for linearization.
    fn state(&self) -> &Self::State;

    /// Inject an error-state correction into the nominal state.
    fn update_state(&mut self, correction: &Correction<Self::State>);
}

/// Implement [`State`] for types living in a vector space.
///
/// ```rust
/// use estimable::component::{has_tangent, Correction};
/// use estimable::euclidean_state;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// pub struct TimeOffset(f64);
///
/// euclidean_state!(TimeOffset);
///
/// let _: Correction<TimeOffset> = TimeOffset(0.001);
/// assert!(!has_tangent::<TimeOffset>());
/// ```
#[macro_export]
macro_rules! euclidean_state {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::component::State for $ty {
                type Geometry = $crate::component::Euclidean;
            }
        )+
    };
}

/// Implement [`State`] for a manifold-valued type; [`HasTangent`] follows.
///
/// ```rust
/// use estimable::component::{has_tangent, Correction, HasTangent};
/// use estimable::manifold_state;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// pub struct Heading(f64);
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// pub struct HeadingDelta(f64);
///
/// manifold_state!(Heading => HeadingDelta);
///
/// let _: Correction<Heading> = HeadingDelta(0.01);
/// let _: <Heading as HasTangent>::Tangent = HeadingDelta(0.0);
/// assert!(has_tangent::<Heading>());
/// ```
#[macro_export]
macro_rules! manifold_state {
    ($($ty:ty => $tangent:ty),+ $(,)?) => {
        $(
            impl $crate::component::State for $ty {
                type Geometry = $crate::component::OnManifold<$tangent>;
            }
        )+
    };
}

euclidean_state!(f64, DVector<f64>);

impl<const D: usize> State for SVector<f64, D> {
    type Geometry = Euclidean;
}

manifold_state!(
    so3::SO3 => so3::SO3Tangent,
    se3::SE3 => se3::SE3Tangent,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifold::se3::{SE3, SE3Tangent};
    use crate::manifold::so3::{SO3, SO3Tangent};
    use crate::manifold::{LieGroup, Tangent};
    use nalgebra::{Vector3, Vector6};
    use std::any::TypeId;

    const TOLERANCE: f64 = 1e-12;

    fn correction_is<S: State, T>() -> bool
    where
        Correction<S>: 'static,
        T: 'static,
    {
        TypeId::of::<Correction<S>>() == TypeId::of::<T>()
    }

    #[derive(Debug)]
    struct GyroBias {
        bias: Vector3<f64>,
    }

    impl Component for GyroBias {
        type State = Vector3<f64>;

        fn state(&self) -> &Vector3<f64> {
            &self.bias
        }

        fn update_state(&mut self, correction: &Vector3<f64>) {
            add_in_place(&mut self.bias, correction);
        }
    }

    #[derive(Debug)]
    struct Attitude {
        rotation: SO3,
    }

    impl Component for Attitude {
        type State = SO3;

        fn state(&self) -> &SO3 {
            &self.rotation
        }

        fn update_state(&mut self, correction: &SO3Tangent) {
            plus_in_place(&mut self.rotation, correction);
        }
    }

    #[test]
    fn test_euclidean_states_have_no_tangent() {
        assert!(!has_tangent::<f64>());
        assert!(!has_tangent::<Vector3<f64>>());
        assert!(!has_tangent::<Vector6<f64>>());
        assert!(!has_tangent::<DVector<f64>>());

        assert!(correction_is::<f64, f64>());
        assert!(correction_is::<Vector3<f64>, Vector3<f64>>());
        assert!(correction_is::<DVector<f64>, DVector<f64>>());
    }

    #[test]
    fn test_manifold_states_use_their_tangent() {
        assert!(has_tangent::<SO3>());
        assert!(has_tangent::<SE3>());

        assert!(correction_is::<SO3, SO3Tangent>());
        assert!(!correction_is::<SO3, SO3>());
        assert!(correction_is::<SE3, SE3Tangent>());
        assert!(!correction_is::<SE3, SE3>());
    }

    #[test]
    fn test_declared_tangent_matches_correction() {
        assert_eq!(
            TypeId::of::<<SO3 as HasTangent>::Tangent>(),
            TypeId::of::<SO3Tangent>()
        );
        assert_eq!(
            TypeId::of::<<SE3 as HasTangent>::Tangent>(),
            TypeId::of::<SE3Tangent>()
        );
        assert!(correction_is::<SO3, <SO3 as HasTangent>::Tangent>());
        assert!(correction_is::<SE3, <SE3 as HasTangent>::Tangent>());
    }

    #[test]
    fn test_has_tangent_in_const_context() {
        const SO3_HAS_TANGENT: bool = has_tangent::<SO3>();
        const VEC_HAS_TANGENT: bool = has_tangent::<Vector3<f64>>();
        assert!(SO3_HAS_TANGENT);
        assert!(!VEC_HAS_TANGENT);
    }

    #[test]
    fn test_generic_estimator_step() {
        fn inject<C: Component>(component: &mut C, correction: &Correction<C::State>) {
            component.update_state(correction);
        }

        let mut gyro = GyroBias {
            bias: Vector3::new(0.01, 0.02, 0.03),
        };
        inject(&mut gyro, &Vector3::new(-0.01, 0.0, 0.01));
        assert!((gyro.state() - Vector3::new(0.0, 0.02, 0.04)).norm() < TOLERANCE);

        let mut attitude = Attitude {
            rotation: SO3::identity(),
        };
        let delta = SO3Tangent::from_components(0.0, 0.0, 0.1);
        inject(&mut attitude, &delta);
        assert!((attitude.state().log() - delta).norm() < TOLERANCE);
    }

    #[test]
    fn test_zero_correction_is_identity() {
        let mut gyro = GyroBias {
            bias: Vector3::new(0.1, -0.2, 0.3),
        };
        let before = *gyro.state();
        gyro.update_state(&Vector3::zeros());
        assert_eq!(*gyro.state(), before);

        let mut attitude = Attitude {
            rotation: SO3::random(),
        };
        let before = attitude.state().clone();
        attitude.update_state(&SO3Tangent::zero());
        assert!(attitude.state().distance(&before) < TOLERANCE);
    }
}
