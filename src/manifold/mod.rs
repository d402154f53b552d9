//! Manifold representations for nominal states that are not vector spaces.
//!
//! Error-state estimators keep the nominal state of a rotation or rigid motion on its
//! group and express every correction in the tangent space at that point:
//!
//! Lie group M,° | dim | X ∈ M              | T_X M          | Exp(T)         | Comp.
//! ------------- | --- | ------------------ | -------------- | -------------- | -----
//! n-D vector    | n   | v ∈ Rⁿ             | v ∈ Rⁿ         | v = exp(v)     | v₁+v₂
//! Rotation      | 3   | q ∈ S³ (unit quat) | θ ∈ R³         | q = exp(uθ/2)  | q₁q₂
//! Rigid motion  | 6   | M = [R t; 0 1]     | [ρ, θ] ∈ R⁶    | Exp([ρ, θ])    | M₁M₂
//!
//! Plain vectors do not go through this module: they are Euclidean states and are
//! corrected by addition (see [`crate::component`]).
//!
//! Conventions follow the [manif](https://github.com/artivis/manif) C++ library with the
//! right perturbation model: `x ⊞ δ = x ∘ exp(δ)`.
//!
//! # Example
//!
//! ```rust
//! use estimable::manifold::{LieGroup, Tangent, so3::{SO3, SO3Tangent}};
//!
//! let attitude = SO3::from_euler_angles(0.1, 0.2, 0.3);
//! let delta = SO3Tangent::from_components(0.01, 0.0, -0.02);
//!
//! let corrected = attitude.plus(&delta);
//! let recovered = corrected.minus(&attitude);
//! assert!((recovered - delta).norm() < 1e-12);
//! ```

use nalgebra::Vector3;
use std::fmt::Debug;

pub mod se3;
pub mod so3;

/// Core trait for Lie group operations on nominal states.
///
/// Associated items:
/// - `TangentVector`: the error-state representation at a group element
/// - `DIM`: dimension of the space the group acts on
/// - `DOF`: degrees of freedom, i.e. tangent dimension (3 for SO(3))
/// - `REP_SIZE`: size of the stored representation (4 for SO(3))
pub trait LieGroup: Clone + Debug + PartialEq {
    /// The tangent space vector type
    type TangentVector: Tangent<Self>;

    /// Space dimension - dimension of the ambient space that the group acts on
    const DIM: usize;

    /// Degrees of freedom - dimension of the tangent space
    const DOF: usize;

    /// Representation size - size of the underlying data representation
    const REP_SIZE: usize;

    /// Neutral element e such that e ∘ g = g ∘ e = g.
    fn identity() -> Self;

    /// Inverse g⁻¹ such that g ∘ g⁻¹ = e.
    fn inverse(&self) -> Self;

    /// Group composition g₁ ∘ g₂.
    fn compose(&self, other: &Self) -> Self;

    /// Logarithmic map from the group to its tangent space at the identity.
    fn log(&self) -> Self::TangentVector;

    /// Right plus: g ⊞ φ = g ∘ exp(φ).
    fn right_plus(&self, tangent: &Self::TangentVector) -> Self {
        self.compose(&tangent.exp())
    }

    /// Right minus: g₁ ⊟ g₂ = log(g₂⁻¹ ∘ g₁).
    fn right_minus(&self, other: &Self) -> Self::TangentVector {
        other.inverse().compose(self).log()
    }

    /// Convenience method for right_plus.
    fn plus(&self, tangent: &Self::TangentVector) -> Self {
        self.right_plus(tangent)
    }

    /// Convenience method for right_minus.
    fn minus(&self, other: &Self) -> Self::TangentVector {
        self.right_minus(other)
    }

    /// Relative transformation g₁⁻¹ ∘ g₂.
    fn between(&self, other: &Self) -> Self {
        self.inverse().compose(other)
    }

    /// Geodesic distance ‖g₁ ⊟ g₂‖.
    fn distance(&self, other: &Self) -> f64 {
        self.right_minus(other).norm()
    }

    /// Act on a vector v: g ⊙ v.
    fn act(&self, vector: &Vector3<f64>) -> Vector3<f64>;

    /// Generate a random element (useful for testing and initialization).
    fn random() -> Self;

    /// Project the element back onto the manifold (e.g. re-normalise a quaternion).
    fn normalize(&mut self);

    /// Check if the element is approximately on the manifold.
    fn is_valid(&self, tolerance: f64) -> bool;
}

/// Tangent space vectors of a Lie group `G`.
pub trait Tangent<G: LieGroup>: Clone + Debug + PartialEq {
    /// Dimension of the tangent space (same as Lie group DOF)
    const DIM: usize = G::DOF;

    /// Exponential map to the group: exp(φ^∧).
    fn exp(&self) -> G;

    /// Zero tangent vector.
    fn zero() -> Self;

    /// Random tangent vector with small magnitude (useful for testing).
    fn random() -> Self;

    /// Euclidean norm of the coordinates.
    fn norm(&self) -> f64;

    /// Check if the tangent vector is approximately zero.
    fn is_zero(&self, tolerance: f64) -> bool {
        self.norm() < tolerance
    }
}

/// Skew-symmetric matrix [v]ₓ such that [v]ₓ w = v × w.
pub(crate) fn skew(v: &Vector3<f64>) -> nalgebra::Matrix3<f64> {
    nalgebra::Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}
