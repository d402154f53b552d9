//! SO(3) - Special Orthogonal Group in 3D
//!
//! Attitude states of IMUs, cameras and feature groups. Elements are stored as a unit
//! quaternion (4 parameters) while corrections are axis-angle vectors in R³ (3 DoF),
//! which is exactly the case where the error state is smaller than the nominal state.

use crate::manifold::{skew, LieGroup, Tangent};
use nalgebra::{Matrix3, Quaternion, Unit, UnitQuaternion, Vector3};
use std::ops::{Add, Neg, Sub};

/// SO(3) group element representing rotations in 3D.
#[derive(Clone, Debug, PartialEq)]
pub struct SO3 {
    quaternion: UnitQuaternion<f64>,
}

/// SO(3) tangent space element: axis-angle vector [θx, θy, θz].
///
/// Direction is the rotation axis, magnitude the angle in radians.
#[derive(Clone, Debug, PartialEq)]
pub struct SO3Tangent {
    data: Vector3<f64>,
}

impl SO3 {
    pub fn new(quaternion: UnitQuaternion<f64>) -> Self {
        SO3 { quaternion }
    }

    /// Create SO(3) from Euler angles (roll, pitch, yaw).
    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        SO3::new(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    /// Create SO(3) from an axis (not necessarily unit) and an angle.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        SO3::new(UnitQuaternion::from_axis_angle(&Unit::new_normalize(*axis), angle))
    }

    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }
}

impl LieGroup for SO3 {
    type TangentVector = SO3Tangent;

    const DIM: usize = 3;
    const DOF: usize = 3;
    const REP_SIZE: usize = 4;

    fn identity() -> Self {
        SO3::new(UnitQuaternion::identity())
    }

    /// q⁻¹ = q* for unit quaternions.
    fn inverse(&self) -> Self {
        SO3::new(self.quaternion.inverse())
    }

    fn compose(&self, other: &Self) -> Self {
        SO3::new(self.quaternion * other.quaternion)
    }

    /// θu = Log(q) = (2 / ‖v‖) · v · atan2(‖v‖, w)
    ///
    /// The sign of the quaternion is chosen so that the returned angle lies in [0, π].
    fn log(&self) -> SO3Tangent {
        let q = self.quaternion.quaternion();
        let sin_angle_squared = q.i * q.i + q.j * q.j + q.k * q.k;

        let log_coeff = if sin_angle_squared > f64::EPSILON {
            let sin_angle = sin_angle_squared.sqrt();
            let cos_angle = q.w;
            let two_angle = 2.0
                * if cos_angle < 0.0 {
                    f64::atan2(-sin_angle, -cos_angle)
                } else {
                    f64::atan2(sin_angle, cos_angle)
                };
            two_angle / sin_angle
        } else {
            // small angle: atan2(s, w) / s → 1 / w
            2.0 / q.w
        };

        SO3Tangent::new(Vector3::new(q.i, q.j, q.k) * log_coeff)
    }

    fn act(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.quaternion * vector
    }

    fn random() -> Self {
        SO3::new(UnitQuaternion::from_scaled_axis(Vector3::from_fn(|_, _| {
            rand::random::<f64>() * 2.0 - 1.0
        })))
    }

    fn normalize(&mut self) {
        self.quaternion.renormalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        (self.quaternion.quaternion().norm() - 1.0).abs() < tolerance
    }
}

impl SO3Tangent {
    pub fn new(axis_angle: Vector3<f64>) -> Self {
        SO3Tangent { data: axis_angle }
    }

    pub fn from_components(x: f64, y: f64, z: f64) -> Self {
        SO3Tangent::new(Vector3::new(x, y, z))
    }

    /// Axis-angle vector.
    pub fn coeffs(&self) -> Vector3<f64> {
        self.data
    }

    /// Left Jacobian of SO(3), also the V matrix of the SE(3) exponential.
    ///
    /// Jl(θ) = I + (1 - cos θ)/θ² [θ]ₓ + (θ - sin θ)/θ³ [θ]ₓ²
    pub fn left_jacobian(&self) -> Matrix3<f64> {
        let theta_squared = self.data.norm_squared();
        let theta_skew = skew(&self.data);

        if theta_squared <= f64::EPSILON {
            Matrix3::identity() + 0.5 * theta_skew
        } else {
            let theta = theta_squared.sqrt();
            Matrix3::identity()
                + (1.0 - theta.cos()) / theta_squared * theta_skew
                + (theta - theta.sin()) / (theta_squared * theta) * theta_skew * theta_skew
        }
    }

    /// Jl⁻¹(θ) = I - ½[θ]ₓ + (1/θ² - (1 + cos θ)/(2θ sin θ)) [θ]ₓ²
    pub fn left_jacobian_inv(&self) -> Matrix3<f64> {
        let theta_squared = self.data.norm_squared();
        let theta_skew = skew(&self.data);

        if theta_squared <= f64::EPSILON {
            Matrix3::identity() - 0.5 * theta_skew
        } else {
            let theta = theta_squared.sqrt();
            Matrix3::identity() - 0.5 * theta_skew
                + (1.0 / theta_squared - (1.0 + theta.cos()) / (2.0 * theta * theta.sin()))
                    * theta_skew
                    * theta_skew
        }
    }
}

impl Tangent<SO3> for SO3Tangent {
    /// q = Exp(θu) = cos(θ/2) + u sin(θ/2)
    fn exp(&self) -> SO3 {
        if self.data.norm_squared() > f64::EPSILON {
            SO3::new(UnitQuaternion::from_scaled_axis(self.data))
        } else {
            let half = self.data / 2.0;
            SO3::new(UnitQuaternion::from_quaternion(Quaternion::new(
                1.0, half.x, half.y, half.z,
            )))
        }
    }

    fn zero() -> Self {
        Self::new(Vector3::zeros())
    }

    fn random() -> Self {
        Self::new(Vector3::from_fn(|_, _| rand::random::<f64>() * 0.2 - 0.1))
    }

    fn norm(&self) -> f64 {
        self.data.norm()
    }
}

impl Add for SO3Tangent {
    type Output = SO3Tangent;

    fn add(self, rhs: Self) -> Self::Output {
        SO3Tangent::new(self.data + rhs.data)
    }
}

impl Sub for SO3Tangent {
    type Output = SO3Tangent;

    fn sub(self, rhs: Self) -> Self::Output {
        SO3Tangent::new(self.data - rhs.data)
    }
}

impl Neg for &SO3Tangent {
    type Output = SO3Tangent;

    fn neg(self) -> Self::Output {
        SO3Tangent::new(-self.data)
    }
}
