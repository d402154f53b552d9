//! SE(3) - Special Euclidean Group in 3D
//!
//! Body and camera poses: a rotation stored as a unit quaternion plus a position
//! (7 parameters) corrected by a 6-DoF tangent vector `[rho(3), theta(3)]`, where rho is
//! the translational and theta the rotational component.

use crate::manifold::so3::{SO3Tangent, SO3};
use crate::manifold::{LieGroup, Tangent};
use nalgebra::{UnitQuaternion, Vector3, Vector6};
use std::ops::{Add, Neg, Sub};

/// SE(3) group element representing rigid body transformations in 3D.
#[derive(Clone, Debug, PartialEq)]
pub struct SE3 {
    rotation: SO3,
    translation: Vector3<f64>,
}

/// SE(3) tangent space element stored as [rho_x, rho_y, rho_z, theta_x, theta_y, theta_z].
#[derive(Clone, Debug, PartialEq)]
pub struct SE3Tangent {
    data: Vector6<f64>,
}

impl SE3 {
    /// Create a new SE3 element from translation and rotation.
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        SE3 {
            rotation: SO3::new(rotation),
            translation,
        }
    }

    /// Create SE3 from translation components and Euler angles.
    pub fn from_translation_euler(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(
            Vector3::new(x, y, z),
            UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        )
    }

    /// Create SE3 from SO3 and Vector3 components.
    pub fn from_translation_so3(translation: Vector3<f64>, rotation: SO3) -> Self {
        SE3 {
            rotation,
            translation,
        }
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    pub fn rotation_so3(&self) -> &SO3 {
        &self.rotation
    }
}

impl LieGroup for SE3 {
    type TangentVector = SE3Tangent;

    const DIM: usize = 3;
    const DOF: usize = 6;
    const REP_SIZE: usize = 7;

    fn identity() -> Self {
        SE3 {
            rotation: SO3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// M⁻¹ = [Rᵀ, -Rᵀt; 0, 1]
    fn inverse(&self) -> Self {
        let rot_inv = self.rotation.inverse();
        let trans_inv = -rot_inv.act(&self.translation);
        SE3::from_translation_so3(trans_inv, rot_inv)
    }

    /// M_a M_b = [R_a R_b, R_a t_b + t_a; 0, 1]
    fn compose(&self, other: &Self) -> Self {
        SE3::from_translation_so3(
            self.rotation.act(&other.translation) + self.translation,
            self.rotation.compose(&other.rotation),
        )
    }

    /// τ = [V⁻¹(θ) t, Log(R)]
    fn log(&self) -> SE3Tangent {
        let theta = self.rotation.log();
        let rho = theta.left_jacobian_inv() * self.translation;
        SE3Tangent::new(rho, theta.coeffs())
    }

    fn act(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.act(vector) + self.translation
    }

    fn random() -> Self {
        let translation = Vector3::new(
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
        );
        SE3::from_translation_so3(translation, SO3::random())
    }

    fn normalize(&mut self) {
        self.rotation.normalize();
    }

    fn is_valid(&self, tolerance: f64) -> bool {
        self.rotation.is_valid(tolerance)
    }
}

impl SE3Tangent {
    /// Create a new SE3Tangent from its translational and rotational parts.
    pub fn new(rho: Vector3<f64>, theta: Vector3<f64>) -> Self {
        let mut data = Vector6::zeros();
        data.fixed_rows_mut::<3>(0).copy_from(&rho);
        data.fixed_rows_mut::<3>(3).copy_from(&theta);
        SE3Tangent { data }
    }

    /// Create SE3Tangent from a stacked [rho, theta] vector.
    pub fn from_vector(data: Vector6<f64>) -> Self {
        SE3Tangent { data }
    }

    pub fn rho(&self) -> Vector3<f64> {
        self.data.fixed_rows::<3>(0).into_owned()
    }

    pub fn theta(&self) -> Vector3<f64> {
        self.data.fixed_rows::<3>(3).into_owned()
    }

    pub fn coeffs(&self) -> Vector6<f64> {
        self.data
    }
}

impl Tangent<SE3> for SE3Tangent {
    /// M = exp(τ) = [Exp(θ), V(θ) ρ; 0, 1]
    fn exp(&self) -> SE3 {
        let theta_tangent = SO3Tangent::new(self.theta());
        let translation = theta_tangent.left_jacobian() * self.rho();
        SE3::from_translation_so3(translation, theta_tangent.exp())
    }

    fn zero() -> Self {
        SE3Tangent::from_vector(Vector6::zeros())
    }

    fn random() -> Self {
        SE3Tangent::from_vector(Vector6::from_fn(|_, _| {
            rand::random::<f64>() * 0.2 - 0.1
        }))
    }

    fn norm(&self) -> f64 {
        self.data.norm()
    }
}

impl Add for SE3Tangent {
    type Output = SE3Tangent;

    fn add(self, rhs: Self) -> Self::Output {
        SE3Tangent::from_vector(self.data + rhs.data)
    }
}

impl Sub for SE3Tangent {
    type Output = SE3Tangent;

    fn sub(self, rhs: Self) -> Self::Output {
        SE3Tangent::from_vector(self.data - rhs.data)
    }
}

impl Neg for &SE3Tangent {
    type Output = SE3Tangent;

    fn neg(self) -> Self::Output {
        SE3Tangent::from_vector(-self.data)
    }
}
