/*
nanohelix, a virtual helix geometry engine for DNA nanostructure design.
    Copyright (C) 2026  nanohelix developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Pure per-base geometry of a straight virtual helix.
//!
//! The helix is first built in its local frame: the axis runs along +Z
//! spaced by the base-pair rise, and the forward/reverse strand points sit
//! on a ring of the helix radius at per-base twist angles. The whole frame
//! is then rotated so that +Z aligns with the helix direction, and
//! translated to the helix origin. The same deterministic formula is used
//! for every base index, so regenerating a base always reproduces the same
//! floating point values bit for bit.

use crate::parameters::Parameters;
use crate::properties::HelixProperties;
use std::f32::consts::{PI, TAU};
use ultraviolet::{Mat3, Vec3};

/// Twist parameters of one helix, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixTwist {
    pub bases_per_repeat: f32,
    pub turns_per_repeat: f32,
    /// Phase of the forward strand at base 0.
    pub euler_z: f32,
    pub minor_groove_angle: f32,
}

impl HelixTwist {
    pub fn of(properties: &HelixProperties) -> Self {
        Self {
            bases_per_repeat: properties.bases_per_repeat,
            turns_per_repeat: properties.turns_per_repeat,
            euler_z: properties.euler_z,
            minor_groove_angle: properties.minor_groove_angle,
        }
    }

    /// Twist between two consecutive bases, in degrees.
    pub fn twist_per_base(&self) -> f32 {
        self.turns_per_repeat * 360. / self.bases_per_repeat
    }

    /// Angle of the forward strand at base `index`, in radians.
    pub fn forward_angle(&self, index: isize) -> f32 {
        (self.euler_z + self.twist_per_base() * index as f32).to_radians()
    }

    /// Angle of the reverse strand at base `index`, in radians. The minor
    /// groove angle goes from the forward strand to the reverse strand.
    pub fn reverse_angle(&self, index: isize) -> f32 {
        self.forward_angle(index) + self.minor_groove_angle.to_radians()
    }

    /// The phase at base `delta`, mapped to `[0, 360)`. This is the value
    /// `euler_z` must take when base `delta` becomes the new base 0.
    pub fn rebased_phase(&self, delta: isize) -> f32 {
        (self.euler_z + self.twist_per_base() * delta as f32).rem_euclid(360.)
    }
}

/// The rotation aligning `from` with `to`.
///
/// Computed as `R = I + [v]× + [v]×² (1-cosθ)/sin²θ` with `v = from × to`.
/// When the two directions already coincide the result is exactly the
/// identity matrix, and an exact half turn is returned for opposite
/// directions, so no branch divides by a vanishing `sin²θ`.
pub fn rotation_from_to(from: Vec3, to: Vec3) -> Mat3 {
    let a = from.normalized();
    let b = to.normalized();
    let cos = a.dot(b);
    let v = a.cross(b);
    let sin_sq = v.mag_sq();
    if sin_sq < 1e-12 {
        if cos >= 0. {
            return Mat3::identity();
        }
        let u = any_orthogonal(a);
        let half_turn = |e: Vec3| 2. * u.dot(e) * u - e;
        return Mat3::new(
            half_turn(Vec3::unit_x()),
            half_turn(Vec3::unit_y()),
            half_turn(Vec3::unit_z()),
        );
    }
    let k = (1. - cos) / sin_sq;
    let column = |e: Vec3| e + v.cross(e) + k * v.cross(v.cross(e));
    Mat3::new(
        column(Vec3::unit_x()),
        column(Vec3::unit_y()),
        column(Vec3::unit_z()),
    )
}

fn any_orthogonal(v: Vec3) -> Vec3 {
    let other = if v.x.abs() < 0.9 {
        Vec3::unit_x()
    } else {
        Vec3::unit_y()
    };
    v.cross(other).normalized()
}

/// Compute the axis, forward strand and reverse strand points of `n`
/// consecutive bases starting at `base_index_start`, which may be negative
/// when prepending.
pub fn points_from_params(
    origin: Vec3,
    direction: Vec3,
    twist: &HelixTwist,
    parameters: &Parameters,
    base_index_start: isize,
    n: usize,
) -> (Vec<Vec3>, Vec<Vec3>, Vec<Vec3>) {
    let rotation = rotation_from_to(Vec3::unit_z(), direction);
    let radius = parameters.helix_radius;
    let mut axis = Vec::with_capacity(n);
    let mut forward = Vec::with_capacity(n);
    let mut reverse = Vec::with_capacity(n);
    for i in 0..n {
        let index = base_index_start + i as isize;
        let z = index as f32 * parameters.z_step;
        let fwd_angle = twist.forward_angle(index);
        let rev_angle = twist.reverse_angle(index);
        axis.push(rotation * Vec3::new(0., 0., z) + origin);
        forward.push(
            rotation * Vec3::new(radius * fwd_angle.cos(), radius * fwd_angle.sin(), z) + origin,
        );
        reverse.push(
            rotation * Vec3::new(radius * rev_angle.cos(), radius * rev_angle.sin(), z) + origin,
        );
    }
    (axis, forward, reverse)
}

/// Map an angle to `[0, 2π)`.
pub fn normalized_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

/// The shortest signed difference from `b` to `a`, in `[-π, π)`. Angle
/// window membership must use this so that ranges crossing 0 behave.
pub fn signed_angle_difference(a: f32, b: f32) -> f32 {
    (a - b + PI).rem_euclid(TAU) - PI
}
