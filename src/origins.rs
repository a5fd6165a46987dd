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
//! Lattice origins and axis directions of the helices.

use crate::errors::ErrEngine;
use crate::parameters::Parameters;
use ultraviolet::{Vec2, Vec3};

/// The placement of one helix: its 2D lattice origin, independent of the
/// per-base Z geometry, and the direction of its axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelixOrigin {
    pub origin: Vec2,
    /// Unit vector along the helix axis.
    pub direction: Vec3,
}

impl HelixOrigin {
    /// World position of the base 0 axis point, given the helix's z offset
    /// property.
    pub fn space_origin(&self, z: f32) -> Vec3 {
        Vec3::new(self.origin.x, self.origin.y, z)
    }
}

/// Origin and direction entries, kept in lock-step with the property table
/// rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OriginTable {
    entries: Vec<Option<HelixOrigin>>,
}

impl OriginTable {
    pub fn insert(&mut self, id: usize, entry: HelixOrigin) -> Result<(), ErrEngine> {
        if id >= self.entries.len() {
            self.entries.resize(id + 1, None);
        }
        if self.entries[id].is_some() {
            return Err(ErrEngine::InvalidId(id));
        }
        self.entries[id] = Some(entry);
        Ok(())
    }

    pub fn remove(&mut self, id: usize) -> Result<HelixOrigin, ErrEngine> {
        self.entries
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn get(&self, id: usize) -> Result<&HelixOrigin, ErrEngine> {
        self.entries
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut HelixOrigin, ErrEngine> {
        self.entries
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &HelixOrigin)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(id, entry)| entry.as_ref().map(|origin| (id, origin)))
    }
}

/// The two supported lattices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lattice {
    Square,
    Honeycomb,
}

impl Lattice {
    /// Maps a vertex of the lattice to a coordinate in the plane.
    pub fn origin_of(&self, parameters: &Parameters, x: isize, y: isize) -> Vec2 {
        match self {
            Lattice::Square => Vec2::new(
                x as f32 * parameters.crossover_span(),
                -y as f32 * parameters.crossover_span(),
            ),
            Lattice::Honeycomb => {
                let r = parameters.inter_helix_gap / 2. + parameters.helix_radius;
                let upper = -3. * r * y as f32;
                let lower = upper - r;
                Vec2::new(
                    x as f32 * r * 3f32.sqrt(),
                    if x.abs() % 2 != y.abs() % 2 {
                        lower
                    } else {
                        upper
                    },
                )
            }
        }
    }

    /// Find the vertex of the lattice that is the closest to a point in the
    /// plane.
    pub fn interpolate(&self, parameters: &Parameters, x: f32, y: f32) -> (isize, isize) {
        match self {
            Lattice::Square => (
                (x / parameters.crossover_span()).round() as isize,
                (y / -parameters.crossover_span()).round() as isize,
            ),
            Lattice::Honeycomb => {
                let r = parameters.inter_helix_gap / 2. + parameters.helix_radius;
                let first_guess = (
                    (x / (r * 3f32.sqrt())).round() as isize,
                    (y / (-3. * r)).floor() as isize,
                );
                let mut ret = first_guess;
                let mut best_dist = (self.origin_of(parameters, first_guess.0, first_guess.1)
                    - Vec2::new(x, y))
                .mag_sq();
                for dx in [-2, -1, 0, 1, 2].iter() {
                    for dy in [-2, -1, 0, 1, 2].iter() {
                        let guess = (first_guess.0 + dx, first_guess.1 + dy);
                        let dist = (self.origin_of(parameters, guess.0, guess.1)
                            - Vec2::new(x, y))
                        .mag_sq();
                        if dist < best_dist {
                            ret = guess;
                            best_dist = dist;
                        }
                    }
                }
                ret
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_interpolation_is_inverse_of_placement() {
        let parameters = Parameters::DEFAULT;
        for lattice in [Lattice::Square, Lattice::Honeycomb].iter() {
            for x in -3..3 {
                for y in -3..3 {
                    let origin = lattice.origin_of(&parameters, x, y);
                    assert_eq!(
                        lattice.interpolate(&parameters, origin.x, origin.y),
                        (x, y)
                    );
                }
            }
        }
    }
}
