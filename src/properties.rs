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
//! Per-helix scalar and string properties.

use crate::errors::ErrEngine;
use crate::utils::*;

/// Version of the property schema, for the serialization layer.
pub const PROPERTY_SCHEMA_VERSION: u32 = 1;

const DEFAULT_HELIX_COLOR: u32 = 0x0066cc;

/// The properties of one virtual helix.
///
/// The twist parameters are expressed in degrees; a repeat of 21 bases over
/// 2 turns is the honeycomb-lattice default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelixProperties {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_helix_color")]
    pub color: u32,

    /// Indicate wether the helix should be displayed.
    #[serde(default = "default_visibility", skip_serializing_if = "bool::clone")]
    pub visible: bool,

    /// Number of bases of one twist repeat.
    pub bases_per_repeat: f32,

    /// Number of full turns of one twist repeat.
    pub turns_per_repeat: f32,

    /// Phase of the forward strand at base 0, in degrees. A phase equal to 0
    /// means that the base 0 of the forward strand points along the local
    /// +X direction of the helix frame.
    #[serde(default, skip_serializing_if = "f32_is_zero")]
    pub euler_z: f32,

    /// Angle from the forward strand to the reverse strand of a base pair,
    /// in degrees.
    pub minor_groove_angle: f32,

    /// Rise of one full turn, in nanometers.
    pub helical_pitch: f32,

    /// Z offset of base 0, in nanometers.
    #[serde(default, skip_serializing_if = "f32_is_zero")]
    pub z: f32,

    /// Number of bases currently stored for this helix.
    #[serde(default)]
    pub length: usize,
}

fn default_helix_color() -> u32 {
    DEFAULT_HELIX_COLOR
}

impl Default for HelixProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_HELIX_COLOR,
            visible: true,
            bases_per_repeat: 21.,
            turns_per_repeat: 2.,
            euler_z: 0.,
            // minor groove 12 Å, major groove 22 Å total 34 Å
            minor_groove_angle: 360. * 12. / 34.,
            helical_pitch: 0.332 * 10.5,
            z: 0.,
            length: 0,
        }
    }
}

impl HelixProperties {
    pub fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }
}

/// A row per virtual helix identifier. Rows of recycled identifiers are
/// unused until the identifier is reassigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyTable {
    rows: Vec<Option<HelixProperties>>,
}

impl PropertyTable {
    pub fn insert(&mut self, id: usize, properties: HelixProperties) -> Result<(), ErrEngine> {
        if id >= self.rows.len() {
            self.rows.resize(id + 1, None);
        }
        if self.rows[id].is_some() {
            return Err(ErrEngine::InvalidId(id));
        }
        self.rows[id] = Some(properties);
        Ok(())
    }

    pub fn remove(&mut self, id: usize) -> Result<HelixProperties, ErrEngine> {
        self.rows
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn get(&self, id: usize) -> Result<&HelixProperties, ErrEngine> {
        self.rows
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn get_mut(&mut self, id: usize) -> Result<&mut HelixProperties, ErrEngine> {
        self.rows
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(ErrEngine::UnknownId(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &HelixProperties)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(id, row)| row.as_ref().map(|properties| (id, properties)))
    }
}
