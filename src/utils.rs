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

// Serialization utils
//===========================================================================
pub(super) fn f32_is_zero(x: &f32) -> bool {
    *x == 0.0
}

pub(super) fn default_visibility() -> bool {
    true
}
//===========================================================================
