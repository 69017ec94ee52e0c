// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Geometry for the capability table.
//!
//! Converts measured cell rectangles into overlay coordinates and keeps the per-frame cell lookup.

pub mod geometry;
pub mod grid;

pub use geometry::{cell_center, cell_center_in_page, OverlayAnchor, Point, Rect, ScrollOffset};
pub use grid::{CellGrid, CellLookup, GridMetrics};
