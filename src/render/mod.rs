// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering for the capability overlay.
//!
//! `overlay` derives the drawable primitives from the table and live cell geometry; `svg` turns a
//! table into a standalone export document.

pub mod overlay;
pub mod svg;

pub use overlay::{
    dash_segments, derive_overlay, Marker, Overlay, PairingLine, PathLine, Segment,
    MARKER_RADIUS_RATIO,
};
pub use svg::{export_svg, render_svg, ExportError, SvgOptions, HEADER_COLORS};
