// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Capmap: a terminal capability-map editor.
//!
//! Rows of a table carry a *current* and an *aspirational* marker; the editor draws them as an
//! overlay of circles, path lines and dashed pairing lines anchored to the rendered cells. Maps
//! persist as JSON, export as SVG and can be pre-filled from URL query parameters.

pub mod bootstrap;
pub mod config;
pub mod layout;
pub mod logging;
pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod store;
pub mod tui;
pub mod ui;
