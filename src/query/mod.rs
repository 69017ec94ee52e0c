// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries that derive table state from external input.
//!
//! Currently this is the URL parameter translator used by the bootstrap path.

pub mod url_params;

pub use url_params::{
    parse_leading_int, translate, translate_query, translate_url, CapabilityKey, QueryParams,
};
