// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Capmap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Capmap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for table documents on disk.
//!
//! Saves and loads the full session document (`tableData.json`) and writes export artifacts.

pub mod state_file;

pub use state_file::{
    decode_table, encode_table, write_atomic, StateFile, StoreError, WriteDurability,
    STATE_FILE_NAME,
};
