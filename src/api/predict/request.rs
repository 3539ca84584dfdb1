// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request shapes accepted by POST /predict

use serde::{Deserialize, Serialize};

/// Multipart field carrying an uploaded image
pub const FILE_FIELD: &str = "file";

/// JSON body sent by the drawing canvas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Data URL, e.g. `data:image/png;base64,iVBOR...`
    #[serde(default)]
    pub image_data: Option<String>,
}

/// Raw image input, whichever shape the client used
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Bytes of an uploaded file
    Upload { file_name: Option<String>, bytes: Vec<u8> },
    /// Data URL from the drawing canvas
    DataUrl(String),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Upload { .. } => "upload",
            ImageSource::DataUrl(_) => "drawing",
        }
    }
}
