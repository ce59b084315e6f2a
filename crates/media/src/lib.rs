//! MIME output bundles and the output transform registry.
//!
//! A kernel execution produces *outputs* (stream text, rich display data,
//! execute results, errors). Rich outputs carry a *media bundle*: a map from
//! MIME type to data. A frontend registers one [`Transform`] (a renderer
//! descriptor) per MIME type it can display, and [`richest_media_type`]
//! picks the single best representation for an output by walking an ordered
//! display-priority list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A map from MIME type to representation data, e.g.
/// `{"text/html": "<b>hi</b>", "text/plain": "hi"}`.
pub type MediaBundle = serde_json::Map<String, Value>;

/// Which stream a text output was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamName {
    Stdout,
    Stderr,
}

/// Transient fields attached to display outputs.
///
/// `display_id` lets a kernel update a previously emitted output in place
/// via `update_display_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
}

/// A single cell output, tagged the way the notebook format tags them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: StreamName,
        text: String,
    },
    DisplayData {
        data: MediaBundle,
        #[serde(default)]
        metadata: MediaBundle,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transient: Option<Transient>,
    },
    ExecuteResult {
        data: MediaBundle,
        #[serde(default)]
        metadata: MediaBundle,
        #[serde(default)]
        execution_count: Option<i32>,
    },
    Error {
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
}

impl Output {
    /// The media bundle of this output, if it has one.
    ///
    /// Stream and error outputs have no bundle.
    pub fn data(&self) -> Option<&MediaBundle> {
        match self {
            Output::DisplayData { data, .. } | Output::ExecuteResult { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The transient display id, if this output was emitted with one.
    pub fn display_id(&self) -> Option<&str> {
        match self {
            Output::DisplayData {
                transient: Some(t), ..
            } => t.display_id.as_deref(),
            _ => None,
        }
    }

    /// Replace the data and metadata of a rich output in place.
    ///
    /// Used when an `update_display_data` message targets this output.
    /// No-op for stream and error outputs.
    pub fn update_display_data(&mut self, new_data: MediaBundle, new_metadata: MediaBundle) {
        match self {
            Output::DisplayData { data, metadata, .. }
            | Output::ExecuteResult { data, metadata, .. } => {
                *data = new_data;
                *metadata = new_metadata;
            }
            _ => {}
        }
    }
}

/// A renderer descriptor registered for one MIME type.
///
/// The actual rendering component lives in the frontend; the store only
/// tracks which MIME types have a registered renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    /// MIME type this renderer handles, e.g. `"text/html"`.
    pub media_type: String,
    /// Human-readable name shown in renderer pickers.
    pub display_name: String,
}

impl Transform {
    pub fn new(media_type: impl Into<String>, display_name: impl Into<String>) -> Self {
        Transform {
            media_type: media_type.into(),
            display_name: display_name.into(),
        }
    }
}

/// The default display-priority order, richest representation first.
pub fn default_display_order() -> Vec<String> {
    [
        "application/vnd.jupyter.widget-view+json",
        "application/vnd.vega.v5+json",
        "application/vnd.vegalite.v4+json",
        "application/vnd.dataresource+json",
        "application/vnd.plotly.v1+json",
        "application/geo+json",
        "text/vnd.plotly.v1+html",
        "text/html",
        "text/markdown",
        "text/latex",
        "image/svg+xml",
        "image/gif",
        "image/png",
        "image/jpeg",
        "application/pdf",
        "application/json",
        "text/plain",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Pick the richest displayable MIME type for an output.
///
/// Walks `display_order` and returns the first MIME type for which the
/// output actually carries data *and* a transform is registered. Returns
/// `None` when nothing matches; callers render nothing in that case rather
/// than treating it as an error.
pub fn richest_media_type<'a>(
    output: &Output,
    display_order: &'a [String],
    transforms: &HashMap<String, Transform>,
) -> Option<&'a str> {
    let data = output.data()?;
    display_order
        .iter()
        .find(|media_type| data.contains_key(*media_type) && transforms.contains_key(*media_type))
        .map(|s| s.as_str())
}
