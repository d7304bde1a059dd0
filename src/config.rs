// Transform configuration. Every default lives here, once; explicit caller
// values always win over these defaults and nothing downstream re-defaults.

use serde::{Deserialize, Serialize};

use crate::palette::{Color, FontWeight, LabelStyle};
use crate::scalar::{Formatters, NULL_STRING, precision_formatter, strftime_formatter};

/// Separator between the names in a delimited label-name list.
pub const LABEL_NAME_DELIMITER: &str = "; ";

/// How scalar values become display strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Joins formatted values into a group key. `", "` unless configured.
    pub separator: String,
    /// Rendered for null and missing values.
    pub null_string: String,
    /// chrono strftime pattern for temporal values; RFC 3339 when absent.
    pub date_format: Option<String>,
    /// Fixed decimal digits for numbers; plain decimal string when absent.
    pub number_precision: Option<usize>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
            null_string: NULL_STRING.to_string(),
            date_format: None,
            number_precision: None,
        }
    }
}

impl FormatOptions {
    /// Build the injectable formatter set for one transform invocation.
    pub fn formatters(&self) -> Formatters {
        Formatters {
            null_string: self.null_string.clone(),
            number: self.number_precision.map(precision_formatter),
            time: self.date_format.as_deref().map(strftime_formatter),
        }
    }
}

/// Custom label styling for a chosen set of node names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyleConfig {
    pub show_label: bool,
    /// `"; "`-delimited node names to restyle.
    pub label_names: String,
    pub bold: bool,
    pub label_color: Color,
}

impl Default for LabelStyleConfig {
    fn default() -> Self {
        Self {
            show_label: false,
            label_names: String::new(),
            bold: false,
            label_color: Color::rgb(0xff, 0x00, 0x00),
        }
    }
}

impl LabelStyleConfig {
    /// The discrete node names named by `label_names`.
    pub fn target_names(&self) -> Vec<String> {
        self.label_names
            .split(LABEL_NAME_DELIMITER)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn style(&self) -> LabelStyle {
        LabelStyle {
            color: self.label_color,
            font_size: 15,
            font_weight: if self.bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            },
        }
    }
}

/// Configuration for the sankey (flow graph) transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SankeyConfig {
    /// Ordered path columns; consecutive pairs become source/target hops.
    pub groupby: Vec<String>,
    /// Column whose values accumulate into edge weights.
    pub metric: String,
    pub color_scheme: String,
    pub format: FormatOptions,
    pub label_style: LabelStyleConfig,
}

/// Configuration for the column/pie series transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Columns whose joined values name each data point.
    pub groupby: Vec<String>,
    /// Optional breakdown column splitting rows into sub-series.
    pub breakdown: Option<String>,
    pub metric: String,
    /// Stack group name applied to every emitted series.
    pub stack: Option<String>,
    pub color_scheme: String,
    pub format: FormatOptions,
}
