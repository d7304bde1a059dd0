// The column/pie transform: groupby labels to colored series of data points,
// optionally split into sub-series by one breakdown column.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::config::SeriesConfig;
use crate::grouping;
use crate::palette::{CategoricalScale, ColorScheme, ItemStyle};
use crate::scalar::{Scalar, format_scalar};
use crate::table::ResultSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
    #[serde(rename = "itemStyle")]
    pub item_style: ItemStyle,
}

/// One rendered series. With a breakdown column there is one of these per
/// breakdown value; the shared `stack` name makes the renderer stack them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub data: Vec<SeriesPoint>,
}

/// Payload for the column/pie renderer adapter.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesChartData {
    pub series: Vec<BarSeries>,
    pub categories: Vec<String>,
    #[serde(rename = "labelMap")]
    pub label_map: IndexMap<String, Vec<Scalar>>,
}

pub fn transform(result: &ResultSet, config: &SeriesConfig) -> SeriesChartData {
    let coltypes = result.coltype_mapping();
    let fmt = config.format.formatters();
    let separator = &config.format.separator;

    let label_map = grouping::label_map(&result.data, &config.groupby, &coltypes, &fmt, separator);
    let categories: Vec<String> = label_map.keys().cloned().collect();

    let mut scale = CategoricalScale::new(ColorScheme::named(&config.color_scheme));
    let metric_of = |row: &crate::table::Row| -> f64 {
        row.get(&config.metric)
            .and_then(Scalar::as_f64)
            .unwrap_or(0.0)
    };

    let series = match &config.breakdown {
        // One series of one point per row, colored by its group label.
        None => {
            let data: Vec<SeriesPoint> = result
                .data
                .iter()
                .map(|row| {
                    let name =
                        grouping::group_key(row, &config.groupby, &coltypes, &fmt, separator);
                    let color = scale.color_for(&name);
                    SeriesPoint {
                        name,
                        value: metric_of(row),
                        item_style: ItemStyle { color },
                    }
                })
                .collect();
            vec![BarSeries {
                id: config.metric.clone(),
                name: config.metric.clone(),
                stack: config.stack.clone(),
                data,
            }]
        }
        // Partition rows by breakdown value, first-seen sub-series order,
        // every point colored by its breakdown value.
        Some(breakdown_col) => {
            let mut partitions: IndexMap<String, Vec<SeriesPoint>> = IndexMap::new();
            for row in &result.data {
                let key = format_scalar(
                    row.get(breakdown_col).unwrap_or(&Scalar::Null),
                    coltypes.get(breakdown_col).copied(),
                    &fmt,
                );
                let color = scale.color_for(&key);
                let name = grouping::group_key(row, &config.groupby, &coltypes, &fmt, separator);
                partitions.entry(key).or_default().push(SeriesPoint {
                    name,
                    value: metric_of(row),
                    item_style: ItemStyle { color },
                });
            }
            partitions
                .into_iter()
                .map(|(key, data)| BarSeries {
                    id: key.clone(),
                    name: key,
                    stack: config.stack.clone(),
                    data,
                })
                .collect()
        }
    };
    let series = dedup_series_ids(series);
    debug!(
        "series transform: {} rows -> {} series, {} categories",
        result.data.len(),
        series.len(),
        categories.len()
    );

    SeriesChartData {
        series,
        categories,
        label_map,
    }
}

/// Disambiguate repeated series ids: the first occurrence keeps its id,
/// later ones get ` (1)`, ` (2)` and so on.
pub fn dedup_series_ids(series: Vec<BarSeries>) -> Vec<BarSeries> {
    let mut counter: HashMap<String, usize> = HashMap::new();
    series
        .into_iter()
        .map(|mut s| {
            let count = counter.entry(s.id.clone()).or_insert(0);
            if *count > 0 {
                s.id = format!("{} ({})", s.id, count);
            }
            *count += 1;
            s
        })
        .collect()
}
