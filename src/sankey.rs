// The sankey transform: rows in, renderer-shaped flow graph payload out.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::config::SankeyConfig;
use crate::flow::{self, FlowEdge};
use crate::grouping;
use crate::palette::{CategoricalScale, ColorScheme, ItemStyle, LabelStyle, colorize};
use crate::scalar::Scalar;
use crate::table::ResultSet;

/// A flow-graph node ready for the renderer. `label` is only present on
/// nodes with a custom style override; everything else keeps default styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub name: String,
    #[serde(rename = "itemStyle")]
    pub item_style: ItemStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelStyle>,
}

/// Payload for the sankey renderer adapter: node list, annotated links, and
/// the group-key to raw-values map for cross-filtering.
#[derive(Debug, Clone, Serialize)]
pub struct SankeyChartData {
    pub data: Vec<SankeyNode>,
    pub links: Vec<FlowEdge>,
    #[serde(rename = "labelMap")]
    pub label_map: IndexMap<String, Vec<Scalar>>,
}

/// Run the whole pipeline over one result set: group, aggregate, annotate
/// shares, colorize, and apply label overrides.
pub fn transform(result: &ResultSet, config: &SankeyConfig) -> SankeyChartData {
    let coltypes = result.coltype_mapping();
    let fmt = config.format.formatters();

    let label_map = grouping::label_map(
        &result.data,
        &config.groupby,
        &coltypes,
        &fmt,
        &config.format.separator,
    );

    let mut graph = flow::aggregate(&result.data, &config.groupby, &config.metric, &coltypes, &fmt);
    graph.annotate_shares();
    debug!(
        "sankey transform: {} rows -> {} nodes, {} links",
        result.data.len(),
        graph.nodes.len(),
        graph.edges.len()
    );

    let mut scale = CategoricalScale::new(ColorScheme::named(&config.color_scheme));
    let colors = colorize(graph.nodes.iter().map(String::as_str), |name| {
        scale.color_for(name)
    });

    let mut data: Vec<SankeyNode> = graph
        .nodes
        .iter()
        .map(|name| SankeyNode {
            name: name.clone(),
            item_style: ItemStyle {
                color: colors[name.as_str()],
            },
            label: None,
        })
        .collect();

    if config.label_style.show_label {
        let targets = config.label_style.target_names();
        if !targets.is_empty() {
            apply_custom_styles(&mut data, &targets, config.label_style.style());
        }
    }

    SankeyChartData {
        data,
        links: graph.edges,
        label_map,
    }
}

/// Overwrite the label style of every node named in `target_names`.
pub fn apply_custom_styles(nodes: &mut [SankeyNode], target_names: &[String], style: LabelStyle) {
    for node in nodes.iter_mut() {
        if target_names.iter().any(|t| t == &node.name) {
            node.label = Some(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelStyleConfig;
    use crate::scalar::ColumnType;
    use crate::table::Row;

    fn result_set() -> ResultSet {
        let rows: Vec<Row> = [
            ("visit", "signup", 5.0),
            ("visit", "signup", 3.0),
            ("signup", "purchase", 2.0),
        ]
        .iter()
        .map(|(a, b, m)| {
            [
                ("stage_from".to_string(), Scalar::String(a.to_string())),
                ("stage_to".to_string(), Scalar::String(b.to_string())),
                ("count".to_string(), Scalar::Number(*m)),
            ]
            .into_iter()
            .collect()
        })
        .collect();
        ResultSet {
            colnames: vec![
                "stage_from".to_string(),
                "stage_to".to_string(),
                "count".to_string(),
            ],
            coltypes: vec![ColumnType::String, ColumnType::String, ColumnType::Numeric],
            data: rows,
        }
    }

    fn config() -> SankeyConfig {
        SankeyConfig {
            groupby: vec!["stage_from".to_string(), "stage_to".to_string()],
            metric: "count".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn produces_nodes_links_and_label_map() {
        let out = transform(&result_set(), &config());

        let names: Vec<&str> = out.data.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["visit", "signup", "purchase"]);

        assert_eq!(out.links.len(), 2);
        assert_eq!(out.links[0].value, 8.0);
        assert_eq!(out.links[0].source_share, 100.0);
        assert_eq!(out.links[1].value, 2.0);

        let raw = out.label_map.get("visit, signup").unwrap();
        assert_eq!(
            raw,
            &vec![
                Scalar::String("visit".to_string()),
                Scalar::String("signup".to_string())
            ]
        );
    }

    #[test]
    fn nodes_get_distinct_scheme_colors_in_order() {
        let out = transform(&result_set(), &config());
        let scheme = ColorScheme::vivid();
        for (i, node) in out.data.iter().enumerate() {
            assert_eq!(node.item_style.color, scheme.colors[i]);
        }
    }

    #[test]
    fn label_overrides_hit_only_target_nodes() {
        let mut cfg = config();
        cfg.label_style = LabelStyleConfig {
            show_label: true,
            label_names: "signup; purchase".to_string(),
            bold: true,
            ..Default::default()
        };
        let out = transform(&result_set(), &cfg);
        assert!(out.data[0].label.is_none());
        assert!(out.data[1].label.is_some());
        assert!(out.data[2].label.is_some());
    }

    #[test]
    fn show_label_off_leaves_all_nodes_unstyled() {
        let mut cfg = config();
        cfg.label_style.label_names = "signup".to_string();
        let out = transform(&result_set(), &cfg);
        assert!(out.data.iter().all(|n| n.label.is_none()));
    }

    #[test]
    fn serialized_payload_uses_renderer_field_names() {
        let mut cfg = config();
        cfg.label_style = LabelStyleConfig {
            show_label: true,
            label_names: "visit".to_string(),
            ..Default::default()
        };
        let out = transform(&result_set(), &cfg);
        let json = serde_json::to_value(&out).unwrap();

        assert!(json["data"][0]["itemStyle"]["color"].is_string());
        assert_eq!(json["data"][0]["label"]["fontWeight"], "normal");
        assert_eq!(json["data"][0]["label"]["fontSize"], 15);
        // Unstyled nodes carry no label key at all.
        assert!(json["data"][1].get("label").is_none());
        assert_eq!(json["links"][0]["source"], "visit");
        assert!(json["links"][0]["sourceShare"].is_number());
        assert!(json["labelMap"]["visit, signup"].is_array());
    }

    #[test]
    fn empty_result_set_produces_empty_payload() {
        let out = transform(&ResultSet::default(), &config());
        assert!(out.data.is_empty());
        assert!(out.links.is_empty());
        assert!(out.label_map.is_empty());
    }
}
