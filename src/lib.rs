pub mod config;
pub mod flow;
pub mod grouping;
pub mod palette;
pub mod sankey;
pub mod scalar;
pub mod series;
pub mod table;

pub use flow::{FlowEdge, FlowGraph, aggregate};
pub use table::{ResultSet, Row};
