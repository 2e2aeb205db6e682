use crate::core::error::EstimateError;
use serde::Serialize;

pub const DEFAULT_PROP_SIZE: f64 = 32.0;
pub const DEFAULT_ENTITY_OVERHEAD: f64 = 64.0;
pub const DEFAULT_QUERY_OVERHEAD_MB: f64 = 50.0;

/// Sizing inputs for one deployment. Counts other than `num_nodes` are
/// averages, byte fields are per entity or per property value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizingParams {
    pub num_nodes: u64,
    pub props_per_node: f64,
    pub rels_per_node: f64,
    pub props_per_rel: f64,
    pub node_prop_size: f64,
    pub rel_prop_size: f64,
    pub node_overhead: f64,
    pub rel_overhead: f64,
    pub query_overhead_mb: f64,
}

impl SizingParams {
    pub fn new(num_nodes: u64, props_per_node: f64, rels_per_node: f64, props_per_rel: f64) -> Self {
        Self {
            num_nodes,
            props_per_node,
            rels_per_node,
            props_per_rel,
            node_prop_size: DEFAULT_PROP_SIZE,
            rel_prop_size: DEFAULT_PROP_SIZE,
            node_overhead: DEFAULT_ENTITY_OVERHEAD,
            rel_overhead: DEFAULT_ENTITY_OVERHEAD,
            query_overhead_mb: DEFAULT_QUERY_OVERHEAD_MB,
        }
    }

    pub fn with_prop_sizes(mut self, node_prop_size: f64, rel_prop_size: f64) -> Self {
        self.node_prop_size = node_prop_size;
        self.rel_prop_size = rel_prop_size;
        self
    }

    pub fn with_overheads(mut self, node_overhead: f64, rel_overhead: f64) -> Self {
        self.node_overhead = node_overhead;
        self.rel_overhead = rel_overhead;
        self
    }

    pub fn with_query_overhead_mb(mut self, query_overhead_mb: f64) -> Self {
        self.query_overhead_mb = query_overhead_mb;
        self
    }

    pub fn validate(&self) -> Result<(), EstimateError> {
        let fields = [
            ("props_per_node", self.props_per_node),
            ("rels_per_node", self.rels_per_node),
            ("props_per_rel", self.props_per_rel),
            ("node_prop_size", self.node_prop_size),
            ("rel_prop_size", self.rel_prop_size),
            ("node_overhead", self.node_overhead),
            ("rel_overhead", self.rel_overhead),
            ("query_overhead_mb", self.query_overhead_mb),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(EstimateError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(EstimateError::Negative { field, value });
            }
        }
        Ok(())
    }
}
