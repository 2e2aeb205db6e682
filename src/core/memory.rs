use crate::core::error::EstimateError;
use crate::core::params::SizingParams;
use crate::core::units::{bytes_to_mb, mb_to_bytes};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryEstimate {
    pub node_bytes: f64,
    pub total_rels: f64,
    pub rel_bytes: f64,
    pub page_cache_bytes: f64,
    pub heap_bytes: f64,
    pub page_cache_mb: f64,
    pub heap_mb: f64,
}

impl MemoryEstimate {
    pub fn as_pair(&self) -> (f64, f64) {
        (self.page_cache_mb, self.heap_mb)
    }
}

/// Page cache holds every node and relationship record, heap adds a flat
/// query/transaction reserve on top of it. No validation, see [`try_estimate`].
pub fn estimate(params: &SizingParams) -> MemoryEstimate {
    let nodes = params.num_nodes as f64;
    let node_bytes = nodes * (params.node_overhead + params.props_per_node * params.node_prop_size);

    let total_rels = nodes * params.rels_per_node;
    let rel_bytes = total_rels * (params.rel_overhead + params.props_per_rel * params.rel_prop_size);

    let page_cache_bytes = node_bytes + rel_bytes;
    let heap_bytes = page_cache_bytes + mb_to_bytes(params.query_overhead_mb);

    debug!(
        num_nodes = params.num_nodes,
        node_bytes, rel_bytes, page_cache_bytes, heap_bytes, "estimated memory"
    );

    MemoryEstimate {
        node_bytes,
        total_rels,
        rel_bytes,
        page_cache_bytes,
        heap_bytes,
        page_cache_mb: bytes_to_mb(page_cache_bytes),
        heap_mb: bytes_to_mb(heap_bytes),
    }
}

pub fn try_estimate(params: &SizingParams) -> Result<MemoryEstimate, EstimateError> {
    params.validate()?;
    Ok(estimate(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_params(rng: &mut StdRng) -> SizingParams {
        SizingParams::new(
            rng.random_range(0..10_000_000),
            rng.random_range(0.0..200.0),
            rng.random_range(0.0..20.0),
            rng.random_range(0.0..20.0),
        )
        .with_prop_sizes(rng.random_range(1.0..512.0), rng.random_range(1.0..512.0))
        .with_overheads(rng.random_range(0.0..256.0), rng.random_range(0.0..256.0))
        .with_query_overhead_mb(rng.random_range(0.0..4096.0))
    }

    #[test]
    fn test_example_workload() {
        let e = estimate(&SizingParams::new(53_000, 50.0, 1.0, 1.0));

        assert_eq!(88_192_000.0, e.node_bytes);
        assert_eq!(53_000.0, e.total_rels);
        assert_eq!(5_088_000.0, e.rel_bytes);
        assert_abs_diff_eq!(88.96, e.page_cache_mb, epsilon = 0.01);
        assert_abs_diff_eq!(138.96, e.heap_mb, epsilon = 0.01);
    }

    #[test]
    fn test_as_pair() {
        let e = estimate(&SizingParams::new(53_000, 50.0, 1.0, 1.0));

        let (page_cache, heap) = e.as_pair();
        assert_eq!(e.page_cache_mb, page_cache);
        assert_eq!(e.heap_mb, heap);
    }

    #[test]
    fn test_no_nodes() {
        let e = estimate(&SizingParams::new(0, 50.0, 3.0, 2.0));

        assert_eq!(0.0, e.page_cache_mb);
        assert_eq!(50.0, e.heap_mb);
    }

    #[test]
    fn test_no_relationships() {
        let e = estimate(&SizingParams::new(1024, 0.0, 0.0, 5.0));

        assert_eq!(0.0, e.rel_bytes);
        assert_eq!(1024.0 * 64.0, e.page_cache_bytes);
    }

    #[test]
    fn test_heap_exceeds_page_cache_by_query_overhead() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let p = random_params(&mut rng);
            let e = estimate(&p);
            assert_relative_eq!(
                e.heap_mb,
                e.page_cache_mb + p.query_overhead_mb,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_page_cache_scales_with_nodes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = random_params(&mut rng);
            let k = rng.random_range(1..100);
            let scaled = SizingParams {
                num_nodes: p.num_nodes * k,
                ..p
            };
            assert_relative_eq!(
                estimate(&p).page_cache_mb * k as f64,
                estimate(&scaled).page_cache_mb,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_heap_does_not_scale_with_nodes() {
        let p = SizingParams::new(1_000, 10.0, 2.0, 1.0);
        let scaled = SizingParams { num_nodes: 2_000, ..p };

        assert!(estimate(&scaled).heap_mb < 2.0 * estimate(&p).heap_mb);
    }

    #[test]
    fn test_doubling_byte_sizes_doubles_page_cache() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let p = random_params(&mut rng);
            let doubled = p
                .with_prop_sizes(p.node_prop_size * 2.0, p.rel_prop_size * 2.0)
                .with_overheads(p.node_overhead * 2.0, p.rel_overhead * 2.0);
            assert_eq!(
                estimate(&p).page_cache_mb * 2.0,
                estimate(&doubled).page_cache_mb
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let p = SizingParams::new(123_456, 7.5, 2.25, 0.5);

        assert_eq!(estimate(&p), estimate(&p));
    }

    #[test]
    fn test_unchecked_negative_propagates() {
        let e = estimate(&SizingParams::new(100, 1.0, 1.0, 1.0).with_overheads(-96.0, 0.0));

        assert!(e.node_bytes < 0.0);
    }

    #[test]
    fn test_try_estimate_validates() {
        let p = SizingParams::new(100, 1.0, 1.0, 1.0).with_overheads(-96.0, 0.0);
        assert_eq!(
            Err(EstimateError::Negative {
                field: "node_overhead",
                value: -96.0
            }),
            try_estimate(&p)
        );

        let p = SizingParams::new(53_000, 50.0, 1.0, 1.0);
        assert_eq!(Ok(estimate(&p)), try_estimate(&p));
    }
}
