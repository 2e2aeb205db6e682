use crate::core::memory::MemoryEstimate;
use crate::core::params::SizingParams;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub params: &'a SizingParams,
    pub estimate: &'a MemoryEstimate,
}

pub fn write_text<W: Write>(
    out: &mut W,
    entries: &[ReportEntry<'_>],
    breakdown: bool,
) -> std::io::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if let Some(name) = entry.name {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "[{name}]")?;
        }
        let e = entry.estimate;
        writeln!(out, "Estimated page cache: {:.2} MB", e.page_cache_mb)?;
        writeln!(out, "Estimated heap memory: {:.2} MB", e.heap_mb)?;
        if breakdown {
            writeln!(out, "  node data: {:.0} bytes", e.node_bytes)?;
            writeln!(
                out,
                "  relationship data: {:.0} bytes ({:.0} relationships)",
                e.rel_bytes, e.total_rels
            )?;
            writeln!(
                out,
                "  query overhead: {:.2} MB",
                entry.params.query_overhead_mb
            )?;
        }
    }
    Ok(())
}

/// A single unnamed entry is written as an object, anything else as an array.
pub fn write_json<W: Write>(out: &mut W, entries: &[ReportEntry<'_>]) -> anyhow::Result<()> {
    match entries {
        [single] if single.name.is_none() => serde_json::to_writer_pretty(&mut *out, single)?,
        _ => serde_json::to_writer_pretty(&mut *out, entries)?,
    }
    writeln!(out)?;
    Ok(())
}
