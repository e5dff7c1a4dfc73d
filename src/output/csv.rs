// CSV output of the correction table
// One "m,code" row per retained point, M with three decimals

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::modulation::CorrectionTable;

/// Write `table` as CSV rows to `writer`.
pub fn write_csv<W: Write>(table: &CorrectionTable, mut writer: W) -> Result<()> {
    for row in &table.rows {
        writeln!(writer, "{:.3},{}", row.m, row.code).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write `table` to the file at `path`, replacing it.
pub fn save_csv(table: &CorrectionTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(table, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
