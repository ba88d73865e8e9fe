use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::CellValue;

// ---------------------------------------------------------------------------
// CSV export of the filtered view
// ---------------------------------------------------------------------------

/// Write the view as delimited text: header row, then one line per record,
/// with the view's column set and ordering. Null cells become empty fields.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(view.columns())
        .context("writing CSV header")?;

    for row in view.rows() {
        let record: Vec<String> = view
            .columns()
            .iter()
            .map(|col| csv_field(row.get(col)))
            .collect();
        csv_writer.write_record(&record).context("writing CSV row")?;
    }

    csv_writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// The UTF-8 bytes of the exported view, ready for a download affordance.
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

/// Export the view to a file chosen by the user.
pub fn export_to_path(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, file)?;
    log::info!("exported {} filtered records to {}", view.len(), path.display());
    Ok(())
}

/// Floats use Rust's shortest round-trip formatting so re-parsing the
/// export recovers the original value.
fn csv_field(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Null) | None => String::new(),
        Some(v) => v.to_string(),
    }
}
