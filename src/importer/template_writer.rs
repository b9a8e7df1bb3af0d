// ==========================================
// Appliance Registry - Import templates
// ==========================================
// One CSV per entity kind: canonical headers + one sample row
// Files are named after the default sheet, so a template imports
// back unchanged
// ==========================================

use crate::importer::entity_registry::EntityKind;
use crate::importer::error::{ImportError, ImportResult};
use csv::Writer;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the template of `kind` to any writer
pub fn write_template<W: Write>(kind: EntityKind, out: W) -> ImportResult<()> {
    let mut writer = Writer::from_writer(out);
    let sample = kind.sample_row();

    writer
        .write_record(sample.iter().map(|(header, _)| *header))
        .and_then(|_| writer.write_record(sample.iter().map(|(_, value)| *value)))
        .map_err(|e| ImportError::TemplateWriteError(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| ImportError::TemplateWriteError(e.to_string()))
}

/// Writes `<Sheet>.csv` for every entity kind into `dir`
///
/// # Returns
/// - paths of the written files, in registry order
pub fn write_templates(dir: &Path) -> ImportResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| ImportError::TemplateWriteError(e.to_string()))?;

    let mut written = Vec::new();
    for kind in EntityKind::ALL {
        let path = dir.join(format!("{}.csv", kind.default_sheet_name()));
        let file = fs::File::create(&path)
            .map_err(|e| ImportError::TemplateWriteError(format!("{}: {}", path.display(), e)))?;
        write_template(kind, file)?;
        written.push(path);
    }

    info!(dir = %dir.display(), count = written.len(), "import templates written");
    Ok(written)
}
