use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::model::{SliceTable, Specimen};
use crate::config::ClassConfig;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Knobs for a load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Result files must start with this prefix.
    pub method_prefix: String,
    /// Divide each area value by the specimen volume.
    pub normalize: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            method_prefix: "statistics".to_string(),
            normalize: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every configured specimen, class by class, in configuration order.
///
/// Loading is atomic per run: the first specimen that cannot be resolved or
/// parsed aborts with an error naming it, so a report never silently misses
/// a configured specimen.
pub fn load_specimens(
    input_root: &Path,
    config: &ClassConfig,
    options: &LoadOptions,
) -> Result<Vec<Specimen>> {
    let mut specimens = Vec::with_capacity(config.specimen_count());

    for class in config.classes() {
        for name in &class.specimens {
            let specimen = load_specimen(input_root, name, &class.label, options)?;
            info!(
                "loaded specimen '{}' (class '{}', {} slices)",
                specimen.label(),
                specimen.class_label(),
                specimen.slice_count()
            );
            specimens.push(specimen);
        }
    }

    Ok(specimens)
}

fn load_specimen(
    input_root: &Path,
    name: &str,
    class_label: &str,
    options: &LoadOptions,
) -> Result<Specimen> {
    let dir = input_root.join(name);
    let file = find_result_file(&dir, name, &options.method_prefix)?;
    debug!("specimen '{}': result file {}", name, file.display());

    let meta = parse_filename_metadata(&file, name)?;
    let table = parse_measurement_table(&file, name)?;

    Specimen::new(
        name,
        class_label,
        meta.volume,
        meta.surface,
        meta.length,
        table,
        options.normalize,
    )
}

// ---------------------------------------------------------------------------
// Result-file discovery
// ---------------------------------------------------------------------------

/// Pick the specimen's result file: the lexicographically first regular file
/// in `dir` whose name starts with `prefix`.  Directory iteration order is
/// platform-dependent, so the candidates are sorted before picking.
fn find_result_file(dir: &Path, specimen: &str, prefix: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut candidates: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && entry.path().is_file() {
            candidates.push(name);
        }
    }
    candidates.sort();

    match candidates.into_iter().next() {
        Some(name) => Ok(dir.join(name)),
        None => Err(Error::SpecimenFileNotFound {
            specimen: specimen.to_string(),
            prefix: prefix.to_string(),
            dir: dir.to_path_buf(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Filename metadata
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct FilenameMetadata {
    volume: f64,
    surface: f64,
    length: f64,
}

/// Filename grammar: `<prefix>_<volume>_<surface>_s<start>_e<end>_<rest>`.
/// Components are positional; the slice range markers `s`/`e` are stripped
/// and `length = end − start`.
fn parse_filename_metadata(file: &Path, specimen: &str) -> Result<FilenameMetadata> {
    let name = display_name(file);

    let comps: Vec<&str> = name.split('_').collect();
    if comps.len() < 5 {
        return Err(meta_err(
            specimen,
            &name,
            format!(
                "expected at least 5 '_'-separated components, found {}",
                comps.len()
            ),
        ));
    }

    let volume: f64 = comps[1].parse().map_err(|_| {
        meta_err(
            specimen,
            &name,
            format!("volume component '{}' is not a number", comps[1]),
        )
    })?;
    let surface: f64 = comps[2].parse().map_err(|_| {
        meta_err(
            specimen,
            &name,
            format!("surface component '{}' is not a number", comps[2]),
        )
    })?;

    let start = range_bound(comps[3], 's').map_err(|reason| meta_err(specimen, &name, reason))?;
    let end = range_bound(comps[4], 'e').map_err(|reason| meta_err(specimen, &name, reason))?;

    Ok(FilenameMetadata {
        volume,
        surface,
        length: end - start,
    })
}

/// Parse one slice-range bound (`s123` / `e456`) into its numeric value.
fn range_bound(component: &str, marker: char) -> std::result::Result<f64, String> {
    let digits = component.strip_prefix(marker).ok_or_else(|| {
        format!("range component '{component}' does not start with '{marker}'")
    })?;
    digits
        .parse()
        .map_err(|_| format!("range component '{component}': '{digits}' is not a number"))
}

// ---------------------------------------------------------------------------
// Measurement table
// ---------------------------------------------------------------------------

/// Parse the `;`-delimited measurement table.  Columns are located by header
/// name; anything beyond the four required ones is ignored.
fn parse_measurement_table(file: &Path, specimen: &str) -> Result<SliceTable> {
    let file_name = display_name(file);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_path(file)
        .map_err(|e| meas_err(specimen, &file_name, format!("cannot open: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| meas_err(specimen, &file_name, format!("cannot read header row: {e}")))?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| meas_err(specimen, &file_name, format!("missing column '{name}'")))
    };

    let area_idx = column("Area")?;
    let perim_idx = column("Perim.")?;
    let width_idx = column("Width")?;
    let height_idx = column("Height")?;

    let mut table = SliceTable::default();
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| meas_err(specimen, &file_name, format!("row {row_no}: {e}")))?;

        let value = |idx: usize, col: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            raw.parse().map_err(|_| {
                meas_err(
                    specimen,
                    &file_name,
                    format!("row {row_no}, column '{col}': '{raw}' is not a number"),
                )
            })
        };

        table.area.push(value(area_idx, "Area")?);
        table.perimeter.push(value(perim_idx, "Perim.")?);
        table.width.push(value(width_idx, "Width")?);
        table.height.push(value(height_idx, "Height")?);
    }

    if table.area.is_empty() {
        return Err(meas_err(specimen, &file_name, "no data rows".to_string()));
    }

    Ok(table)
}

// ---- error helpers ----

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn meta_err(specimen: &str, file: &str, reason: String) -> Error {
    Error::MetadataParse {
        specimen: specimen.to_string(),
        file: file.to_string(),
        reason,
    }
}

fn meas_err(specimen: &str, file: &str, reason: String) -> Error {
    Error::MeasurementParse {
        specimen: specimen.to_string(),
        file: file.to_string(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
