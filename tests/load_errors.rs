use std::fs;
use std::path::{Path, PathBuf};

use finmorph::data::loader::{load_specimens, LoadOptions};
use finmorph::{ClassConfig, Error};

fn unique_root(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "finmorph_load_errors_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn load_single(root: &Path, file_name: &str, contents: &str) -> Result<(), Error> {
    let dir = root.join("f1");
    fs::create_dir_all(&dir).expect("create specimen dir");
    fs::write(dir.join(file_name), contents).expect("write result file");

    let config = ClassConfig::from_json(r#"{"A": ["f1"]}"#).expect("config");
    load_specimens(root, &config, &LoadOptions::default()).map(|_| ())
}

#[test]
fn unparseable_filename_is_a_metadata_error() {
    let root = unique_root("filename");
    let err = load_single(&root, "statistics_bad.csv", "Area;Perim.;Width;Height\n1;1;1;1\n")
        .unwrap_err();
    assert!(matches!(err, Error::MetadataParse { .. }), "{err}");
    assert!(err.to_string().contains("components"), "{err}");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn non_numeric_cell_names_row_and_column() {
    let root = unique_root("cell");
    let err = load_single(
        &root,
        "statistics_10_5_s0_e50_x.csv",
        "Area;Perim.;Width;Height\n1;1;4;7\n2;1;oops;8\n",
    )
    .unwrap_err();
    assert!(matches!(err, Error::MeasurementParse { .. }), "{err}");
    let msg = err.to_string();
    assert!(msg.contains("row 1"), "{msg}");
    assert!(msg.contains("'Width'"), "{msg}");
    assert!(msg.contains("'oops'"), "{msg}");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn missing_column_is_reported_by_name() {
    let root = unique_root("column");
    let err = load_single(
        &root,
        "statistics_10_5_s0_e50_x.csv",
        "Area;Perim.;Width\n1;1;4\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("missing column 'Height'"), "{err}");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn header_only_table_is_rejected() {
    let root = unique_root("empty");
    let err = load_single(
        &root,
        "statistics_10_5_s0_e50_x.csv",
        "Area;Perim.;Width;Height\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("no data rows"), "{err}");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn whitespace_around_cells_is_tolerated() {
    let root = unique_root("whitespace");
    assert!(load_single(
        &root,
        "statistics_10_5_s0_e50_x.csv",
        "Area; Perim. ;Width;Height\n 1 ;1;4;7\n",
    )
    .is_ok());
    let _ = fs::remove_dir_all(&root);
}
