use std::fs;
use std::path::{Path, PathBuf};

use finmorph::data::loader::{load_specimens, LoadOptions};
use finmorph::data::model::Metric;
use finmorph::export::spreadsheet::{export_metric, export_metrics};
use finmorph::{ClassConfig, Error};

fn unique_root(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "finmorph_spreadsheet_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn write_specimen(root: &Path, name: &str, file_name: &str, contents: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("create specimen dir");
    fs::write(dir.join(file_name), contents).expect("write result file");
}

/// Two specimens whose normalized area series coincide: s1 has volume 10,
/// s2 has volume 20 with doubled raw areas.
fn seed_two_specimens(root: &Path) -> ClassConfig {
    write_specimen(
        root,
        "s1",
        "statistics_10_5_s0_e50_x.csv",
        "Slice;Area;Perim.;Width;Height\n1;1;1;4;7\n2;2;1;5;8\n3;3;1;6;9\n",
    );
    write_specimen(
        root,
        "s2",
        "statistics_20_5_s0_e50_x.csv",
        "Slice;Area;Perim.;Width;Height\n1;2;1;4;7\n2;4;1;5;8\n3;6;1;6;9\n",
    );
    ClassConfig::from_json(r#"{"A": ["s1", "s2"]}"#).expect("config")
}

#[test]
fn scalar_spreadsheet_layout() {
    let root = unique_root("scalar");
    let config = seed_two_specimens(&root);
    let specimens = load_specimens(&root, &config, &LoadOptions::default()).expect("load");

    let out = root.join("sheets");
    let path = export_metric(&specimens, Metric::Volume, &out).expect("export");
    assert_eq!(path, out.join("Volume.csv"));

    let contents = fs::read_to_string(&path).expect("read spreadsheet");
    assert_eq!(contents, " ;Volume\ns1;10\ns2;20\n");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn sequence_spreadsheet_layout() {
    let root = unique_root("sequence");
    let config = seed_two_specimens(&root);
    let specimens = load_specimens(&root, &config, &LoadOptions::default()).expect("load");

    let path = export_metric(&specimens, Metric::Area, &root.join("sheets")).expect("export");
    let contents = fs::read_to_string(&path).expect("read spreadsheet");
    assert_eq!(contents, "s1;s2\n0.1;0.1\n0.2;0.2\n0.3;0.3\n");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn spreadsheets_survive_a_reparse() {
    let root = unique_root("reparse");
    let config = seed_two_specimens(&root);
    let specimens = load_specimens(&root, &config, &LoadOptions::default()).expect("load");

    let path = export_metric(&specimens, Metric::Surface, &root.join("sheets")).expect("export");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(&path)
        .expect("reopen spreadsheet");

    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.get(1), Some("Surface"));
    let labels: Vec<String> = reader
        .records()
        .map(|r| r.expect("record").get(0).unwrap_or("").to_string())
        .collect();
    assert_eq!(labels, ["s1", "s2"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn ragged_slice_counts_are_a_shape_error() {
    let root = unique_root("ragged");
    write_specimen(
        &root,
        "s1",
        "statistics_10_5_s0_e50_x.csv",
        "Slice;Area;Perim.;Width;Height\n1;1;1;4;7\n2;2;1;5;8\n3;3;1;6;9\n",
    );
    write_specimen(
        &root,
        "s2",
        "statistics_20_5_s0_e50_x.csv",
        "Slice;Area;Perim.;Width;Height\n1;2;1;4;7\n2;4;1;5;8\n",
    );
    let config = ClassConfig::from_json(r#"{"A": ["s1", "s2"]}"#).expect("config");
    let specimens = load_specimens(&root, &config, &LoadOptions::default()).expect("load");

    // Scalars do not care about slice counts…
    assert!(export_metric(&specimens, Metric::Volume, &root.join("sheets")).is_ok());

    // …sequence metrics do.
    let err = export_metric(&specimens, Metric::Area, &root.join("sheets")).unwrap_err();
    match err {
        Error::ShapeMismatch {
            label,
            expected,
            got,
            ..
        } => {
            assert_eq!(label, "s2");
            assert_eq!(expected, 3);
            assert_eq!(got, 2);
        }
        other => panic!("expected a shape mismatch, got {other}"),
    }

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn writes_one_file_per_metric_into_a_nested_directory() {
    let root = unique_root("nested");
    let config = seed_two_specimens(&root);
    let specimens = load_specimens(&root, &config, &LoadOptions::default()).expect("load");

    let metrics = [
        Metric::Area,
        Metric::Circularity,
        Metric::Volume,
        Metric::Surface,
        Metric::Width,
        Metric::Height,
        Metric::Length,
    ];
    let out = root.join("deeply").join("nested").join("sheets");
    export_metrics(&specimens, &metrics, &out).expect("export all");

    for metric in metrics {
        let path = out.join(format!("{metric}.csv"));
        assert!(path.is_file(), "missing {}", path.display());
    }

    let _ = fs::remove_dir_all(&root);
}
