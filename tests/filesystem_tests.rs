mod common;

use common::{RecordingHost, init_logging};
use image::GrayImage;
use scan_viewer::{
    DirectoryProvider, ExitAction, FileSessionLog, ImageProvider, RegionCatalog, ScanRef,
    ScanType, Session, SessionLog, SliceLoader, SliceLoaderError, ViewerConfig,
};
use std::{fs, path::Path};
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    GrayImage::new(width, height).save(path).unwrap();
}

#[test]
fn directory_provider_reads_dimensions_and_skips_other_files() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("XRay/XR2");
    write_png(&folder.join("b.png"), 8, 4);
    write_png(&folder.join("a.png"), 3, 6);
    fs::write(folder.join("notes.txt"), "not an image").unwrap();
    fs::write(folder.join("broken.png"), "not a png either").unwrap();

    let provider = DirectoryProvider::new(dir.path());
    let set = SliceLoader::load(&provider, ScanRef::new(ScanType::XRay, 2)).unwrap();

    let names: Vec<_> = set.names().collect();
    assert_eq!(names, ["a.png", "b.png"]);
    assert_eq!(set.get(1).unwrap().aspect_ratio(), 0.5);
    assert_eq!(set.get(2).unwrap().width, 8);
    assert_eq!(set.get(2).unwrap().height, 4);
}

#[test]
fn missing_folder_is_empty_slice_set() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let provider = DirectoryProvider::new(dir.path());

    assert!(provider.list("CTScan/CT9").unwrap().is_empty());
    let err = SliceLoader::load(&provider, ScanRef::new(ScanType::CTScan, 9)).unwrap_err();
    assert!(matches!(err, SliceLoaderError::EmptySliceSet(key) if key == "CTScan/CT9"));
}

#[test]
fn file_log_appends_header_and_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("TimeLog.txt");

    let mut log = FileSessionLog::open(&path);
    log.append("CT1\t2.500 seconds").unwrap();
    let mut log = FileSessionLog::open(&path);
    log.append("XR3\t0.125 seconds").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Log "));
    assert_eq!(lines[1], "CT1\t2.500 seconds");
    assert!(lines[2].starts_with("Log "));
    assert_eq!(lines[3], "XR3\t0.125 seconds");
}

#[test]
fn unwritable_log_location_does_not_block_session() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Photos");
    write_png(&root.join("XRay/XR1/a.png"), 4, 4);
    write_png(&root.join("XRay/XR1/b.png"), 4, 4);
    let log_path = dir.path().join("missing-dir").join("TimeLog.txt");
    let config = ViewerConfig {
        image_root: root,
        session_log: log_path.clone(),
        ..Default::default()
    };

    let mut session = Session::from_config(&config).expect("session should open without its log");
    let mut host = RecordingHost::default();
    session
        .enter_viewer(ScanRef::new(ScanType::XRay, 1), &mut host)
        .unwrap();
    assert_eq!(session.on_control_changed(2.0, &mut host), Ok(2));
    assert_eq!(host.displayed_slice(), Some("b.png"));

    let record = session.exit_viewer(ExitAction::StopTracking, &mut host);
    assert!(record.is_some());
    assert!(!log_path.exists());
}

#[test]
fn first_metadata_file_wins_on_duplicate_keys() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("xray_regions.json");
    let second = dir.path().join("xray_regions_v2.json");
    fs::write(
        &first,
        r#"{"images":[{"image_name":"XR1.png","altered_region":{"center":{"x":1,"y":2},"radius":1}}]}"#,
    )
    .unwrap();
    fs::write(
        &second,
        r#"{"images":[
            {"image_name":"XR1.png","altered_region":{"center":{"x":7,"y":8},"radius":5}},
            {"image_name":"XR2.png","altered_region":{"center":{"x":3,"y":4},"radius":2}}
        ]}"#,
    )
    .unwrap();

    let catalog = RegionCatalog::load_from_files(&[&first, &second]).unwrap();

    assert_eq!(catalog.len(), 2);
    let placement = catalog.resolve(ScanRef::new(ScanType::XRay, 1), 1).unwrap();
    assert_eq!(placement.position, [1.0, 2.0]);
    assert_eq!(placement.radius, 1.0);
    let placement = catalog.resolve(ScanRef::new(ScanType::XRay, 2), 1).unwrap();
    assert_eq!(placement.position, [3.0, 4.0]);
}

#[test]
fn interaction_log_file_gets_header_and_rows() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Photos");
    write_png(&root.join("CTScan/CT2/001.png"), 4, 4);
    let interaction_path = dir.path().join("buttonInteractLogs.csv");
    let config = ViewerConfig {
        image_root: root,
        session_log: dir.path().join("TimeLog.txt"),
        interaction_log: Some(interaction_path.clone()),
        ..Default::default()
    };

    let mut session = Session::from_config(&config).unwrap();
    let mut host = RecordingHost::default();
    session.open_selection(ScanType::CTScan, &mut host).unwrap();
    session
        .enter_viewer(ScanRef::new(ScanType::CTScan, 2), &mut host)
        .unwrap();
    session.exit_viewer(ExitAction::Back, &mut host);

    let text = fs::read_to_string(&interaction_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Log "));
    assert_eq!(lines[1], "Index,Time(ms),Event,Target");
    assert!(lines[2].starts_with("0,") && lines[2].ends_with(",OpenSelection,CT"));
    assert!(lines[3].starts_with("1,") && lines[3].ends_with(",EnterViewer,CT2"));
    assert!(lines[4].starts_with("2,") && lines[4].ends_with(",Back,CT2"));
}

#[test]
fn session_from_config_runs_end_to_end() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Photos");
    for name in ["002.png", "001.png", "003.png"] {
        write_png(&root.join("CTScan/CT1").join(name), 10, 5);
    }
    let metadata = dir.path().join("ct_regions.json");
    fs::write(
        &metadata,
        r#"{"images":[{"image_name":"CT1.png","id":3,"altered_region":{"center":{"x":0.25,"y":-0.5},"radius":0.1}}]}"#,
    )
    .unwrap();
    let log_path = dir.path().join("TimeLog.txt");
    let config_path = dir.path().join("viewer.json");
    let config_json = serde_json::json!({
        "image_root": root,
        "region_metadata": [metadata],
        "session_log": log_path,
        "display_width": 0.5,
    });
    fs::write(&config_path, config_json.to_string()).unwrap();

    let config = ViewerConfig::load(&config_path).unwrap();
    assert_eq!(config.display_width, 0.5);
    let mut session = Session::from_config(&config).unwrap();
    let mut host = RecordingHost::default();

    let range = session
        .enter_viewer(ScanRef::new(ScanType::CTScan, 1), &mut host)
        .unwrap();
    assert_eq!(range.max, 3);
    assert_eq!(host.displayed_slice(), Some("001.png"));
    assert_eq!(host.marker(), None);

    session.on_control_changed(3.0, &mut host).unwrap();
    assert_eq!(host.marker().map(|m| m.position), Some([0.25, -0.5]));

    session.exit_viewer(ExitAction::StopTracking, &mut host).unwrap();

    let text = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Log "));
    assert!(lines[1].starts_with("CT1\t"));
    assert!(lines[1].ends_with(" seconds"));
}
