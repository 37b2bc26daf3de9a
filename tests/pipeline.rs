//! End-to-end denecking of on-disk `.hdr`/`.img` pairs.

mod common;

use common::*;
use deneck::*;
use tempfile::TempDir;

#[test]
fn test_process_pair_writes_derived_output() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("JADNI0013_01");
    // mean axial index 3.33 -> 3
    let (scan, marker) = write_session(&dir, "JADNI0013_01", &[(1, 1, 3), (2, 1, 3), (2, 2, 4)]);

    let config = DeneckConfig::with_bit_width(BitWidth::Sixteen);
    let report = process_pair(&scan, &marker, None, &config).expect("deneck succeeds");

    assert_eq!(report.cutoff, 3);
    assert_eq!(report.output, dir.join("JADNI0013_01_T1_withoutNeck.img"));
    assert!(report.output.exists());
    assert!(dir.join("JADNI0013_01_T1_withoutNeck.hdr").exists());

    let out = load_volume(&report.output).expect("output readable");
    assert_eq!(out.dims(), DIMS);
    assert_affine_close(out.affine(), &test_affine());
    for ((x, y, z), &value) in out.data().indexed_iter() {
        let expected = if z < 3 { 0.0 } else { scan_value(x, y, z) as f64 };
        assert_eq!(value, expected, "voxel ({x},{y},{z})");
    }
}

#[test]
fn test_process_pair_eight_bit_saturates() {
    let tmp = TempDir::new().unwrap();
    let (scan, marker) = write_session(tmp.path(), "s", &[(0, 0, 1)]);
    let output = tmp.path().join("denecked.img");

    let config = DeneckConfig::default();
    let report = process_pair(&scan, &marker, Some(&output), &config).unwrap();
    assert_eq!(report.output, output);

    let out = load_volume(&output).unwrap();
    assert_eq!(out.header().datatype, nifti::NiftiType::Int8 as i16);
    assert_eq!(out.data()[[0, 0, 0]], 0.0);
    // (3, 0, 1) -> 104 fits, (0, 0, 2) -> 201 saturates
    assert_eq!(out.data()[[3, 0, 1]], 104.0);
    assert_eq!(out.data()[[0, 0, 2]], 127.0);
}

#[test]
fn test_process_pair_empty_marker_fails() {
    let tmp = TempDir::new().unwrap();
    let (scan, marker) = write_session(tmp.path(), "s", &[]);

    let err = process_pair(&scan, &marker, None, &DeneckConfig::default()).unwrap_err();
    assert!(matches!(err, DeneckError::EmptyLandmark));
    assert!(!tmp.path().join("s_T1_withoutNeck.img").exists());
}

#[test]
fn test_denecking_output_again_is_noop() {
    let tmp = TempDir::new().unwrap();
    let (scan, marker) = write_session(tmp.path(), "s", &[(1, 1, 6)]);
    let config = DeneckConfig::with_bit_width(BitWidth::Sixteen);

    let first = process_pair(&scan, &marker, None, &config).unwrap();
    let again = tmp.path().join("again.img");
    process_pair(&first.output, &marker, Some(&again), &config).unwrap();

    let a = load_volume(&first.output).unwrap();
    let b = load_volume(&again).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_single_file_nifti_supported() {
    let tmp = TempDir::new().unwrap();
    let scan = tmp.path().join("scan.nii");
    let marker = tmp.path().join("marker.nii");
    write_scan(&scan);
    write_marker(&marker, &[(0, 0, 10), (0, 1, 10), (0, 2, 10), (0, 3, 11)]);

    let config = DeneckConfig::with_bit_width(BitWidth::Sixteen);
    let report = process_pair(&scan, &marker, None, &config).unwrap();
    assert_eq!(report.cutoff, 10);
    assert_eq!(report.output, tmp.path().join("scan_withoutNeck.nii"));

    let out = load_volume(&report.output).unwrap();
    assert!(out.data().slice(ndarray::s![.., .., ..10]).iter().all(|&v| v == 0.0));
    assert_eq!(out.data()[[2, 3, 11]], scan_value(2, 3, 11) as f64);
}

/// Scan whose only spatial transform is a qform (sform_code 0).
fn write_qform_scan(path: &std::path::Path) {
    let mut header = nifti::NiftiHeader::default();
    header.sform_code = 0;
    header.qform_code = 1;
    header.pixdim = [1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0];
    header.quatern_b = 0.0;
    header.quatern_c = 0.0;
    header.quatern_d = 0.0;
    header.quatern_x = 90.0;
    header.quatern_y = -126.0;
    header.quatern_z = -72.0;

    let data = ndarray::Array3::from_shape_fn(DIMS, |(x, y, z)| scan_value(x, y, z));
    nifti::writer::WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&data)
        .unwrap();
}

#[test]
fn test_qform_only_scan_keeps_its_placement() {
    let tmp = TempDir::new().unwrap();
    let scan = tmp.path().join("q_T1.nii");
    write_qform_scan(&scan);
    let marker = tmp.path().join("q_T1_dnk.nii");
    write_marker(&marker, &[(1, 1, 4)]);

    let expected = [
        [2.0, 0.0, 0.0, 90.0],
        [0.0, 2.0, 0.0, -126.0],
        [0.0, 0.0, 2.0, -72.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    assert_affine_close(load_volume(&scan).unwrap().affine(), &expected);

    let output = tmp.path().join("q_denecked.nii");
    let config = DeneckConfig::with_bit_width(BitWidth::Sixteen);
    process_pair(&scan, &marker, Some(&output), &config).unwrap();
    assert_affine_close(load_volume(&output).unwrap().affine(), &expected);
}

#[test]
fn test_analyze_pair_is_rejected_with_clear_error() {
    let tmp = TempDir::new().unwrap();
    let (scan, marker) = write_session(tmp.path(), "a", &[(0, 0, 2)]);
    let header = tmp.path().join("a_T1.hdr");

    // strip the "ni1" magic, leaving a plain Analyze 7.5 header
    let mut bytes = std::fs::read(&header).unwrap();
    bytes[344..348].fill(0);
    std::fs::write(&header, bytes).unwrap();

    match load_volume(&scan) {
        Err(DeneckError::AnalyzeHeader { path }) => assert_eq!(path, header),
        other => panic!("expected AnalyzeHeader, got {other:?}"),
    }
    assert!(matches!(
        process_pair(&scan, &marker, None, &DeneckConfig::default()),
        Err(DeneckError::AnalyzeHeader { .. })
    ));
}
