//! Fixture builders for on-disk scan/marker pairs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use deneck::{save_masked, Affine, MaskedVolume, Volume};
use ndarray::Array3;
use nifti::NiftiHeader;

pub const DIMS: (usize, usize, usize) = (4, 5, 12);

pub fn test_affine() -> Affine {
    [
        [-1.5, 0.0, 0.0, 90.0],
        [0.0, 1.5, 0.0, -126.0],
        [0.0, 0.0, 2.0, -72.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Intensity of the synthetic scan at `(x, y, z)`.
pub fn scan_value(x: usize, y: usize, z: usize) -> i16 {
    (z * 100 + y * 10 + x) as i16 + 1
}

pub fn write_scan(path: &Path) {
    let data = Array3::from_shape_fn(DIMS, |(x, y, z)| scan_value(x, y, z));
    let volume = Volume::new(data, test_affine(), NiftiHeader::default());
    save_masked(&MaskedVolume::Int16(volume), path).expect("write scan fixture");
}

pub fn write_marker(path: &Path, dots: &[(usize, usize, usize)]) {
    let mut data = Array3::<i16>::zeros(DIMS);
    for &(x, y, z) in dots {
        data[[x, y, z]] = 1;
    }
    let volume = Volume::new(data, test_affine(), NiftiHeader::default());
    save_masked(&MaskedVolume::Int16(volume), path).expect("write marker fixture");
}

/// Write `<dir>/<name>_T1.img` and `<dir>/<name>_T1_dnk.img` (with headers).
pub fn write_session(dir: &Path, name: &str, dots: &[(usize, usize, usize)]) -> (PathBuf, PathBuf) {
    std::fs::create_dir_all(dir).expect("create session dir");
    let scan = dir.join(format!("{name}_T1.img"));
    let marker = dir.join(format!("{name}_T1_dnk.img"));
    write_scan(&scan);
    write_marker(&marker, dots);
    (scan, marker)
}

pub fn assert_affine_close(actual: &Affine, expected: &Affine) {
    for r in 0..4 {
        for c in 0..4 {
            assert!(
                (actual[r][c] - expected[r][c]).abs() < 1e-4,
                "affine[{r}][{c}] mismatch: expected {}, got {}",
                expected[r][c],
                actual[r][c]
            );
        }
    }
}
