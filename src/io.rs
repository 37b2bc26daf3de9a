//! Volume file I/O through the `nifti` crate.
//!
//! Reads single-file NIfTI-1 (`.nii`, `.nii.gz`) and NIfTI-1 dual-file pairs
//! addressed by either their `.hdr` or their `.img` path. Writes masked
//! volumes the same way: an `.img` output path produces an `.hdr`/`.img` pair.
//! Plain Analyze 7.5 headers (no `ni1`/`n+1` magic) are not decoded and are
//! reported as [`DeneckError::AnalyzeHeader`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ndarray::{Array3, ArrayD, Axis, Ix3};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};
use tracing::debug;

use crate::error::{DeneckError, Result};
use crate::mask::MaskedVolume;
use crate::naming::header_for_image;
use crate::volume::{affine_from_header, write_affine, Affine, Volume};

/// Load a volume as `f64` intensities with scaling applied.
pub fn load_volume(path: &Path) -> Result<Volume<f64>> {
    let nifti_err = |source| DeneckError::Nifti {
        path: path.to_path_buf(),
        source,
    };

    let options = ReaderOptions::new();
    let header_path = header_for_image(path);
    let read = match &header_path {
        Some(header_path) => options.read_file_pair(header_path, path),
        None => options.read_file(path),
    };
    let object = match read {
        Ok(object) => object,
        Err(source) => {
            let header_file = header_path.as_deref().unwrap_or(path);
            if is_analyze_header(header_file) {
                return Err(DeneckError::AnalyzeHeader {
                    path: header_file.to_path_buf(),
                });
            }
            return Err(nifti_err(source));
        }
    };

    let header = object.header().clone();
    let affine = affine_from_header(&header);
    let array: ArrayD<f64> = object.into_volume().into_ndarray().map_err(nifti_err)?;
    let data = into_three_d(array, path)?;

    debug!(path = %path.display(), dims = ?data.dim(), "volume loaded");
    Ok(Volume::new(data, affine, header))
}

const HEADER_SIZE: usize = 348;
const MAGIC_RANGE: std::ops::Range<usize> = 344..348;

/// Whether `bytes` hold a 348-byte header without NIfTI-1 magic.
fn is_analyze_bytes(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE {
        return false;
    }
    let sizeof_hdr = [bytes[0], bytes[1], bytes[2], bytes[3]];
    let sized = i32::from_le_bytes(sizeof_hdr) == HEADER_SIZE as i32
        || i32::from_be_bytes(sizeof_hdr) == HEADER_SIZE as i32;
    let magic = &bytes[MAGIC_RANGE];
    sized && magic != b"ni1\0" && magic != b"n+1\0"
}

/// Uncompressed header file that parses as Analyze 7.5 rather than NIfTI-1.
fn is_analyze_header(path: &Path) -> bool {
    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    let read = File::open(path)
        .and_then(|file| file.take(HEADER_SIZE as u64).read_to_end(&mut bytes));
    read.is_ok() && is_analyze_bytes(&bytes)
}

/// Drop trailing singleton axes (a 4D file with one frame) and require 3D.
fn into_three_d(mut array: ArrayD<f64>, path: &Path) -> Result<Array3<f64>> {
    while array.ndim() > 3 && array.shape()[array.ndim() - 1] == 1 {
        let last = Axis(array.ndim() - 1);
        array = array.index_axis_move(last, 0);
    }

    let shape = array.shape().to_vec();
    array
        .into_dimensionality::<Ix3>()
        .map_err(|_| DeneckError::NotThreeDimensional {
            path: path.to_path_buf(),
            shape,
        })
}

/// Path handed to the writer: the `.hdr` of a pair, or the file itself.
fn writer_path(path: &Path) -> PathBuf {
    header_for_image(path).unwrap_or_else(|| path.to_path_buf())
}

fn output_header(reference: &NiftiHeader, affine: &Affine, datatype: NiftiType) -> NiftiHeader {
    let mut header = reference.clone();
    write_affine(&mut header, affine);
    header.datatype = datatype as i16;
    header.bitpix = (datatype.size_of() * 8) as i16;
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header
}

/// Write a masked volume, keeping the reference header's spatial fields.
pub fn save_masked(volume: &MaskedVolume, path: &Path) -> Result<()> {
    let target = writer_path(path);
    let nifti_err = |source| DeneckError::Nifti {
        path: path.to_path_buf(),
        source,
    };

    match volume {
        MaskedVolume::Int8(v) => {
            let header = output_header(v.header(), v.affine(), NiftiType::Int8);
            WriterOptions::new(&target)
                .reference_header(&header)
                .write_nifti(v.data())
                .map_err(nifti_err)?;
        }
        MaskedVolume::Int16(v) => {
            let header = output_header(v.header(), v.affine(), NiftiType::Int16);
            WriterOptions::new(&target)
                .reference_header(&header)
                .write_nifti(v.data())
                .map_err(nifti_err)?;
        }
    }

    debug!(path = %path.display(), width = %volume.bit_width(), "volume written");
    Ok(())
}
