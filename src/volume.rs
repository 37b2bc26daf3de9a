//! In-memory volume model
//!
//! A [`Volume`] is a 3D sample grid indexed `[x, y, z]` together with the
//! voxel-to-world affine and the header it was decoded from. Axis 2 is the
//! axial axis that denecking cuts along.

use ndarray::Array3;
use nifti::NiftiHeader;

/// Row-major 4x4 voxel-to-world transform.
pub type Affine = [[f64; 4]; 4];

/// Index of the axial axis in `[x, y, z]` order.
pub const AXIAL_AXIS: usize = 2;

/// 3D volume with its spatial metadata.
#[derive(Debug, Clone)]
pub struct Volume<T> {
    data: Array3<T>,
    affine: Affine,
    header: NiftiHeader,
}

impl<T> Volume<T> {
    /// Wrap an array with an explicit affine and reference header.
    pub fn new(data: Array3<T>, affine: Affine, header: NiftiHeader) -> Self {
        Self {
            data,
            affine,
            header,
        }
    }

    /// Wrap an array with an identity affine and a default header.
    pub fn from_array(data: Array3<T>) -> Self {
        Self::new(data, identity_affine(), NiftiHeader::default())
    }

    /// Voxel samples.
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Mutable voxel samples; the shape cannot change through this view.
    pub fn data_mut(&mut self) -> &mut Array3<T> {
        &mut self.data
    }

    /// Voxel-to-world transform.
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Header the volume was loaded from.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// `(nx, ny, nz)`
    pub fn dims(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Extent of the axial axis.
    pub fn depth(&self) -> usize {
        self.data.shape()[AXIAL_AXIS]
    }

    /// Replace the samples, keeping affine and header.
    pub fn map<U, F>(&self, f: F) -> Volume<U>
    where
        F: FnMut(&T) -> U,
    {
        Volume {
            data: self.data.map(f),
            affine: self.affine,
            header: self.header.clone(),
        }
    }
}

/// Identity transform.
pub fn identity_affine() -> Affine {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Read the affine from a header.
///
/// Uses the sform when `sform_code > 0`, else the qform when
/// `qform_code > 0`, else a diagonal of voxel sizes centred on the grid with
/// `x` flipped.
pub fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        sform_affine(header)
    } else if header.qform_code > 0 {
        qform_affine(header)
    } else {
        base_affine(header)
    }
}

fn sform_affine(header: &NiftiHeader) -> Affine {
    let row = |r: &[f32; 4]| [r[0] as f64, r[1] as f64, r[2] as f64, r[3] as f64];
    [
        row(&header.srow_x),
        row(&header.srow_y),
        row(&header.srow_z),
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn voxel_sizes(header: &NiftiHeader) -> [f64; 3] {
    let size = |v: f32| if v == 0.0 { 1.0 } else { (v as f64).abs() };
    [
        size(header.pixdim[1]),
        size(header.pixdim[2]),
        size(header.pixdim[3]),
    ]
}

/// Rotation from the unit quaternion `(a, b, c, d)` with `a` implied.
fn quaternion_rotation(b: f64, c: f64, d: f64) -> [[f64; 3]; 3] {
    let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
    let norm = a * a + b * b + c * c + d * d;
    if norm < f64::EPSILON {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let s = 2.0 / norm;
    let (bs, cs, ds) = (b * s, c * s, d * s);
    let (ab, ac, ad) = (a * bs, a * cs, a * ds);
    let (bb, bc, bd) = (b * bs, b * cs, b * ds);
    let (cc, cd, dd) = (c * cs, c * ds, d * ds);
    [
        [1.0 - (cc + dd), bc - ad, bd + ac],
        [bc + ad, 1.0 - (bb + dd), cd - ab],
        [bd - ac, cd + ab, 1.0 - (bb + cc)],
    ]
}

fn qform_affine(header: &NiftiHeader) -> Affine {
    let rotation = quaternion_rotation(
        header.quatern_b as f64,
        header.quatern_c as f64,
        header.quatern_d as f64,
    );
    let qfac = if header.pixdim[0] == -1.0 { -1.0 } else { 1.0 };
    let [vx, vy, vz] = voxel_sizes(header);
    let scale = [vx, vy, vz * qfac];
    let offset = [
        header.quatern_x as f64,
        header.quatern_y as f64,
        header.quatern_z as f64,
    ];

    let mut affine = identity_affine();
    for r in 0..3 {
        for c in 0..3 {
            affine[r][c] = rotation[r][c] * scale[c];
        }
        affine[r][3] = offset[r];
    }
    affine
}

fn base_affine(header: &NiftiHeader) -> Affine {
    let [vx, vy, vz] = voxel_sizes(header);
    let centre = |axis: usize| (header.dim[axis] as f64 - 1.0).max(0.0) / 2.0;
    [
        [-vx, 0.0, 0.0, centre(1) * vx],
        [0.0, vy, 0.0, -centre(2) * vy],
        [0.0, 0.0, vz, -centre(3) * vz],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Store an affine as the header's sform.
///
/// An unset sform code is promoted to 2 (aligned anatomical).
pub fn write_affine(header: &mut NiftiHeader, affine: &Affine) {
    let row = |r: &[f64; 4]| [r[0] as f32, r[1] as f32, r[2] as f32, r[3] as f32];
    header.srow_x = row(&affine[0]);
    header.srow_y = row(&affine[1]);
    header.srow_z = row(&affine[2]);
    if header.sform_code <= 0 {
        header.sform_code = 2;
    }
}
