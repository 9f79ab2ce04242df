use crate::enums::{Extent, PlaneIndex};

use ndarray::Array4;
use ndarray::ArrayD;
use ndarray::ArrayView2;
use ndarray::Axis;
use ndarray::Ix4;
use ndarray::s;
use serde_json::{Map, Value};

/// 4x4 matrix mapping voxel indices to physical coordinates (row-major)
pub type Affine = [[f64; 4]; 4];

pub const IDENTITY: Affine = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedDimensions(pub usize);

#[derive(Debug, Clone)]
pub struct Volume {
    /// Voxels as (x, y, z, t); 3-D volumes have a single t entry
    data: Array4<f64>,
    shape: Vec<usize>,
    affine: Affine,
    header: Map<String, Value>,
}

impl Volume {
    /// Wrap a 3-D or 4-D array. Any other rank is rejected.
    pub fn new(
        data: ArrayD<f64>,
        affine: Affine,
        header: Map<String, Value>,
    ) -> Result<Self, UnsupportedDimensions> {
        let shape = data.shape().to_vec();
        let data = match shape.len() {
            3 => data.insert_axis(Axis(3)).into_dimensionality::<Ix4>(),
            4 => data.into_dimensionality::<Ix4>(),
            rank => return Err(UnsupportedDimensions(rank)),
        }
        .map_err(|_| UnsupportedDimensions(shape.len()))?;

        Ok(Self {
            data,
            shape,
            affine,
            header,
        })
    }

    /// Number of axes as stored in the file (3 or 4)
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    pub fn header(&self) -> &Map<String, Value> {
        &self.header
    }

    /// Length of the slice axis
    pub fn depth(&self) -> usize {
        self.data.dim().2
    }

    /// Length of the volume axis, 1 for 3-D data
    pub fn volumes(&self) -> usize {
        self.data.dim().3
    }

    pub fn get_plane(&self, index: PlaneIndex) -> Option<ArrayView2<'_, f64>> {
        if !self.is_valid_index(index) {
            return None;
        }
        let volume = index.volume.unwrap_or(0);
        Some(self.data.slice(s![.., .., index.slice, volume]))
    }

    /// Plane coordinates for the requested extent, in extraction order.
    ///
    /// For 4-D data `Extent::All` walks every slice of volume 0 before
    /// moving on to volume 1.
    pub fn plane_indices(&self, extent: Extent) -> impl Iterator<Item = PlaneIndex> + use<> {
        let four_d = self.rank() == 4;
        let (depth, volumes) = match extent {
            Extent::First => (self.depth().min(1), self.volumes().min(1)),
            Extent::All => (self.depth(), self.volumes()),
        };
        (0..volumes).flat_map(move |volume| {
            (0..depth).map(move |slice| PlaneIndex {
                slice,
                volume: four_d.then_some(volume),
            })
        })
    }

    fn is_valid_index(&self, index: PlaneIndex) -> bool {
        let (_, _, depth, volumes) = self.data.dim();
        let volume_ok = match index.volume {
            Some(volume) => self.rank() == 4 && volume < volumes,
            None => true,
        };
        index.slice < depth && volume_ok
    }
}
