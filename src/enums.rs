use serde::Serialize;
use thiserror::Error;

/// Counter-clockwise rotation applied to an extracted plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    None,
    #[default]
    Quarter,
    Half,
    ThreeQuarter,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid rotation angle: {0} (expected one of 0, 90, 180, 270)")]
pub struct InvalidRotation(pub i32);

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// Number of canonical 90° turns this rotation stands for
    pub fn quarter_turns(self) -> usize {
        (self.degrees() / 90) as usize
    }
}

impl TryFrom<i32> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarter),
            other => Err(InvalidRotation(other)),
        }
    }
}

/// How many planes a driver pulls out of a volume
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    /// Slice 0 of volume 0
    First,
    /// Every slice of every volume, volume-major
    All,
}

/// Position of a plane inside a volume (0-based)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaneIndex {
    pub slice: usize,
    /// Only set for 4-D volumes
    pub volume: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Completed,
    Failed,
}
