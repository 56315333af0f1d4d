//! Calibration artifact I/O and intrinsics rescaling.
//!
//! The artifact is produced by a separate offline calibration utility and
//! consumed read-only here. A missing or invalid artifact is fatal at
//! startup: without intrinsics the AR overlay cannot be aligned with the
//! physical board.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum CalibrationIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] CalibrationError),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    #[error("calibration image size must be nonzero, got {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
    #[error("focal lengths must be finite and > 0, got fx={fx}, fy={fy}")]
    InvalidFocalLength { fx: f64, fy: f64 },
    #[error("camera matrix contains a non-finite entry")]
    NonFiniteCameraMatrix,
    #[error("distortion coefficients contain a non-finite entry")]
    NonFiniteDistortion,
}

/// Offline calibration record, one per physical camera.
///
/// `camera_matrix` uses the standard pinhole layout
/// `[[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`, row major.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraCalibration {
    pub image_width: u32,
    pub image_height: u32,
    pub camera_matrix: [[f64; 3]; 3],
    #[serde(default)]
    pub distortion_coefficients: [f64; 5],
}

impl CameraCalibration {
    /// Load and validate a calibration artifact from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibrationIoError> {
        let raw = fs::read_to_string(path)?;
        let calib: Self = serde_json::from_str(&raw)?;
        calib.validate()?;
        Ok(calib)
    }

    /// Write this calibration to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibrationIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(CalibrationError::InvalidImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self
            .camera_matrix
            .iter()
            .flatten()
            .any(|v| !v.is_finite())
        {
            return Err(CalibrationError::NonFiniteCameraMatrix);
        }
        let (fx, fy) = (self.camera_matrix[0][0], self.camera_matrix[1][1]);
        if fx <= 0.0 || fy <= 0.0 {
            return Err(CalibrationError::InvalidFocalLength { fx, fy });
        }
        if self.distortion_coefficients.iter().any(|v| !v.is_finite()) {
            return Err(CalibrationError::NonFiniteDistortion);
        }
        Ok(())
    }

    /// Intrinsics at the calibration's own resolution.
    pub fn intrinsics(&self) -> Intrinsics {
        Intrinsics {
            fx: self.camera_matrix[0][0],
            fy: self.camera_matrix[1][1],
            cx: self.camera_matrix[0][2],
            cy: self.camera_matrix[1][2],
        }
    }

    /// Intrinsics rescaled to the live frame resolution.
    ///
    /// When the capture runs at a different resolution than the recorded
    /// calibration, fx/cx scale with the width ratio and fy/cy with the
    /// height ratio.
    pub fn intrinsics_for(&self, frame_width: u32, frame_height: u32) -> Intrinsics {
        let base = self.intrinsics();
        if frame_width == self.image_width && frame_height == self.image_height {
            return base;
        }
        let sx = frame_width as f64 / self.image_width as f64;
        let sy = frame_height as f64 / self.image_height as f64;
        log::info!(
            "rescaling intrinsics from {}x{} to {}x{}",
            self.image_width,
            self.image_height,
            frame_width,
            frame_height
        );
        base.scaled(sx, sy)
    }
}

/// Pinhole intrinsics: focal lengths and principal point, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Intrinsics {
    /// Scale by independent width/height ratios.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            fx: self.fx * sx,
            fy: self.fy * sy,
            cx: self.cx * sx,
            cy: self.cy * sy,
        }
    }
}
