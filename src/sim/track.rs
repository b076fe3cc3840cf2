//! Track geometry and the orbit motion model
//!
//! A track is an immutable ring the bodies ride. Positions come from a single
//! monotonically accumulating angle: the figure-eight is two same-radius
//! circles with opposite x offsets, and the lobe is selected from the angle's
//! principal value. The accumulator itself never wraps, so the path stays
//! continuous across lobe boundaries.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wrap_angle;

/// Geometry rejected at construction time
#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("track radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("track width must be in (0, radius), got width {width} for radius {radius}")]
    InvalidWidth { width: f32, radius: f32 },
    #[error("lobe offset must be positive and finite, got {0}")]
    InvalidLobeOffset(f32),
}

/// Track topology
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackShape {
    /// One circle centered at the origin
    Circle,
    /// Two same-radius lobes offset by ±`lobe_offset` on x
    FigureEight { lobe_offset: f32 },
}

/// An immutable track description, shared by every body in a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Centerline radius
    pub radius: f32,
    /// Half-width of the band (outer edge = radius + width, inner = radius - width)
    pub width: f32,
    pub shape: TrackShape,
}

impl Track {
    /// Single-circle track centered at the origin
    pub fn circle(radius: f32, width: f32) -> Result<Self, TrackError> {
        Self::validate(radius, width)?;
        Ok(Self {
            radius,
            width,
            shape: TrackShape::Circle,
        })
    }

    /// Figure-eight track: two lobes of the same radius, centers at ±lobe_offset
    pub fn figure_eight(radius: f32, width: f32, lobe_offset: f32) -> Result<Self, TrackError> {
        Self::validate(radius, width)?;
        if !lobe_offset.is_finite() || lobe_offset <= 0.0 {
            return Err(TrackError::InvalidLobeOffset(lobe_offset));
        }
        Ok(Self {
            radius,
            width,
            shape: TrackShape::FigureEight { lobe_offset },
        })
    }

    fn validate(radius: f32, width: f32) -> Result<(), TrackError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(TrackError::InvalidRadius(radius));
        }
        if !width.is_finite() || width <= 0.0 || width >= radius {
            return Err(TrackError::InvalidWidth { width, radius });
        }
        Ok(())
    }

    /// Radius the player rides (outer edge of the band)
    #[inline]
    pub fn outer_radius(&self) -> f32 {
        self.radius + self.width
    }

    /// Radius spawned bodies ride (inner edge of the band)
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.radius - self.width
    }

    /// Angular distance of one complete lap: 2π per circle, 4π for both lobes
    #[inline]
    pub fn lap_unit(&self) -> f32 {
        match self.shape {
            TrackShape::Circle => TAU,
            TrackShape::FigureEight { .. } => 2.0 * TAU,
        }
    }

    /// World position of a body at `angle` riding `ride_radius`
    ///
    /// Pure function of its inputs. For the figure-eight, the first half of
    /// the principal angle rides the +x lobe and the second half the -x lobe;
    /// the selector only moves the center, the trig is identical either side.
    pub fn position(&self, angle: f32, ride_radius: f32) -> Vec2 {
        let base = crate::polar_to_cartesian(ride_radius, angle);
        match self.shape {
            TrackShape::Circle => base,
            TrackShape::FigureEight { lobe_offset } => {
                if wrap_angle(angle) < PI {
                    base + Vec2::new(lobe_offset, 0.0)
                } else {
                    base - Vec2::new(lobe_offset, 0.0)
                }
            }
        }
    }
}
