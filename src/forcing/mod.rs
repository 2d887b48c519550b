//! Periodic forcing patterns and migration generators
//!
//! Forcing describes how organism density varies with TIME and DEPTH.
//!
//! A [`ForcingPattern`] is one daily cycle of per-depth density frames; the
//! solver loops it by `step mod period`, looking the frame up once per outer
//! time step and holding it fixed across integrator sub-stages.
//!
//! # Diel Vertical Migration
//!
//! The standard forcing for copepods and their predators is diel vertical
//! migration (DVM): organisms occupy a shallow layer for part of the day, a
//! deep layer for the rest, and migrate linearly between them during
//! configurable ascent/descent windows. [`dvm`] generates such a pattern;
//! [`combine`] mixes several patterns with weights to represent populations
//! with distinct migration behaviors.
//!
//! # Example
//!
//! ```rust
//! use edna_rs::grid::DepthGrid;
//! use edna_rs::forcing::{dvm, DvmSchedule};
//!
//! let grid = DepthGrid::new(300.0, 2.0).unwrap();
//! // Up at dawn (06-09 h), down at dusk (18-21 h)
//! let schedule = DvmSchedule {
//!     shallow_depth: 50.0,
//!     deep_depth: 200.0,
//!     ascent_start: 6.0,
//!     ascent_end: 9.0,
//!     descent_start: 18.0,
//!     descent_end: 21.0,
//!     layer_thickness: 20.0,
//! };
//! let pattern = dvm(&grid, 8640, &schedule).unwrap();
//! assert_eq!(pattern.period(), 8640);
//! ```

use crate::error::{EdnaError, EdnaResult};
use crate::grid::DepthGrid;
use nalgebra::DVector;

// =================================================================================================
// Forcing Pattern
// =================================================================================================

/// One periodic cycle of per-depth density frames
///
/// Indexed by (time-step-within-period, depth-cell). Frames are read-only
/// after construction; lookup wraps by `step mod period`.
#[derive(Debug, Clone)]
pub struct ForcingPattern {
    frames: Vec<DVector<f64>>,
}

impl ForcingPattern {
    /// Create a pattern from explicit frames
    ///
    /// # Errors
    ///
    /// Returns [`EdnaError::Configuration`] on an empty frame list and
    /// [`EdnaError::DimensionMismatch`] when frames disagree in length.
    pub fn new(frames: Vec<DVector<f64>>) -> EdnaResult<Self> {
        if frames.is_empty() {
            return Err(EdnaError::config("forcing pattern needs at least one frame"));
        }
        let cells = frames[0].len();
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != cells {
                return Err(EdnaError::dimension(
                    format!("forcing frame {}", i),
                    cells,
                    frame.len(),
                ));
            }
        }
        Ok(Self { frames })
    }

    /// Pattern with the same value everywhere, every step
    pub fn constant(cells: usize, period: usize, value: f64) -> EdnaResult<Self> {
        if period == 0 {
            return Err(EdnaError::config("forcing period must be at least 1 step"));
        }
        Ok(Self {
            frames: vec![DVector::from_element(cells, value); period],
        })
    }

    /// All-zero pattern (no forcing)
    pub fn zero(cells: usize, period: usize) -> EdnaResult<Self> {
        Self::constant(cells, period, 0.0)
    }

    /// Number of frames in one cycle
    pub fn period(&self) -> usize {
        self.frames.len()
    }

    /// Number of depth cells per frame
    pub fn cells(&self) -> usize {
        self.frames[0].len()
    }

    /// Frame for a given simulation step (wraps by `step mod period`)
    pub fn frame(&self, step: usize) -> &DVector<f64> {
        &self.frames[step % self.frames.len()]
    }

    /// Depth of maximum density at each frame of the cycle
    ///
    /// Useful for checking a migration pattern against its schedule.
    pub fn center_depth_trajectory(&self, grid: &DepthGrid) -> Vec<f64> {
        self.frames
            .iter()
            .map(|frame| {
                let max_idx = frame.imax();
                grid.z()[max_idx]
            })
            .collect()
    }
}

// =================================================================================================
// Step Forcing
// =================================================================================================

/// Forcing resolved for one outer time step
///
/// Built by the solver once per step and held fixed across all integrator
/// sub-stage evaluations within that step.
#[derive(Debug, Clone, Copy)]
pub struct StepForcing<'a> {
    /// Outer step index (drives the digestion ledger's circular slot)
    pub step: usize,

    /// Source/prey density per depth cell for this step
    pub source: &'a DVector<f64>,

    /// Predator density per depth cell, when the scenario has predators
    pub predators: Option<&'a DVector<f64>>,
}

/// Complete forcing for a scenario: source pattern + optional predators
#[derive(Debug, Clone)]
pub struct Forcing {
    source: ForcingPattern,
    predators: Option<ForcingPattern>,
}

impl Forcing {
    /// Source-only forcing (basic transport model)
    pub fn source_only(source: ForcingPattern) -> Self {
        Self {
            source,
            predators: None,
        }
    }

    /// Source plus predator distribution (predation model)
    pub fn with_predators(source: ForcingPattern, predators: ForcingPattern) -> Self {
        Self {
            source,
            predators: Some(predators),
        }
    }

    /// Source pattern
    pub fn source(&self) -> &ForcingPattern {
        &self.source
    }

    /// Predator pattern, if any
    pub fn predators(&self) -> Option<&ForcingPattern> {
        self.predators.as_ref()
    }

    /// Resolve both patterns for one outer step
    pub fn at(&self, step: usize) -> StepForcing<'_> {
        StepForcing {
            step,
            source: self.source.frame(step),
            predators: self.predators.as_ref().map(|p| p.frame(step)),
        }
    }
}

// =================================================================================================
// Diel Vertical Migration
// =================================================================================================

/// Migration timetable for one species
///
/// Times are hours of day in `[0, 24)`. Between `ascent_start` and
/// `ascent_end` the population moves from `deep_depth` up to
/// `shallow_depth`; between `descent_start` and `descent_end` it moves back
/// down. Outside the windows it sits at whichever depth the schedule
/// implies. Density is spread uniformly over a layer of
/// `layer_thickness` meters centered on the population depth, normalized so
/// each frame sums to 1 over the occupied cells.
#[derive(Debug, Clone, Copy)]
pub struct DvmSchedule {
    /// Daytime/nighttime shallow residence depth \[m\]
    pub shallow_depth: f64,
    /// Deep residence depth \[m\]
    pub deep_depth: f64,
    /// Start of upward migration \[h\]
    pub ascent_start: f64,
    /// End of upward migration \[h\]
    pub ascent_end: f64,
    /// Start of downward migration \[h\]
    pub descent_start: f64,
    /// End of downward migration \[h\]
    pub descent_end: f64,
    /// Thickness of the occupied layer \[m\]
    pub layer_thickness: f64,
}

/// Generate a diel-vertical-migration pattern
///
/// `steps_per_day` is the pattern period; each frame distributes unit
/// density over the layer occupied at that time of day.
///
/// # Errors
///
/// Returns [`EdnaError::Configuration`] when `steps_per_day` is zero (a
/// pattern needs at least one frame).
pub fn dvm(
    grid: &DepthGrid,
    steps_per_day: usize,
    schedule: &DvmSchedule,
) -> EdnaResult<ForcingPattern> {
    if steps_per_day == 0 {
        return Err(EdnaError::config(
            "migration pattern needs at least one step per day",
        ));
    }

    let cells = grid.cells();
    let dz = grid.dz();
    let z_min = grid.z()[0];
    let z_max = grid.z_max();

    let shallow = schedule.shallow_depth.clamp(z_min, z_max);
    let deep = schedule.deep_depth.clamp(z_min, z_max);
    let layer = schedule.layer_thickness.clamp(1.0, z_max - z_min);

    let mut frames = Vec::with_capacity(steps_per_day);

    for t_idx in 0..steps_per_day {
        // Hour of day for this frame
        let t = t_idx as f64 / (steps_per_day as f64 / 24.0);

        let center_depth = if schedule.descent_start < t && t < schedule.descent_end {
            shallow
                + (deep - shallow) * (t - schedule.descent_start)
                    / (schedule.descent_end - schedule.descent_start)
        } else if schedule.ascent_start < t && t < schedule.ascent_end {
            deep - (deep - shallow) * (t - schedule.ascent_start)
                / (schedule.ascent_end - schedule.ascent_start)
        } else if schedule.ascent_end < schedule.descent_start {
            // Ascend in the morning, descend in the evening
            if t <= schedule.ascent_start || t >= schedule.descent_end {
                deep
            } else {
                shallow
            }
        } else {
            // Reversed schedule: descend first, ascend later
            if t <= schedule.descent_start || t >= schedule.ascent_end {
                shallow
            } else {
                deep
            }
        };

        let center_depth = center_depth.clamp(z_min, z_max);
        let center_idx = ((center_depth / dz) as usize).min(cells - 1);
        let half_layer = (layer / 2.0 / dz) as usize;

        let layer_start = center_idx.saturating_sub(half_layer);
        let layer_end = (center_idx + half_layer).min(cells);

        let mut frame = DVector::zeros(cells);
        if layer_end > layer_start {
            let density = 1.0 / (layer_end - layer_start) as f64;
            for cell in layer_start..layer_end {
                frame[cell] = density;
            }
        } else {
            frame[center_idx] = 1.0;
        }

        frames.push(frame);
    }

    ForcingPattern::new(frames)
}

/// Combine several patterns with weights
///
/// Weights are normalized to sum to 1; an all-zero weight vector falls back
/// to equal weighting.
///
/// # Errors
///
/// Returns [`EdnaError::Configuration`] on empty input or mismatched
/// pattern/weight counts, and [`EdnaError::DimensionMismatch`] when
/// patterns disagree in shape.
pub fn combine(patterns: &[ForcingPattern], weights: &[f64]) -> EdnaResult<ForcingPattern> {
    if patterns.is_empty() {
        return Err(EdnaError::config("cannot combine zero patterns"));
    }
    if patterns.len() != weights.len() {
        return Err(EdnaError::config(format!(
            "{} patterns but {} weights",
            patterns.len(),
            weights.len()
        )));
    }

    let period = patterns[0].period();
    let cells = patterns[0].cells();
    for (i, pattern) in patterns.iter().enumerate() {
        if pattern.period() != period {
            return Err(EdnaError::dimension(
                format!("pattern {} period", i),
                period,
                pattern.period(),
            ));
        }
        if pattern.cells() != cells {
            return Err(EdnaError::dimension(
                format!("pattern {} frame", i),
                cells,
                pattern.cells(),
            ));
        }
    }

    let total: f64 = weights.iter().sum();
    let normalized: Vec<f64> = if total == 0.0 {
        vec![1.0 / weights.len() as f64; weights.len()]
    } else {
        weights.iter().map(|w| w / total).collect()
    };

    let mut frames = vec![DVector::zeros(cells); period];
    for (pattern, weight) in patterns.iter().zip(normalized.iter()) {
        for (combined, frame) in frames.iter_mut().zip(pattern.frames.iter()) {
            *combined += frame * *weight;
        }
    }

    Ok(ForcingPattern { frames })
}

// =================================================================================================
// Tests
// =================================================================================================
