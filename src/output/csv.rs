//! CSV export for simulation results
//!
//! Writes depth profiles and time series to CSV (Comma-Separated Values)
//! files readable by Excel, Python pandas, MATLAB, and most analysis tools.
//!
//! # Features
//!
//! - **Depth profiles**: Both size fractions against depth, one row per cell
//! - **Time series**: Concentrations at a chosen depth cell over a full run
//! - **Metadata support**: Optional header comments with simulation parameters
//! - **Customizable**: Delimiter, precision, format options
//! - **Validation**: Checks for NaN, empty data, mismatched dimensions
//!
//! # Quick Examples
//!
//! ## Depth Profile
//!
//! ```rust,ignore
//! use edna_rs::output::export_depth_profile_csv;
//!
//! let field = trace.final_field();
//! export_depth_profile_csv(&grid, field, "profile.csv", None)?;
//! ```
//!
//! **Output** (`profile.csv`):
//! ```csv
//! Depth (m),Large fraction (copies/L),Small fraction (copies/L)
//! 0.000000,12.400000,3.100000
//! 2.000000,11.900000,3.400000
//! ...
//! ```
//!
//! ## Time Series with Metadata
//!
//! ```rust,ignore
//! use edna_rs::output::{export_time_series_csv, CsvConfig, CsvMetadata};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_trace(&trace));
//! export_time_series_csv(&trace, 10, "surface.csv", Some(&config))?;
//! ```
//!
//! **Output** (`surface.csv`):
//! ```csv
//! # eDNA Transport Simulation Data
//! # Generated: 2026-08-29T15:30:00Z
//! # Solver: Forward Euler
//! # Time Steps: 144
//! #
//! Time (s),Large fraction (copies/L),Small fraction (copies/L)
//! 600.0,0.0,0.0
//! 1200.0,0.5,0.1
//! ...
//! ```

use std::fs::File;
use std::io::Write;

use crate::error::{EdnaError, EdnaResult};
use crate::grid::DepthGrid;
use crate::physics::ConcentrationField;
use crate::solver::SimulationTrace;

// =================================================================================================
// Configuration Structures
// =================================================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust,ignore
/// let config = CsvConfig {
///     delimiter: ';',        // European CSV
///     precision: 10,         // High precision
///     include_metadata: true,
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in the header
    pub metadata: Option<CsvMetadata>,

    /// Header for the leading column of a time series (default: "Time (s)")
    pub time_header: String,

    /// Header for the leading column of a depth profile (default: "Depth (m)")
    pub depth_header: String,

    /// Headers for the two concentration columns
    pub fraction_headers: [String; 2],
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time (s)".to_string(),
            depth_header: "Depth (m)".to_string(),
            fraction_headers: [
                "Large fraction (copies/L)".to_string(),
                "Small fraction (copies/L)".to_string(),
            ],
        }
    }
}

impl CsvConfig {
    /// Config with European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Config with high precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional. Only non-None fields are written to the header.
#[derive(Clone, Default)]
pub struct CsvMetadata {
    /// Model name (e.g., "Two-fraction transport-reaction")
    pub model_name: Option<String>,

    /// Solver name (e.g., "Forward Euler", "Runge-Kutta 4")
    pub solver_name: Option<String>,

    /// Total simulation time (seconds)
    pub total_time: Option<f64>,

    /// Number of time steps
    pub time_steps: Option<usize>,

    /// Time step dt (seconds)
    pub dt: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Build metadata from the diagnostic entries a solver stores on its trace
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let trace = EulerSolver::new().solve(&scenario, &config)?;
    /// let metadata = CsvMetadata::from_trace(&trace);
    /// ```
    pub fn from_trace(trace: &SimulationTrace) -> Self {
        Self {
            model_name: None,
            solver_name: trace.get_metadata("solver").map(str::to_string),
            total_time: trace.get_metadata("total time").and_then(|v| v.parse().ok()),
            time_steps: trace.get_metadata("time steps").and_then(|v| v.parse().ok()),
            dt: Some(trace.dt()),
            custom: Vec::new(),
        }
    }

    /// Add a custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Write metadata header comments to the file
fn write_metadata_header(file: &mut File, metadata: &CsvMetadata) -> EdnaResult<()> {
    writeln!(file, "# eDNA Transport Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(file, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(file, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(file, "# Solver: {}", solver)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(file, "# Total Time: {} s", total_time)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(file, "# Time Steps: {}", time_steps)?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(file, "# dt: {} s", dt)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(file, "# {}: {}", key, value)?;
    }

    // Separator between comments and the column header
    writeln!(file, "#")?;

    Ok(())
}

/// Format a number with the configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =================================================================================================
// Export Functions
// =================================================================================================

/// Export a depth profile of both size fractions to CSV
///
/// Writes one row per depth cell: depth, large fraction, small fraction.
///
/// # Arguments
///
/// * `grid` - Depth grid the field is discretized on
/// * `field` - Concentration field to export
/// * `output_path` - Output file path
/// * `configuration` - Optional CSV configuration (uses default if None)
///
/// # Errors
///
/// - Field and grid dimensions disagree
/// - NaN or Inf values in the field
/// - File creation or write errors
pub fn export_depth_profile_csv(
    grid: &DepthGrid,
    field: &ConcentrationField,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> EdnaResult<()> {
    // ============================= Validation =============================

    if field.points() != grid.cells() {
        return Err(EdnaError::dimension(
            "concentration field",
            grid.cells(),
            field.points(),
        ));
    }

    if field.has_non_finite() {
        return Err(EdnaError::config(
            "invalid data: NaN or Inf detected in the concentration field",
        ));
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Open File ==============================

    let mut file = File::create(output_path)?;

    // ============================= Write Metadata =========================

    if configuration.include_metadata {
        if let Some(metadata) = &configuration.metadata {
            write_metadata_header(&mut file, metadata)?;
        }
    }

    // ============================= Write Header ===========================

    writeln!(
        file,
        "{}{}{}{}{}",
        configuration.depth_header,
        configuration.delimiter,
        configuration.fraction_headers[0],
        configuration.delimiter,
        configuration.fraction_headers[1],
    )?;

    // ============================= Write Data =============================

    let large = field.large();
    let small = field.small();

    for cell in 0..grid.cells() {
        writeln!(
            file,
            "{}{}{}{}{}",
            format_number(grid.z()[cell], configuration),
            configuration.delimiter,
            format_number(large[cell], configuration),
            configuration.delimiter,
            format_number(small[cell], configuration),
        )?;
    }

    Ok(())
}

/// Export a time series at one depth cell to CSV
///
/// Writes one row per stored step: time, large fraction, small fraction,
/// all at the given depth cell.
///
/// # Arguments
///
/// * `trace` - Simulation trace to export from
/// * `cell` - Depth cell index to sample
/// * `output_path` - Output file path
/// * `configuration` - Optional CSV configuration
///
/// # Errors
///
/// - Empty trace
/// - Cell index outside the grid
/// - NaN or Inf values in the trace
/// - File creation or write errors
pub fn export_time_series_csv(
    trace: &SimulationTrace,
    cell: usize,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> EdnaResult<()> {
    // ============================= Validation =============================

    if trace.is_empty() {
        return Err(EdnaError::config("empty trace: nothing to export"));
    }

    let nz = trace.at(0).points();
    if cell >= nz {
        return Err(EdnaError::config(format!(
            "depth cell {} is outside the grid ({} cells)",
            cell, nz
        )));
    }

    for i in 0..trace.len() {
        if trace.at(i).has_non_finite() {
            return Err(EdnaError::config(format!(
                "invalid data: NaN or Inf detected at step {}",
                i + 1
            )));
        }
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Open File ==============================

    let mut file = File::create(output_path)?;

    // ============================= Write Metadata =========================

    if configuration.include_metadata {
        if let Some(metadata) = &configuration.metadata {
            write_metadata_header(&mut file, metadata)?;
        }
    }

    // ============================= Write Header ===========================

    writeln!(
        file,
        "{}{}{}{}{}",
        configuration.time_header,
        configuration.delimiter,
        configuration.fraction_headers[0],
        configuration.delimiter,
        configuration.fraction_headers[1],
    )?;

    // ============================= Write Data =============================

    let times = trace.times();

    for (i, time) in times.iter().enumerate() {
        let field = trace.at(i);
        writeln!(
            file,
            "{}{}{}{}{}",
            format_number(*time, configuration),
            configuration.delimiter,
            format_number(field.large()[cell], configuration),
            configuration.delimiter,
            format_number(field.small()[cell], configuration),
        )?;
    }

    Ok(())
}

/// Export depth-integrated totals over time to CSV
///
/// Writes one row per stored step: time, total large-fraction mass and
/// total small-fraction mass, each integrated over depth (sum · dz).
///
/// # Errors
///
/// - Empty trace
/// - NaN or Inf values in the trace
/// - File creation or write errors
pub fn export_totals_csv(
    trace: &SimulationTrace,
    grid: &DepthGrid,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> EdnaResult<()> {
    // ============================= Validation =============================

    if trace.is_empty() {
        return Err(EdnaError::config("empty trace: nothing to export"));
    }

    if trace.at(0).points() != grid.cells() {
        return Err(EdnaError::dimension(
            "simulation trace",
            grid.cells(),
            trace.at(0).points(),
        ));
    }

    for i in 0..trace.len() {
        if trace.at(i).has_non_finite() {
            return Err(EdnaError::config(format!(
                "invalid data: NaN or Inf detected at step {}",
                i + 1
            )));
        }
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Open File ==============================

    let mut file = File::create(output_path)?;

    if configuration.include_metadata {
        if let Some(metadata) = &configuration.metadata {
            write_metadata_header(&mut file, metadata)?;
        }
    }

    // ============================= Write Header ===========================

    writeln!(
        file,
        "{}{}Large total (copies/m^2){}Small total (copies/m^2)",
        configuration.time_header, configuration.delimiter, configuration.delimiter,
    )?;

    // ============================= Write Data =============================

    let times = trace.times();

    for (i, time) in times.iter().enumerate() {
        let field = trace.at(i);
        writeln!(
            file,
            "{}{}{}{}{}",
            format_number(*time, configuration),
            configuration.delimiter,
            format_number(field.total_large() * grid.dz(), configuration),
            configuration.delimiter,
            format_number(field.total_small() * grid.dz(), configuration),
        )?;
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
