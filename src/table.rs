//! Tabular export of point and profile collections.
//!
//! Both shapes can be flattened into a [`Table`] of text cells, one column per variable, and a
//! [`Serializer`] writes tables to disk. Missing values are empty cells.

use crate::{
    error::Result,
    index::IndexRecord,
    point::{PointCollection, PointRecord},
    profiles::{ProfileCollection, LEVEL_DIM, PROFILE_DIM},
};
use chrono::NaiveDateTime;
use metfor::Quantity;
use optional::Optioned;
use std::{fmt::Display, fs::File, io::Write, path::Path};

/// Column names of a point record table.
pub const POINT_COLUMNS: &[&str] = &[
    "platform_number",
    "cycle_number",
    "direction",
    "data_mode",
    "time",
    "time_qc",
    "latitude",
    "longitude",
    "position_qc",
    "pres",
    "pres_qc",
    "temp",
    "temp_qc",
    "psal",
    "psal_qc",
];

/// Column names of a profile index table.
pub const INDEX_COLUMNS: &[&str] = &[
    "file",
    "date",
    "latitude",
    "longitude",
    "ocean",
    "profiler_type",
    "institution",
    "date_update",
];

/// A table of text cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given column names and no rows.
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.as_ref().to_owned()).collect(),
            rows: vec![],
        }
    }

    /// Add a row. Short rows are filled with empty cells, long rows are truncated.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    #[inline]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Get a cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}

/// Types that can be flattened into a table.
pub trait ToTable {
    /// Flatten into a table.
    fn to_table(&self) -> Table;
}

impl ToTable for [PointRecord] {
    /// One row per record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{PointRecord, ToTable};
    ///
    /// let recs = vec![PointRecord::new(6902755, 3).with_pressure(5.0)];
    /// let table = recs.as_slice().to_table();
    ///
    /// assert_eq!(table.n_rows(), 1);
    /// assert_eq!(table.cell(0, "pres"), Some("5"));
    /// assert_eq!(table.cell(0, "temp"), Some(""));
    /// ```
    fn to_table(&self) -> Table {
        let mut table = Table::new(POINT_COLUMNS);
        for rec in self {
            table.push_row(point_cells(rec));
        }
        table
    }
}

impl ToTable for PointCollection {
    fn to_table(&self) -> Table {
        self.records().to_table()
    }
}

impl ToTable for ProfileCollection {
    /// One row per `(profile, level)` slot, padding included. The first two columns hold the
    /// profile and level indexes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{points_to_profiles, PointRecord, ToTable};
    ///
    /// let col = points_to_profiles(&[
    ///     PointRecord::new(6902755, 3).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(10.0),
    /// ]).unwrap();
    ///
    /// let table = col.to_table();
    /// assert_eq!(table.n_rows(), 4);
    /// assert_eq!(table.cell(1, "N_LEVELS"), Some("1"));
    /// assert_eq!(table.cell(1, "pres"), Some("")); // padding
    /// assert_eq!(table.cell(1, "platform_number"), Some("6902755"));
    /// ```
    fn to_table(&self) -> Table {
        let mut columns = vec![PROFILE_DIM, LEVEL_DIM];
        columns.extend_from_slice(POINT_COLUMNS);
        let mut table = Table::new(&columns);

        for (profile, header) in self.headers().iter().enumerate() {
            for level in 0..self.max_levels() {
                let rec = self
                    .point(profile, level)
                    .unwrap_or_else(|| PointRecord::from_header(header));

                let mut row = vec![profile.to_string(), level.to_string()];
                row.extend(point_cells(&rec));
                table.push_row(row);
            }
        }

        table
    }
}

impl ToTable for [IndexRecord] {
    /// One row per index entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{IndexRecord, Ocean, ToTable};
    ///
    /// let recs = vec![
    ///     IndexRecord::new("coriolis/6902746/profiles/R6902746_001.nc")
    ///         .with_lat_lon((15.2, -60.1))
    ///         .with_ocean(Ocean::Atlantic),
    /// ];
    /// let table = recs.as_slice().to_table();
    ///
    /// assert_eq!(table.cell(0, "ocean"), Some("A"));
    /// assert_eq!(table.cell(0, "latitude"), Some("15.2"));
    /// assert_eq!(table.cell(0, "date"), Some(""));
    /// ```
    fn to_table(&self) -> Table {
        let mut table = Table::new(INDEX_COLUMNS);
        for rec in self {
            table.push_row(vec![
                rec.file.clone(),
                time_cell(rec.date),
                opt_cell(rec.latitude.into_option()),
                opt_cell(rec.longitude.into_option()),
                opt_cell(rec.ocean),
                opt_cell(rec.profiler_type.into_option()),
                rec.institution.clone().unwrap_or_default(),
                time_cell(rec.date_update),
            ]);
        }
        table
    }
}

fn point_cells(rec: &PointRecord) -> Vec<String> {
    vec![
        opt_cell(rec.platform_number.into_option()),
        opt_cell(rec.cycle_number.into_option()),
        opt_cell(rec.direction),
        opt_cell(rec.data_mode),
        time_cell(rec.time),
        opt_cell(rec.time_qc),
        opt_cell(rec.latitude.into_option()),
        opt_cell(rec.longitude.into_option()),
        opt_cell(rec.position_qc),
        opt_cell(rec.pressure.into_option()),
        opt_cell(rec.pres_qc),
        opt_cell(unpack(rec.temperature)),
        opt_cell(rec.temp_qc),
        opt_cell(rec.salinity.into_option()),
        opt_cell(rec.psal_qc),
    ]
}

fn time_cell(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

fn opt_cell<T: Display>(val: Option<T>) -> String {
    val.map(|v| v.to_string()).unwrap_or_default()
}

fn unpack<T>(val: Optioned<T>) -> Option<f64>
where
    T: optional::Noned + Quantity + Copy,
{
    val.into_option().map(|v| v.unpack())
}

/// Writes tables to files.
pub trait Serializer {
    /// Write `table` to `writer`.
    fn write<W: Write>(&self, table: &Table, writer: W) -> Result<()>;

    /// Write `table` to a file at `path`, replacing any existing file.
    fn persist(&self, table: &Table, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write(table, file)
    }
}

/// Comma separated values with a header line.
#[derive(Debug, Clone, Copy)]
pub struct CsvSerializer {
    delimiter: u8,
}

impl Default for CsvSerializer {
    fn default() -> Self {
        CsvSerializer { delimiter: b',' }
    }
}

impl CsvSerializer {
    /// Create a comma separated serializer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the field delimiter.
    #[inline]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Serializer for CsvSerializer {
    fn write<W: Write>(&self, table: &Table, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(table.columns())?;
        for row in table.rows() {
            wtr.write_record(row)?;
        }
        wtr.flush()?;

        Ok(())
    }
}
