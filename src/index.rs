//! The Argo profile index.
//!
//! The GDAC publishes a listing of every profile file with its date, position and provenance. The
//! index answers "which profiles exist" without touching the measurements, so it is searched by
//! float or by region before any data is fetched. [`IndexFetcher`] is the facade over an
//! [`IndexSource`], mirroring [`DataFetcher`](crate::DataFetcher) for the data itself.

use crate::{
    config::FetcherConfig,
    error::{ArgoError, Result},
    fetcher::{AccessPoint, Region},
    keys::{Direction, Ocean},
    table::{CsvSerializer, Serializer, Table, ToTable},
};
use chrono::NaiveDateTime;
use optional::Optioned;
use std::{fmt, io::Read, path::Path, str::FromStr};
use tracing::info;

const INDEX_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// One entry of the profile index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Path of the profile file relative to the GDAC `dac` directory
    pub file: String,
    /// Time of the profile
    pub date: Option<NaiveDateTime>,
    /// Latitude in degrees north
    pub latitude: Optioned<f64>,
    /// Longitude in degrees east
    pub longitude: Optioned<f64>,
    /// Ocean basin
    pub ocean: Option<Ocean>,
    /// Profiler type code, Argo reference table 8
    pub profiler_type: Optioned<u32>,
    /// Code of the institution in charge of the float
    pub institution: Option<String>,
    /// Time the file was last updated
    pub date_update: Option<NaiveDateTime>,
}

impl IndexRecord {
    /// Create an entry for a profile file with every other value missing.
    pub fn new<S: Into<String>>(file: S) -> Self {
        IndexRecord {
            file: file.into(),
            date: None,
            latitude: optional::none(),
            longitude: optional::none(),
            ocean: None,
            profiler_type: optional::none(),
            institution: None,
            date_update: None,
        }
    }

    /// Builder method for the date of the profile.
    #[inline]
    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Builder method for the position of the profile. NaN is a missing value.
    #[inline]
    pub fn with_lat_lon<T>(mut self, (lat, lon): (T, T)) -> Self
    where
        Optioned<f64>: From<T>,
    {
        self.latitude = Optioned::from(lat);
        self.longitude = Optioned::from(lon);
        self
    }

    /// Builder method for the ocean basin.
    #[inline]
    pub fn with_ocean(mut self, ocean: Ocean) -> Self {
        self.ocean = Some(ocean);
        self
    }

    /// Float WMO id, read from the file name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{Direction, IndexRecord};
    ///
    /// let rec = IndexRecord::new("coriolis/6902746/profiles/BR6902746_012D.nc");
    /// assert_eq!(rec.platform_number(), Some(6902746));
    /// assert_eq!(rec.cycle_number(), Some(12));
    /// assert_eq!(rec.direction(), Some(Direction::Descending));
    ///
    /// assert_eq!(IndexRecord::new("not/a/profile.txt").platform_number(), None);
    /// ```
    pub fn platform_number(&self) -> Option<u32> {
        let (wmo, _) = self.name_parts()?;
        wmo.trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .ok()
    }

    /// Cycle number, read from the file name.
    pub fn cycle_number(&self) -> Option<u32> {
        let (_, cycle) = self.name_parts()?;
        cycle.trim_end_matches('D').parse().ok()
    }

    /// Direction of the profile, descending files carry a `D` after the cycle number.
    pub fn direction(&self) -> Option<Direction> {
        let (_, cycle) = self.name_parts()?;
        if cycle.ends_with('D') {
            Some(Direction::Descending)
        } else {
            Some(Direction::Ascending)
        }
    }

    // "R6902746_012D.nc" -> ("R6902746", "012D")
    fn name_parts(&self) -> Option<(&str, &str)> {
        let name = self.file.rsplit('/').next()?;
        let stem = name.strip_suffix(".nc")?;
        let mut parts = stem.splitn(2, '_');
        Some((parts.next()?, parts.next()?))
    }

    fn from_fields(index: usize, fields: &csv::StringRecord) -> Result<Self> {
        let file = fields
            .get(0)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or(ArgoError::MalformedRecord {
                index,
                field: "file",
            })?;

        let date = |pos: usize, name: &'static str| {
            parse_field(fields, pos, index, name, |s| {
                NaiveDateTime::parse_from_str(s, INDEX_DATE_FORMAT).ok()
            })
        };

        Ok(IndexRecord {
            file: file.to_owned(),
            date: date(1, "date")?,
            latitude: Optioned::from(parse_field::<f64, _>(
                fields,
                2,
                index,
                "latitude",
                from_str,
            )?),
            longitude: Optioned::from(parse_field::<f64, _>(
                fields,
                3,
                index,
                "longitude",
                from_str,
            )?),
            ocean: parse_field(fields, 4, index, "ocean", from_str)?,
            profiler_type: Optioned::from(parse_field::<u32, _>(
                fields,
                5,
                index,
                "profiler_type",
                from_str,
            )?),
            institution: parse_field(fields, 6, index, "institution", |s| Some(s.to_owned()))?,
            date_update: date(7, "date_update")?,
        })
    }
}

fn from_str<T: FromStr>(s: &str) -> Option<T> {
    s.parse().ok()
}

// Empty cells are missing values, unreadable cells are errors.
fn parse_field<T, F>(
    fields: &csv::StringRecord,
    pos: usize,
    index: usize,
    name: &'static str,
    parse: F,
) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<T>,
{
    match fields.get(pos).map(str::trim) {
        None | Some("") => Ok(None),
        Some(cell) => parse(cell)
            .map(Some)
            .ok_or(ArgoError::MalformedRecord { index, field: name }),
    }
}

/// Parse an index in the GDAC `ar_index_global_prof.txt` layout: `#` comment lines, a header line,
/// then one comma separated entry per profile file with dates as `YYYYMMDDHHMMSS`.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{parse_index, Ocean};
///
/// let text = "# Title : Profile directory file of the Argo Global Data Assembly Center\n\
/// file,date,latitude,longitude,ocean,profiler_type,institution,date_update
/// aoml/13857/profiles/R13857_001.nc,19970729200300,0.267,-16.032,A,845,AO,20181011180520
/// aoml/13857/profiles/R13857_002.nc,,,,A,845,AO,20181011180521
/// ";
///
/// let index = parse_index(text.as_bytes()).unwrap();
/// assert_eq!(index.len(), 2);
/// assert_eq!(index[0].platform_number(), Some(13857));
/// assert_eq!(index[0].ocean, Some(Ocean::Atlantic));
/// assert!(index[1].date.is_none());
/// assert!(index[1].latitude.is_none());
/// ```
pub fn parse_index<R: Read>(reader: R) -> Result<Vec<IndexRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .has_headers(true)
        .from_reader(reader);

    rdr.records()
        .enumerate()
        .map(|(index, fields)| -> Result<IndexRecord> {
            IndexRecord::from_fields(index, &fields?)
        })
        .collect()
}

/// A source of profile index entries.
pub trait IndexSource: Send + Sync {
    /// Entries of the profiles of one or more floats.
    fn index_floats(&self, wmos: &[u32]) -> Result<Vec<IndexRecord>>;

    /// Entries of the profiles inside a region. Pressure bounds do not apply to the index.
    fn index_region(&self, region: &Region) -> Result<Vec<IndexRecord>>;
}

/// An index source answering from entries held in memory, for instance parsed from a local copy
/// of the GDAC index with [`parse_index`].
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    records: Vec<IndexRecord>,
}

impl MemoryIndex {
    /// Create an index source serving `records`.
    #[inline]
    pub fn new(records: Vec<IndexRecord>) -> Self {
        MemoryIndex { records }
    }

    /// Read and parse an index file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(MemoryIndex::new(parse_index(file)?))
    }

    fn select<F>(&self, pred: F) -> Vec<IndexRecord>
    where
        F: Fn(&IndexRecord) -> bool,
    {
        self.records.iter().filter(|&r| pred(r)).cloned().collect()
    }
}

impl IndexSource for MemoryIndex {
    fn index_floats(&self, wmos: &[u32]) -> Result<Vec<IndexRecord>> {
        Ok(self.select(|r| r.platform_number().map_or(false, |w| wmos.contains(&w))))
    }

    fn index_region(&self, region: &Region) -> Result<Vec<IndexRecord>> {
        Ok(self.select(|r| {
            region.contains_location(r.latitude.into_option(), r.longitude.into_option(), r.date)
        }))
    }
}

/// Facade for searching the profile index by float or region.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{FetcherConfig, IndexFetcher, IndexRecord, MemoryIndex};
///
/// let source = MemoryIndex::new(vec![
///     IndexRecord::new("coriolis/6902746/profiles/R6902746_001.nc"),
///     IndexRecord::new("coriolis/6902746/profiles/R6902746_002.nc"),
///     IndexRecord::new("coriolis/6902747/profiles/R6902747_001.nc"),
/// ]);
///
/// let idx = IndexFetcher::new(FetcherConfig::default(), Box::new(source)).unwrap();
/// assert!(idx.to_index().is_err());
///
/// let idx = idx.float(&[6902746]).unwrap();
/// assert_eq!(idx.to_index().unwrap().len(), 2);
/// ```
pub struct IndexFetcher {
    config: FetcherConfig,
    source: Box<dyn IndexSource>,
    access_point: Option<AccessPoint>,
}

impl fmt::Debug for IndexFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexFetcher")
            .field("config", &self.config)
            .field("access_point", &self.access_point)
            .finish()
    }
}

impl IndexFetcher {
    /// Create a facade over `source`. Fails if the configuration does not validate.
    pub fn new(config: FetcherConfig, source: Box<dyn IndexSource>) -> Result<Self> {
        config.validate()?;

        Ok(IndexFetcher {
            config,
            source,
            access_point: None,
        })
    }

    /// The configuration of this fetcher.
    #[inline]
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// The currently selected access point, `Float` or `Region`.
    #[inline]
    pub fn access_point(&self) -> Option<&AccessPoint> {
        self.access_point.as_ref()
    }

    /// Select the index entries of one or more floats.
    pub fn float(mut self, wmos: &[u32]) -> Result<Self> {
        if wmos.is_empty() {
            return Err(ArgoError::InvalidAccessPoint(
                "'float' needs at least one WMO".to_owned(),
            ));
        }

        self.access_point = Some(AccessPoint::Float(wmos.to_vec()));
        Ok(self)
    }

    /// Select the index entries inside a region.
    #[inline]
    pub fn region(mut self, region: Region) -> Self {
        self.access_point = Some(AccessPoint::Region(region));
        self
    }

    /// Fetch the index entries of the current selection.
    pub fn to_index(&self) -> Result<Vec<IndexRecord>> {
        let ap = self.access_point.as_ref().ok_or(ArgoError::NoAccessPoint)?;

        let records = match ap {
            AccessPoint::Float(wmos) => self.source.index_floats(wmos)?,
            AccessPoint::Region(region) => self.source.index_region(region)?,
            AccessPoint::Profile(..) => {
                return Err(ArgoError::InvalidAccessPoint(
                    "the index is searched by 'float' or 'region'".to_owned(),
                ))
            }
        };

        info!(access_point = %ap, n_records = records.len(), "fetched index");

        Ok(records)
    }

    /// Fetch the current selection as a table with one row per index entry.
    pub fn to_table(&self) -> Result<Table> {
        Ok(self.to_index()?.as_slice().to_table())
    }

    /// Fetch the current selection and write it to a CSV file at `path`.
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        CsvSerializer::new().persist(&self.to_table()?, path)
    }
}
