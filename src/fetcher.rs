//! Fetching point records from a data source.
//!
//! A [`Fetcher`] is anything that can answer the three Argo access points: all data from some
//! floats, some profiles of a single float, or all data inside a space/time region. The
//! [`DataFetcher`] facade pairs a fetcher with a [`FetcherConfig`], applies the post processing for
//! the configured user mode, and hands the records to the shape converter.

use crate::{
    config::{DataSource, Dataset, FetcherConfig, UserMode},
    convert::points_to_profiles,
    erddap::ErddapQuery,
    error::{ArgoError, Result},
    keys::QcFlag,
    point::PointRecord,
    profiles::ProfileCollection,
    table::{Table, ToTable},
};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use std::fmt;
use tracing::info;

/// A source of point records.
///
/// Implementations return `ArgoError::SourceUnavailable` when the upstream source fails. Callers
/// treat that as terminal, nothing in this crate retries.
pub trait Fetcher: Send + Sync {
    /// All records inside a space/time region.
    fn fetch_region(&self, region: &Region) -> Result<Vec<PointRecord>>;

    /// All records of one or more floats.
    fn fetch_floats(&self, wmos: &[u32]) -> Result<Vec<PointRecord>>;

    /// The records of some cycles of a single float.
    fn fetch_profiles(&self, wmo: u32, cycles: &[u32]) -> Result<Vec<PointRecord>>;
}

/// A rectangular space/time domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    lon: (f64, f64),
    lat: (f64, f64),
    pres: (f64, f64),
    time: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Region {
    /// Create a region from `(min, max)` pairs of longitude, latitude and pressure (decibars).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::Region;
    ///
    /// assert!(Region::new((-85.0, -45.0), (10.0, 20.0), (0.0, 1000.0)).is_ok());
    ///
    /// // min and max swapped
    /// assert!(Region::new((-45.0, -85.0), (10.0, 20.0), (0.0, 1000.0)).is_err());
    /// // latitude out of range
    /// assert!(Region::new((-85.0, -45.0), (10.0, 95.0), (0.0, 1000.0)).is_err());
    /// ```
    pub fn new(lon: (f64, f64), lat: (f64, f64), pres: (f64, f64)) -> Result<Self> {
        check_bounds("longitude", lon, -180.0, 180.0)?;
        check_bounds("latitude", lat, -90.0, 90.0)?;
        check_bounds("pressure", pres, 0.0, std::f64::INFINITY)?;

        Ok(Region {
            lon,
            lat,
            pres,
            time: None,
        })
    }

    /// Create a region from a box `[lon_min, lon_max, lat_min, lat_max, pres_min, pres_max]` and
    /// an optional `(start, end)` date pair, the two last entries of an 8 element Argo box. Dates
    /// are `YYYY-MM-DD` or `YYYY-MM`, the latter meaning the first day of the month.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::Region;
    ///
    /// let bx = [-85.0, -45.0, 10.0, 20.0, 0.0, 1000.0];
    /// let region = Region::from_box(bx, Some(("2012-01", "2014-12"))).unwrap();
    /// assert!(region.time_bounds().is_some());
    ///
    /// assert!(Region::from_box(bx, Some(("2014-12", "2012-01"))).is_err());
    /// assert!(Region::from_box(bx, Some(("2012-13", "2014-12"))).is_err());
    /// ```
    pub fn from_box(bx: [f64; 6], dates: Option<(&str, &str)>) -> Result<Self> {
        let region = Region::new((bx[0], bx[1]), (bx[2], bx[3]), (bx[4], bx[5]))?;

        match dates {
            Some((start, end)) => region.with_time_bounds(parse_date(start)?, parse_date(end)?),
            None => Ok(region),
        }
    }

    /// Builder method to restrict the region in time, both bounds included.
    pub fn with_time_bounds(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ArgoError::InvalidRegion(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        self.time = Some((start, end));
        Ok(self)
    }

    /// Longitude bounds in degrees east.
    #[inline]
    pub fn lon_bounds(&self) -> (f64, f64) {
        self.lon
    }

    /// Latitude bounds in degrees north.
    #[inline]
    pub fn lat_bounds(&self) -> (f64, f64) {
        self.lat
    }

    /// Pressure bounds in decibars.
    #[inline]
    pub fn pres_bounds(&self) -> (f64, f64) {
        self.pres
    }

    /// Time bounds, if the region is restricted in time.
    #[inline]
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.time
    }

    /// True if the record lies in the region. Records missing a value needed for the test are
    /// outside.
    pub fn contains(&self, rec: &PointRecord) -> bool {
        self.contains_location(rec.latitude.into_option(), rec.longitude.into_option(), rec.time)
            && inside(rec.pressure.into_option(), self.pres)
    }

    /// True if a position and time lie in the horizontal and time bounds of the region, ignoring
    /// pressure. Missing values are outside, except a missing time when the region has no time
    /// bounds.
    pub fn contains_location(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        time: Option<NaiveDateTime>,
    ) -> bool {
        let in_time = match self.time {
            None => true,
            Some((start, end)) => time.map_or(false, |t| t >= start && t <= end),
        };

        in_time && inside(lon, self.lon) && inside(lat, self.lat)
    }
}

fn inside(val: Option<f64>, (min, max): (f64, f64)) -> bool {
    val.map_or(false, |v| v >= min && v <= max)
}

fn check_bounds(name: &str, (min, max): (f64, f64), lower: f64, upper: f64) -> Result<()> {
    if min.is_nan() || max.is_nan() {
        return Err(ArgoError::InvalidRegion(format!("{} bounds are not numbers", name)));
    }

    if min > max {
        return Err(ArgoError::InvalidRegion(format!(
            "{} min {} is greater than max {}",
            name, min, max
        )));
    }

    if min < lower || max > upper {
        return Err(ArgoError::InvalidRegion(format!(
            "{} bounds must be within [{}, {}]",
            name, lower, upper
        )));
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ArgoError::InvalidRegion(format!("cannot parse date '{}'", s)))
}

/// The selection a data request is made for.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPoint {
    /// All data from one or more floats.
    Float(Vec<u32>),
    /// Some cycles of a single float.
    Profile(u32, Vec<u32>),
    /// Everything inside a region.
    Region(Region),
}

impl AccessPoint {
    /// Ask `fetcher` for the records of this access point.
    pub fn fetch(&self, fetcher: &dyn Fetcher) -> Result<Vec<PointRecord>> {
        match self {
            AccessPoint::Float(wmos) => fetcher.fetch_floats(wmos),
            AccessPoint::Profile(wmo, cycles) => fetcher.fetch_profiles(*wmo, cycles),
            AccessPoint::Region(region) => fetcher.fetch_region(region),
        }
    }
}

impl fmt::Display for AccessPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPoint::Float(wmos) => write!(f, "float {}", wmos.iter().join(",")),
            AccessPoint::Profile(wmo, cycles) => {
                write!(f, "profile {} cycles {}", wmo, cycles.iter().join(","))
            }
            AccessPoint::Region(r) => write!(
                f,
                "region lon {:?} lat {:?} pres {:?}",
                r.lon, r.lat, r.pres
            ),
        }
    }
}

/// A fetcher answering requests from records held in memory.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{Fetcher, MemoryFetcher, PointRecord};
///
/// let fetcher = MemoryFetcher::new(vec![
///     PointRecord::new(6902746, 1).with_pressure(5.0),
///     PointRecord::new(6902746, 2).with_pressure(5.0),
///     PointRecord::new(6902747, 1).with_pressure(5.0),
/// ]);
///
/// assert_eq!(fetcher.fetch_floats(&[6902746]).unwrap().len(), 2);
/// assert_eq!(fetcher.fetch_profiles(6902746, &[2]).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    records: Vec<PointRecord>,
}

impl MemoryFetcher {
    /// Create a fetcher serving `records`.
    #[inline]
    pub fn new(records: Vec<PointRecord>) -> Self {
        MemoryFetcher { records }
    }

    fn select<F>(&self, pred: F) -> Vec<PointRecord>
    where
        F: Fn(&PointRecord) -> bool,
    {
        self.records.iter().filter(|&r| pred(r)).copied().collect()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_region(&self, region: &Region) -> Result<Vec<PointRecord>> {
        Ok(self.select(|r| region.contains(r)))
    }

    fn fetch_floats(&self, wmos: &[u32]) -> Result<Vec<PointRecord>> {
        Ok(self.select(|r| {
            r.platform_number
                .into_option()
                .map_or(false, |w| wmos.contains(&w))
        }))
    }

    fn fetch_profiles(&self, wmo: u32, cycles: &[u32]) -> Result<Vec<PointRecord>> {
        Ok(self.select(|r| {
            r.platform_number.into_option() == Some(wmo)
                && r.cycle_number
                    .into_option()
                    .map_or(false, |c| cycles.contains(&c))
        }))
    }
}

/// Facade for fetching and shaping Argo data.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{DataFetcher, FetcherConfig, MemoryFetcher, PointRecord, UserMode};
///
/// let source = MemoryFetcher::new(vec![
///     PointRecord::new(6902755, 3).with_pressure(5.0),
///     PointRecord::new(6902755, 3).with_pressure(10.0),
///     PointRecord::new(6902755, 12).with_pressure(5.0),
/// ]);
///
/// let config = FetcherConfig::default().with_mode(UserMode::Expert);
/// let fetcher = DataFetcher::new(config, Box::new(source)).unwrap();
///
/// // Nothing selected yet.
/// assert!(fetcher.to_points().is_err());
///
/// let profiles = fetcher.float(&[6902755]).unwrap().to_profiles().unwrap();
/// assert_eq!(profiles.shape(), (2, 2));
/// ```
pub struct DataFetcher {
    config: FetcherConfig,
    source: Box<dyn Fetcher>,
    access_point: Option<AccessPoint>,
}

impl fmt::Debug for DataFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFetcher")
            .field("config", &self.config)
            .field("access_point", &self.access_point)
            .finish()
    }
}

impl DataFetcher {
    /// Create a facade over `source`. Fails if the configuration does not validate.
    pub fn new(config: FetcherConfig, source: Box<dyn Fetcher>) -> Result<Self> {
        config.validate()?;

        Ok(DataFetcher {
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

    /// The currently selected access point.
    #[inline]
    pub fn access_point(&self) -> Option<&AccessPoint> {
        self.access_point.as_ref()
    }

    /// Select all data from one or more floats.
    pub fn float(mut self, wmos: &[u32]) -> Result<Self> {
        if wmos.is_empty() {
            return Err(ArgoError::InvalidAccessPoint(
                "'float' needs at least one WMO".to_owned(),
            ));
        }

        self.access_point = Some(AccessPoint::Float(wmos.to_vec()));
        Ok(self)
    }

    /// Select some cycles of a single float.
    pub fn profile(mut self, wmo: u32, cycles: &[u32]) -> Result<Self> {
        if cycles.is_empty() {
            return Err(ArgoError::InvalidAccessPoint(
                "'profile' needs at least one cycle number".to_owned(),
            ));
        }

        self.access_point = Some(AccessPoint::Profile(wmo, cycles.to_vec()));
        Ok(self)
    }

    /// Select all data inside a space/time region.
    #[inline]
    pub fn region(mut self, region: Region) -> Self {
        self.access_point = Some(AccessPoint::Region(region));
        self
    }

    /// The ERDDAP request for the current selection. Fails if the source is not ERDDAP or nothing
    /// is selected.
    pub fn request_url(&self) -> Result<String> {
        if self.config.source != DataSource::Erddap {
            return Err(ArgoError::InvalidOption {
                option: "source",
                value: self.config.source.to_string(),
            });
        }

        let ap = self.access_point.as_ref().ok_or(ArgoError::NoAccessPoint)?;
        ErddapQuery::new(&self.config.erddap_server, self.config.dataset).url(ap)
    }

    /// True if caching is on and a response to the current selection is already on disk.
    pub fn is_cached(&self) -> bool {
        self.request_url()
            .map_or(false, |url| self.config.is_cached(&url))
    }

    /// Fetch the records of the current selection, post processed for the user mode.
    pub fn to_points(&self) -> Result<Vec<PointRecord>> {
        let ap = self.access_point.as_ref().ok_or(ArgoError::NoAccessPoint)?;

        let raw = ap.fetch(self.source.as_ref())?;
        let n_raw = raw.len();
        let records = self.post_process(raw);

        info!(
            access_point = %ap,
            source = %self.config.source,
            n_raw,
            n_records = records.len(),
            "fetched"
        );

        Ok(records)
    }

    /// Fetch the current selection and reshape it into profiles.
    pub fn to_profiles(&self) -> Result<ProfileCollection> {
        points_to_profiles(&self.to_points()?)
    }

    /// Fetch the current selection as a table with one row per record.
    pub fn to_table(&self) -> Result<Table> {
        Ok(self.to_points()?.as_slice().to_table())
    }

    fn post_process(&self, records: Vec<PointRecord>) -> Vec<PointRecord> {
        if self.config.mode == UserMode::Expert || self.config.dataset == Dataset::Ref {
            return records;
        }

        filter_standard(records)
    }
}

/// Standard mode filtering: keep records with a known data mode and good QC, then drop the QC
/// and data mode values.
///
/// Level QC flags must be present and good. Position and time QC flags must be good when present.
pub fn filter_standard(records: Vec<PointRecord>) -> Vec<PointRecord> {
    let good = |flag: Option<QcFlag>| flag.map_or(false, QcFlag::is_good);
    let good_or_missing = |flag: Option<QcFlag>| flag.map_or(true, QcFlag::is_good);

    records
        .into_iter()
        .filter(|r| r.data_mode.is_some())
        .filter(|r| good(r.pres_qc) && good(r.temp_qc) && good(r.psal_qc))
        .filter(|r| good_or_missing(r.position_qc) && good_or_missing(r.time_qc))
        .map(|r| PointRecord {
            data_mode: None,
            position_qc: None,
            time_qc: None,
            pres_qc: None,
            temp_qc: None,
            psal_qc: None,
            ..r
        })
        .collect()
}
