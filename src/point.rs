//! Data types for the flat, one row per measurement, shape of Argo data.

use crate::{
    error::{ArgoError, Result},
    keys::{DataMode, Direction, QcFlag},
    profiles::{ProfileCollection, ProfileHeader},
};
use chrono::NaiveDateTime;
use metfor::Celsius;
use optional::Optioned;

/// One measurement of a float at a single vertical level of a single profile.
///
/// The header values (everything up to `time_qc`) are shared by every point of a profile, while
/// the level values differ from point to point.
#[derive(Clone, Default, Copy, Debug, PartialEq)]
pub struct PointRecord {
    /// Float WMO id
    pub platform_number: Optioned<u32>,
    /// Cycle number of the float
    pub cycle_number: Optioned<u32>,
    /// Ascending or descending profile
    pub direction: Option<Direction>,
    /// Real time, adjusted or delayed mode
    pub data_mode: Option<DataMode>,
    /// Time of the profile
    pub time: Option<NaiveDateTime>,
    /// Latitude in degrees north
    pub latitude: Optioned<f64>,
    /// Longitude in degrees east
    pub longitude: Optioned<f64>,
    /// QC flag of the position
    pub position_qc: Option<QcFlag>,
    /// QC flag of the time
    pub time_qc: Option<QcFlag>,
    /// Sea water pressure in decibars
    pub pressure: Optioned<f64>,
    /// In situ sea water temperature
    pub temperature: Optioned<Celsius>,
    /// Practical salinity in PSU
    pub salinity: Optioned<f64>,
    /// QC flag of the pressure
    pub pres_qc: Option<QcFlag>,
    /// QC flag of the temperature
    pub temp_qc: Option<QcFlag>,
    /// QC flag of the salinity
    pub psal_qc: Option<QcFlag>,
}

impl PointRecord {
    /// Create a record with the identifying fields set and everything else missing. An id equal
    /// to `u32::MAX` is stored as missing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::PointRecord;
    ///
    /// let rec = PointRecord::new(6902755, 3).with_pressure(10.0);
    /// assert_eq!(rec.platform_number.unwrap(), 6902755);
    /// assert_eq!(rec.cycle_number.unwrap(), 3);
    /// assert_eq!(rec.pressure.unwrap(), 10.0);
    /// assert!(rec.temperature.is_none());
    /// ```
    #[inline]
    pub fn new(platform_number: u32, cycle_number: u32) -> Self {
        PointRecord {
            platform_number: Optioned::from(platform_number),
            cycle_number: Optioned::from(cycle_number),
            ..PointRecord::default()
        }
    }

    /// Builder method for the pressure in decibars.
    #[inline]
    pub fn with_pressure<T>(mut self, pressure: T) -> Self
    where
        Optioned<f64>: From<T>,
    {
        self.pressure = Optioned::from(pressure);
        self
    }

    /// Builder method for the temperature.
    ///
    /// # Examples
    ///```rust
    /// use metfor::{Celsius, Kelvin};
    /// use argo_profiles::PointRecord;
    /// use optional::{some, none};
    ///
    /// let _rec = PointRecord::new(1, 1).with_temperature(Celsius(12.5));
    /// let _rec = PointRecord::new(1, 1).with_temperature(some(Celsius(12.5)));
    /// let _rec = PointRecord::new(1, 1).with_temperature(Kelvin(285.65));
    /// let _rec = PointRecord::new(1, 1).with_temperature(none::<Celsius>());
    ///```
    #[inline]
    pub fn with_temperature<T, U>(mut self, value: T) -> Self
    where
        Optioned<U>: From<T>,
        U: optional::Noned + metfor::Temperature,
        Celsius: From<U>,
    {
        let temperature: Optioned<U> = Optioned::from(value);
        self.temperature = temperature.map_t(Celsius::from);
        self
    }

    /// Builder method for the practical salinity.
    #[inline]
    pub fn with_salinity<T>(mut self, salinity: T) -> Self
    where
        Optioned<f64>: From<T>,
    {
        self.salinity = Optioned::from(salinity);
        self
    }

    /// Builder method for the time of the profile.
    #[inline]
    pub fn with_time<T>(mut self, time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.time = Option::from(time);
        self
    }

    /// Builder method for the latitude and longitude of the profile. NaN is a missing value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::PointRecord;
    ///
    /// let rec = PointRecord::new(6902755, 3).with_lat_lon((f64::NAN, -26.9));
    /// assert!(rec.latitude.is_none());
    /// assert_eq!(rec.longitude.unwrap(), -26.9);
    ///
    /// let rec = PointRecord::new(6902755, 3).with_lat_lon((Some(37.1), None));
    /// assert!(rec.longitude.is_none());
    /// ```
    #[inline]
    pub fn with_lat_lon<T>(mut self, (lat, lon): (T, T)) -> Self
    where
        Optioned<f64>: From<T>,
    {
        self.latitude = Optioned::from(lat);
        self.longitude = Optioned::from(lon);
        self
    }

    /// Builder method for the direction of the profile.
    #[inline]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Builder method for the data mode of the profile.
    #[inline]
    pub fn with_data_mode(mut self, data_mode: DataMode) -> Self {
        self.data_mode = Some(data_mode);
        self
    }

    /// Builder method setting the pressure, temperature and salinity QC flags at once.
    #[inline]
    pub fn with_level_qc(mut self, pres: QcFlag, temp: QcFlag, psal: QcFlag) -> Self {
        self.pres_qc = Some(pres);
        self.temp_qc = Some(temp);
        self.psal_qc = Some(psal);
        self
    }

    /// The (float, cycle) pair identifying the profile this record belongs to. `index` is the
    /// position of the record in its collection and is only used for error reporting.
    pub fn profile_key(&self, index: usize) -> Result<(u32, u32)> {
        let platform_number =
            self.platform_number
                .into_option()
                .ok_or(ArgoError::MalformedRecord {
                    index,
                    field: "platform_number",
                })?;
        let cycle_number = self
            .cycle_number
            .into_option()
            .ok_or(ArgoError::MalformedRecord {
                index,
                field: "cycle_number",
            })?;

        Ok((platform_number, cycle_number))
    }

    /// Split off the values shared by all points of the profile.
    pub fn header(&self, index: usize) -> Result<ProfileHeader> {
        let (platform_number, cycle_number) = self.profile_key(index)?;

        Ok(ProfileHeader {
            platform_number,
            cycle_number,
            direction: self.direction,
            data_mode: self.data_mode,
            time: self.time,
            latitude: self.latitude,
            longitude: self.longitude,
            position_qc: self.position_qc,
            time_qc: self.time_qc,
        })
    }

    /// Build a record from a header with all level values missing.
    pub fn from_header(header: &ProfileHeader) -> Self {
        PointRecord {
            platform_number: Optioned::from(header.platform_number),
            cycle_number: Optioned::from(header.cycle_number),
            direction: header.direction,
            data_mode: header.data_mode,
            time: header.time,
            latitude: header.latitude,
            longitude: header.longitude,
            position_qc: header.position_qc,
            time_qc: header.time_qc,
            ..PointRecord::default()
        }
    }
}

/// An owned collection of point records, the flat shape of the data.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{PointCollection, PointRecord};
///
/// let pts = PointCollection::new(vec![
///     PointRecord::new(6902755, 3).with_pressure(5.0),
///     PointRecord::new(6902755, 3).with_pressure(10.0),
///     PointRecord::new(6902755, 12).with_pressure(5.0),
/// ]);
///
/// let profiles = pts.to_profiles().unwrap();
/// assert_eq!(profiles.n_profiles(), 2);
/// assert_eq!(profiles.max_levels(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PointCollection {
    records: Vec<PointRecord>,
}

impl PointCollection {
    /// Wrap a vector of records.
    #[inline]
    pub fn new(records: Vec<PointRecord>) -> Self {
        PointCollection { records }
    }

    /// Reshape into a collection indexed by profile and level.
    #[inline]
    pub fn to_profiles(&self) -> Result<ProfileCollection> {
        crate::convert::points_to_profiles(&self.records)
    }

    /// Get the records.
    #[inline]
    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Unwrap into the vector of records.
    #[inline]
    pub fn into_records(self) -> Vec<PointRecord> {
        self.records
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<PointRecord>> for PointCollection {
    fn from(records: Vec<PointRecord>) -> Self {
        PointCollection::new(records)
    }
}

impl From<ProfileCollection> for PointCollection {
    fn from(profiles: ProfileCollection) -> Self {
        PointCollection::new(profiles.to_points())
    }
}
