//! Data type storing Argo data indexed by profile and level.

use crate::{keys::QcFlag, point::PointRecord};
use metfor::Celsius;
use ndarray::{Array2, ArrayView1, ArrayView2};
use optional::Optioned;

pub use self::header::ProfileHeader;

/// Name of the profile dimension of the level arrays.
pub const PROFILE_DIM: &str = "N_PROF";
/// Name of the level dimension of the level arrays.
pub const LEVEL_DIM: &str = "N_LEVELS";

/// A batch of profiles stored as rectangular arrays.
///
/// Every level variable is a 2D array with shape `(n_profiles, max_levels)`. Profiles with fewer
/// levels than the longest one in the batch are padded with missing values, and the padding is
/// tracked by the per profile level count so a level whose measurements are all missing is never
/// mistaken for padding.
///
/// Collections are built from point records with [`points_to_profiles`](crate::points_to_profiles)
/// and turned back into records with [`to_points`](ProfileCollection::to_points).
#[derive(Clone, Debug)]
pub struct ProfileCollection {
    headers: Vec<ProfileHeader>,
    level_counts: Vec<usize>,

    // Level variables, indexed by [profile, level]
    pressure: Array2<Optioned<f64>>,
    temperature: Array2<Optioned<Celsius>>,
    salinity: Array2<Optioned<f64>>,
    pres_qc: Array2<Option<QcFlag>>,
    temp_qc: Array2<Option<QcFlag>>,
    psal_qc: Array2<Option<QcFlag>>,
}

impl Default for ProfileCollection {
    fn default() -> Self {
        ProfileCollection::with_shape(vec![], vec![])
    }
}

impl ProfileCollection {
    /// Create an empty collection with zero profiles.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::ProfileCollection;
    ///
    /// let col = ProfileCollection::new();
    /// assert_eq!(col.n_profiles(), 0);
    /// assert_eq!(col.max_levels(), 0);
    /// assert!(col.to_points().is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        ProfileCollection::default()
    }

    /// Allocate a collection for the given profiles with every level slot missing.
    pub(crate) fn with_shape(headers: Vec<ProfileHeader>, level_counts: Vec<usize>) -> Self {
        debug_assert_eq!(headers.len(), level_counts.len());

        let max_levels = level_counts.iter().copied().max().unwrap_or(0);
        let shape = (headers.len(), max_levels);

        ProfileCollection {
            headers,
            level_counts,
            pressure: Array2::from_elem(shape, optional::none()),
            temperature: Array2::from_elem(shape, optional::none()),
            salinity: Array2::from_elem(shape, optional::none()),
            pres_qc: Array2::from_elem(shape, None),
            temp_qc: Array2::from_elem(shape, None),
            psal_qc: Array2::from_elem(shape, None),
        }
    }

    /// Copy the level values of `rec` into slot `[profile, level]`.
    pub(crate) fn set_level(&mut self, profile: usize, level: usize, rec: &PointRecord) {
        debug_assert!(level < self.level_counts[profile]);

        let idx = [profile, level];
        self.pressure[idx] = rec.pressure;
        self.temperature[idx] = rec.temperature;
        self.salinity[idx] = rec.salinity;
        self.pres_qc[idx] = rec.pres_qc;
        self.temp_qc[idx] = rec.temp_qc;
        self.psal_qc[idx] = rec.psal_qc;
    }

    /// Number of profiles.
    #[inline]
    pub fn n_profiles(&self) -> usize {
        self.headers.len()
    }

    /// Length of the level dimension, the number of levels of the longest profile.
    #[inline]
    pub fn max_levels(&self) -> usize {
        self.pressure.ncols()
    }

    /// Shape of the level arrays as `(n_profiles, max_levels)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_profiles(), self.max_levels())
    }

    /// Number of real, non padding, levels in a profile.
    #[inline]
    pub fn level_count(&self, profile: usize) -> Option<usize> {
        self.level_counts.get(profile).copied()
    }

    /// The number of real levels of every profile.
    #[inline]
    pub fn level_counts(&self) -> &[usize] {
        &self.level_counts
    }

    /// Total number of non padding entries.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.level_counts.iter().sum()
    }

    /// Header of a profile.
    #[inline]
    pub fn header(&self, profile: usize) -> Option<&ProfileHeader> {
        self.headers.get(profile)
    }

    /// Headers of all profiles in profile order.
    #[inline]
    pub fn headers(&self) -> &[ProfileHeader] {
        &self.headers
    }

    /// Index of the profile with the given float and cycle number.
    pub fn find_profile(&self, platform_number: u32, cycle_number: u32) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.key() == (platform_number, cycle_number))
    }

    /// True if slot `[profile, level]` is padding. Slots outside the arrays are padding too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{points_to_profiles, PointRecord};
    ///
    /// let col = points_to_profiles(&[
    ///     PointRecord::new(6902755, 3).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(10.0),
    /// ]).unwrap();
    ///
    /// assert!(!col.is_padding(0, 0));
    /// assert!(col.is_padding(0, 1));
    /// assert!(!col.is_padding(1, 1));
    /// assert!(col.is_padding(2, 0));
    /// ```
    #[inline]
    pub fn is_padding(&self, profile: usize, level: usize) -> bool {
        self.level_count(profile).map_or(true, |n| level >= n)
    }

    /// Pressure in decibars, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn pressure(&self) -> ArrayView2<'_, Optioned<f64>> {
        self.pressure.view()
    }

    /// Temperature, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn temperature(&self) -> ArrayView2<'_, Optioned<Celsius>> {
        self.temperature.view()
    }

    /// Practical salinity, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn salinity(&self) -> ArrayView2<'_, Optioned<f64>> {
        self.salinity.view()
    }

    /// Pressure QC flags, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn pres_qc(&self) -> ArrayView2<'_, Option<QcFlag>> {
        self.pres_qc.view()
    }

    /// Temperature QC flags, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn temp_qc(&self) -> ArrayView2<'_, Option<QcFlag>> {
        self.temp_qc.view()
    }

    /// Salinity QC flags, dimensions `(N_PROF, N_LEVELS)`.
    #[inline]
    pub fn psal_qc(&self) -> ArrayView2<'_, Option<QcFlag>> {
        self.psal_qc.view()
    }

    /// Pressure levels of a single profile, padding included.
    #[inline]
    pub fn pressure_profile(&self, profile: usize) -> ArrayView1<'_, Optioned<f64>> {
        self.pressure.row(profile)
    }

    /// Temperature levels of a single profile, padding included.
    #[inline]
    pub fn temperature_profile(&self, profile: usize) -> ArrayView1<'_, Optioned<Celsius>> {
        self.temperature.row(profile)
    }

    /// Salinity levels of a single profile, padding included.
    #[inline]
    pub fn salinity_profile(&self, profile: usize) -> ArrayView1<'_, Optioned<f64>> {
        self.salinity.row(profile)
    }

    /// Get the point record stored at `[profile, level]`, or `None` for padding.
    #[inline]
    pub fn point(&self, profile: usize, level: usize) -> Option<PointRecord> {
        if self.is_padding(profile, level) {
            return None;
        }

        let idx = [profile, level];
        Some(PointRecord {
            pressure: self.pressure[idx],
            temperature: self.temperature[idx],
            salinity: self.salinity[idx],
            pres_qc: self.pres_qc[idx],
            temp_qc: self.temp_qc[idx],
            psal_qc: self.psal_qc[idx],
            ..PointRecord::from_header(&self.headers[profile])
        })
    }

    /// Iterate over the non padding levels of a profile from the surface down.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argo_profiles::{points_to_profiles, PointRecord};
    ///
    /// let col = points_to_profiles(&[
    ///     PointRecord::new(6902755, 3).with_pressure(50.0),
    ///     PointRecord::new(6902755, 3).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(5.0),
    ///     PointRecord::new(6902755, 12).with_pressure(10.0),
    ///     PointRecord::new(6902755, 12).with_pressure(20.0),
    /// ]).unwrap();
    ///
    /// let pressures: Vec<f64> = col.points(0).map(|p| p.pressure.unwrap()).collect();
    /// assert_eq!(pressures, vec![5.0, 50.0]);
    /// assert_eq!(col.points(1).count(), 3);
    /// assert_eq!(col.points(5).count(), 0);
    /// ```
    #[inline]
    pub fn points<'a>(&'a self, profile: usize) -> impl Iterator<Item = PointRecord> + 'a {
        let n = self.level_count(profile).unwrap_or(0);
        (0..n).filter_map(move |level| self.point(profile, level))
    }

    /// Flatten back into point records, see [`profiles_to_points`](crate::profiles_to_points).
    #[inline]
    pub fn to_points(&self) -> Vec<PointRecord> {
        crate::convert::profiles_to_points(self)
    }
}

mod header;

#[cfg(test)]
mod test {
    use super::*;

    fn two_profiles() -> ProfileCollection {
        let mut col = ProfileCollection::with_shape(
            vec![ProfileHeader::new(1, 1), ProfileHeader::new(1, 2)],
            vec![1, 3],
        );

        for level in 0..3 {
            let rec = PointRecord::new(1, 2).with_pressure(level as f64 * 10.0);
            col.set_level(1, level, &rec);
        }
        col.set_level(0, 0, &PointRecord::new(1, 1).with_pressure(3.0));

        col
    }

    #[test]
    fn test_shape_and_padding() {
        let col = two_profiles();

        assert_eq!(col.shape(), (2, 3));
        assert_eq!(col.n_points(), 4);
        assert_eq!(col.level_counts(), &[1, 3]);
        assert!(col.pressure()[[0, 1]].is_none());
        assert!(col.pressure()[[0, 2]].is_none());
        assert!(col.pres_qc()[[0, 2]].is_none());
        assert_eq!(col.pressure()[[1, 2]].unwrap(), 20.0);
        assert!(col.point(0, 1).is_none());
    }

    #[test]
    fn test_point_carries_header() {
        let col = two_profiles();
        let pt = col.point(1, 1).unwrap();

        assert_eq!(pt.platform_number.unwrap(), 1);
        assert_eq!(pt.cycle_number.unwrap(), 2);
        assert_eq!(pt.pressure.unwrap(), 10.0);
        assert_eq!(col.find_profile(1, 2), Some(1));
        assert_eq!(col.find_profile(9, 9), None);
    }
}
