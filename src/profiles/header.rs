//! Values shared by all levels of a profile.
use crate::keys::{DataMode, Direction, QcFlag};
use chrono::NaiveDateTime;
use optional::Optioned;

/// The values shared by every level of a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileHeader {
    /// Float WMO id
    pub platform_number: u32,
    /// Cycle number of the float
    pub cycle_number: u32,
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
}

impl ProfileHeader {
    /// Create a header for the profile identified by `platform_number` and `cycle_number` with
    /// every other value missing.
    #[inline]
    pub fn new(platform_number: u32, cycle_number: u32) -> Self {
        ProfileHeader {
            platform_number,
            cycle_number,
            direction: None,
            data_mode: None,
            time: None,
            latitude: optional::none(),
            longitude: optional::none(),
            position_qc: None,
            time_qc: None,
        }
    }

    /// The (float, cycle) pair identifying this profile.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        (self.platform_number, self.cycle_number)
    }

    /// Latitude and longitude, if both are available.
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.latitude.into_option()?, self.longitude.into_option()?))
    }

    /// Name of the first field that differs between two headers, treating two missing values as
    /// equal.
    pub(crate) fn first_conflict(&self, other: &ProfileHeader) -> Option<&'static str> {
        if self.key() != other.key() {
            Some("platform_number")
        } else if self.direction != other.direction {
            Some("direction")
        } else if self.data_mode != other.data_mode {
            Some("data_mode")
        } else if self.time != other.time {
            Some("time")
        } else if self.latitude.into_option() != other.latitude.into_option() {
            Some("latitude")
        } else if self.longitude.into_option() != other.longitude.into_option() {
            Some("longitude")
        } else if self.position_qc != other.position_qc {
            Some("position_qc")
        } else if self.time_qc != other.time_qc {
            Some("time_qc")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_values_do_not_conflict() {
        let a = ProfileHeader::new(6902755, 3);
        let b = ProfileHeader::new(6902755, 3);
        assert!(a.first_conflict(&b).is_none());

        let c = ProfileHeader {
            latitude: optional::some(10.0),
            ..b
        };
        assert_eq!(a.first_conflict(&c), Some("latitude"));
        assert!(a.location().is_none());
    }
}
