#![warn(missing_docs)]
/*!
Types and functions for working with Argo float data.

Argo floats drift through the ocean and periodically profile the water column, reporting pressure,
temperature and salinity at a series of levels. Data sources hand those measurements out as a flat
list of points, one per level, while most analysis wants them grouped by profile. This crate
provides both shapes and a lossless conversion between them.

 - [`PointRecord`] and [`PointCollection`] hold the flat shape.
 - [`ProfileCollection`] holds the same data as `(profile, level)` arrays padded with missing
   values.
 - [`points_to_profiles`] and [`profiles_to_points`] convert between them.
 - [`DataFetcher`] selects data from a [`Fetcher`] by float, profile or region, configured by an
   explicit [`FetcherConfig`].
 - [`IndexFetcher`] searches the profile index by float or region.
 - [`ToTable`] and [`Serializer`] export either shape, or the index, as a table.

# Examples

```rust
use argo_profiles::{points_to_profiles, PointRecord};
use metfor::Celsius;

let records = vec![
    PointRecord::new(6902755, 3).with_pressure(5.0).with_temperature(Celsius(24.1)),
    PointRecord::new(6902755, 3).with_pressure(10.0).with_temperature(Celsius(23.9)),
    PointRecord::new(6902755, 12).with_pressure(5.0).with_temperature(Celsius(25.3)),
];

let profiles = points_to_profiles(&records).unwrap();
assert_eq!(profiles.n_profiles(), 2);
assert!(profiles.is_padding(1, 1));

let points = profiles.to_points();
assert_eq!(points.len(), 3);
```
*/

//
// API
//
pub use crate::{
    config::{DataSource, Dataset, FetcherConfig, UserMode, DEFAULT_ERDDAP_SERVER},
    convert::{points_to_profiles, profiles_to_points},
    erddap::ErddapQuery,
    error::{ArgoError, Result},
    fetcher::{filter_standard, AccessPoint, DataFetcher, Fetcher, MemoryFetcher, Region},
    index::{parse_index, IndexFetcher, IndexRecord, IndexSource, MemoryIndex},
    keys::{DataMode, Direction, Ocean, QcFlag},
    point::{PointCollection, PointRecord},
    profiles::{ProfileCollection, ProfileHeader, LEVEL_DIM, PROFILE_DIM},
    table::{CsvSerializer, Serializer, Table, ToTable, INDEX_COLUMNS, POINT_COLUMNS},
};

//
// Internal use only
//

// Modules
mod config;
mod convert;
mod erddap;
mod error;
mod fetcher;
mod index;
mod keys;
mod point;
mod profiles;
mod table;
