//! Reshape Argo data between the point and profile shapes.
//!
//! A point collection has one record per measurement. A profile collection groups those records
//! by float and cycle number and lays the levels of each group out along a second dimension,
//! sorted by pressure. The two shapes hold the same information: converting points to profiles and
//! back gives the original records, possibly in a different order.
//!
//! Levels with equal pressure in the same profile keep the order they had in the input, and levels
//! without a pressure go to the bottom of their profile, again in input order.
use crate::{
    error::{ArgoError, Result},
    point::PointRecord,
    profiles::{ProfileCollection, ProfileHeader},
};
use std::{cmp::Ordering, collections::HashMap};
use tracing::debug;

/// Group point records into profiles.
///
/// Records sharing a float id and cycle number form one profile. Profiles appear in the order their
/// first record appears in `records`, levels are sorted by increasing pressure, and profiles
/// shorter than the longest one are padded with missing values.
///
/// Fails without producing any output if a record lacks a float id or cycle number, or if two
/// records of the same profile disagree on a header value such as the time or position.
///
/// A float may report an ascending and a descending profile under the same cycle number. Both land
/// in one group and the conversion fails with `InconsistentHeader` on `direction`, so split such a
/// batch by [`Direction`](crate::Direction) and convert each part on its own.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{points_to_profiles, PointRecord};
///
/// let mut records = vec![];
/// for p in &[10.0, 5.0] {
///     records.push(PointRecord::new(6902755, 3).with_pressure(*p));
/// }
/// for p in &[5.0, 10.0, 20.0, 40.0] {
///     records.push(PointRecord::new(6902755, 12).with_pressure(*p));
/// }
///
/// let profiles = points_to_profiles(&records).unwrap();
/// assert_eq!(profiles.shape(), (2, 4));
/// assert_eq!(profiles.pressure()[[0, 0]].unwrap(), 5.0);
/// assert!(profiles.pressure()[[0, 3]].is_none()); // padding
///
/// assert_eq!(profiles.to_points().len(), 6);
/// ```
pub fn points_to_profiles(records: &[PointRecord]) -> Result<ProfileCollection> {
    let mut groups: Vec<(ProfileHeader, Vec<usize>)> = Vec::new();
    let mut group_of: HashMap<(u32, u32), usize> = HashMap::new();

    for (idx, rec) in records.iter().enumerate() {
        let header = rec.header(idx)?;

        match group_of.get(&header.key()) {
            Some(&g) => {
                let (first, members) = &mut groups[g];
                if let Some(field) = first.first_conflict(&header) {
                    return Err(ArgoError::InconsistentHeader {
                        platform_number: header.platform_number,
                        cycle_number: header.cycle_number,
                        field,
                    });
                }
                members.push(idx);
            }
            None => {
                group_of.insert(header.key(), groups.len());
                groups.push((header, vec![idx]));
            }
        }
    }

    // sort_by is stable, so duplicate pressures keep their input order.
    for (_, members) in groups.iter_mut() {
        members.sort_by(|&a, &b| cmp_pressure(&records[a], &records[b]));
    }

    let level_counts: Vec<usize> = groups.iter().map(|(_, members)| members.len()).collect();
    let headers: Vec<ProfileHeader> = groups.iter().map(|(header, _)| *header).collect();

    let mut collection = ProfileCollection::with_shape(headers, level_counts);
    for (profile, (_, members)) in groups.iter().enumerate() {
        for (level, &idx) in members.iter().enumerate() {
            collection.set_level(profile, level, &records[idx]);
        }
    }

    debug!(
        n_records = records.len(),
        n_profiles = collection.n_profiles(),
        max_levels = collection.max_levels(),
        "reshaped points to profiles"
    );

    Ok(collection)
}

/// Flatten a profile collection into point records.
///
/// Records come out in profile order, then level order. Padding is dropped, so the output has one
/// record per real level.
///
/// # Examples
///
/// ```rust
/// use argo_profiles::{points_to_profiles, profiles_to_points, PointRecord};
///
/// let records = vec![
///     PointRecord::new(6902755, 3).with_pressure(5.0),
///     PointRecord::new(6902755, 12).with_pressure(5.0),
///     PointRecord::new(6902755, 12).with_pressure(10.0),
///     PointRecord::new(6902755, 12).with_pressure(20.0),
/// ];
///
/// let profiles = points_to_profiles(&records).unwrap();
/// assert_eq!(profiles.shape(), (2, 3));
///
/// let points = profiles_to_points(&profiles);
/// assert_eq!(points.len(), 4);
/// assert!(points.iter().all(|p| p.pressure.is_some()));
/// ```
pub fn profiles_to_points(collection: &ProfileCollection) -> Vec<PointRecord> {
    let mut points = Vec::with_capacity(collection.n_points());
    for profile in 0..collection.n_profiles() {
        points.extend(collection.points(profile));
    }

    debug!(
        n_profiles = collection.n_profiles(),
        n_records = points.len(),
        "flattened profiles to points"
    );

    points
}

// Ascending pressure with missing values last.
fn cmp_pressure(a: &PointRecord, b: &PointRecord) -> Ordering {
    match (a.pressure.into_option(), b.pressure.into_option()) {
        (Some(pa), Some(pb)) => pa.partial_cmp(&pb).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
