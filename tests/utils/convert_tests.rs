use std::collections::HashMap;

use argo_profiles::{
    points_to_profiles, profiles_to_points, CsvSerializer, PointRecord, Serializer, ToTable,
};

use super::canonical;

pub fn test_shape(
    recs: &[PointRecord],
    ivals: &HashMap<String, i64>,
    fvals: &HashMap<String, Vec<f64>>,
) {
    let col = points_to_profiles(recs).unwrap();

    assert_eq!(col.n_profiles() as i64, ivals["num profiles"]);
    assert_eq!(col.max_levels() as i64, ivals["max levels"]);
    assert_eq!(col.n_points() as i64, ivals["num points"]);

    let counts: Vec<f64> = col.level_counts().iter().map(|&n| n as f64).collect();
    assert_eq!(&counts, &fvals["level counts"]);
}

pub fn test_level_order(recs: &[PointRecord], fvals: &HashMap<String, Vec<f64>>) {
    let col = points_to_profiles(recs).unwrap();

    for profile in 0..col.n_profiles() {
        let expected = &fvals[&format!("profile {} pressures", profile)];
        let analysis: Vec<f64> = col
            .points(profile)
            .map(|p| p.pressure.unwrap())
            .collect();

        println!("\nprofile {}: {:?} vs {:?}", profile, analysis, expected);
        assert_eq!(&analysis, expected);
        assert!(analysis.windows(2).all(|w| w[0] <= w[1]));
    }
}

pub fn test_padding(recs: &[PointRecord], ivals: &HashMap<String, i64>) {
    let col = points_to_profiles(recs).unwrap();
    let (n_prof, n_levels) = col.shape();

    let mut num_padding = 0;
    for profile in 0..n_prof {
        for level in 0..n_levels {
            if col.is_padding(profile, level) {
                num_padding += 1;
                assert!(col.pressure()[[profile, level]].is_none());
                assert!(col.temperature()[[profile, level]].is_none());
                assert!(col.salinity()[[profile, level]].is_none());
                assert!(col.pres_qc()[[profile, level]].is_none());
                assert!(col.temp_qc()[[profile, level]].is_none());
                assert!(col.psal_qc()[[profile, level]].is_none());
                assert!(col.point(profile, level).is_none());
            } else {
                assert!(col.point(profile, level).is_some());
            }
        }
    }

    assert_eq!(num_padding, ivals["num padding"]);
    assert_eq!(n_prof * n_levels, col.n_points() + num_padding as usize);
}

pub fn test_round_trip(recs: &[PointRecord]) {
    let col = points_to_profiles(recs).unwrap();
    let back = profiles_to_points(&col);

    assert_eq!(back.len(), recs.len());
    assert_eq!(canonical(&back), canonical(recs));

    // Converting a second time changes nothing.
    let again = points_to_profiles(&back).unwrap();
    assert_eq!(canonical(&profiles_to_points(&again)), canonical(recs));
}

pub fn test_shuffled_round_trip(recs: &[PointRecord]) {
    let mut shuffled = recs.to_vec();
    shuffled.reverse();
    let mid = shuffled.len() / 2;
    shuffled.rotate_left(mid);

    let col = points_to_profiles(&shuffled).unwrap();
    let reference = points_to_profiles(recs).unwrap();

    assert_eq!(col.n_profiles(), reference.n_profiles());
    assert_eq!(col.max_levels(), reference.max_levels());
    assert_eq!(canonical(&col.to_points()), canonical(recs));

    // Same profile, same levels regardless of the input order.
    for header in reference.headers() {
        let (wmo, cyc) = header.key();
        let a = reference.find_profile(wmo, cyc).unwrap();
        let b = col.find_profile(wmo, cyc).unwrap();

        let pa: Vec<_> = reference.points(a).map(|p| p.pressure.into_option()).collect();
        let pb: Vec<_> = col.points(b).map(|p| p.pressure.into_option()).collect();
        assert_eq!(pa, pb);
    }
}

pub fn test_table_export(recs: &[PointRecord], ivals: &HashMap<String, i64>) {
    let col = points_to_profiles(recs).unwrap();

    let profile_table = col.to_table();
    let (n_prof, n_levels) = col.shape();
    assert_eq!(profile_table.n_rows(), n_prof * n_levels);

    let padded_rows = profile_table
        .rows()
        .iter()
        .filter(|row| row[2 + 9].is_empty())
        .count();
    assert_eq!(padded_rows as i64, ivals["num padding"]);

    let point_table = recs.to_table();
    assert_eq!(point_table.n_rows() as i64, ivals["num points"]);

    let mut buf = vec![];
    CsvSerializer::new().write(&point_table, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert_eq!(csv.lines().count(), point_table.n_rows() + 1);
}
