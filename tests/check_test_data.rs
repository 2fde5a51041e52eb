#[macro_use]
mod utils;

#[test]
fn test_load_test_csv_points() {
    let (recs, ivals, fvals) = utils::load_test_file("float_6902755.csv");

    assert_eq!(recs.len(), 6);
    assert!(recs.iter().all(|r| r.platform_number.unwrap() == 6902755));
    assert!(recs.iter().all(|r| r.time.is_some()));

    assert!(Some(&2) == ivals.get("num profiles"));
    assert!(Some(&2) == ivals.get("num padding"));

    assert!(Some(&vec![2.0, 4.0]) == fvals.get("level counts"));
    assert!(Some(&vec![4.9, 10.0]) == fvals.get("profile 0 pressures"));
}

#[test]
fn test_missing_cells_load_as_missing() {
    let (recs, _, _) = utils::load_test_file("ragged_batch.csv");

    let rec = &recs[1];
    assert_eq!(rec.pressure.unwrap(), 3.0);
    assert!(rec.salinity.is_none());
    assert!(rec.psal_qc.is_none());
    assert!(rec.temp_qc.is_some());
}

check_file_complete!(float_6902755_file_complete, "float_6902755.csv");
check_file_complete!(ragged_batch_file_complete, "ragged_batch.csv");
check_file_complete!(single_levels_file_complete, "single_levels.csv");
