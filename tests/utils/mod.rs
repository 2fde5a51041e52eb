use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use argo_profiles::{DataMode, Direction, PointRecord, QcFlag};
use chrono::NaiveDateTime;
use metfor::Celsius;
use optional::Optioned;

pub mod convert_tests;

#[allow(unused_macros)] // False alarm
macro_rules! check_file_complete {
    ($test_name:ident, $fname:expr) => {
        #[test]
        fn $test_name() {
            let (recs, ivals, fvals) = utils::load_test_file($fname);

            assert!(!recs.is_empty(), "No records loaded.");

            let ival_keys = ["num profiles", "max levels", "num points", "num padding"];

            // Make sure all of these keys are in the hashmaps
            for key in ival_keys.iter() {
                assert!(ivals.contains_key(*key), "{}", key);
            }
            assert!(fvals.contains_key("level counts"));

            let num_profiles = ivals["num profiles"] as usize;
            for i in 0..num_profiles {
                let key = format!("profile {} pressures", i);
                assert!(fvals.contains_key(&key), "{}", key);
            }

            // Make sure there are no extra keys in there being ignored.
            for key in ivals.keys() {
                assert!(ival_keys.contains(&key.as_str()), "extra ival key found");
            }

            assert_eq!(fvals.len(), num_profiles + 1, "extra fval key found");
        }
    };
}

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {

            use std::collections::HashMap;

            use crate::utils;
            use argo_profiles::PointRecord;

            fn load_data() -> (Vec<PointRecord>, HashMap<String, i64>, HashMap<String, Vec<f64>>) {
                utils::load_test_file($fname)
            }

            #[test]
            fn shape() {
                let (recs, ivals, fvals) = load_data();
                utils::convert_tests::test_shape(&recs, &ivals, &fvals);
            }

            #[test]
            fn level_order() {
                let (recs, _, fvals) = load_data();
                utils::convert_tests::test_level_order(&recs, &fvals);
            }

            #[test]
            fn padding() {
                let (recs, ivals, _) = load_data();
                utils::convert_tests::test_padding(&recs, &ivals);
            }

            #[test]
            fn round_trip() {
                let (recs, _, _) = load_data();
                utils::convert_tests::test_round_trip(&recs);
            }

            #[test]
            fn shuffled_round_trip() {
                let (recs, _, _) = load_data();
                utils::convert_tests::test_shuffled_round_trip(&recs);
            }

            #[test]
            fn table_export() {
                let (recs, ivals, _) = load_data();
                utils::convert_tests::test_table_export(&recs, &ivals);
            }
        }
    };
}

pub fn load_test_file(
    fname: &str,
) -> (
    Vec<PointRecord>,
    HashMap<String, i64>,
    HashMap<String, Vec<f64>>,
) {
    let mut test_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    test_path.push("test_data");
    test_path.push(fname);
    load_test_csv_points(&test_path)
}

fn load_test_csv_points(
    location: &PathBuf,
) -> (
    Vec<PointRecord>,
    HashMap<String, i64>,
    HashMap<String, Vec<f64>>,
) {
    let mut f = File::open(location).expect(&format!("Error opening file: {:?}", location));

    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .expect(&format!("Error reading file: {:?}", location));

    let lines: Vec<&str> = contents.split('\n').collect();
    let mut line_iter = lines.iter();

    //
    // Parse point data
    //
    let mut recs: Vec<PointRecord> = Vec::with_capacity(lines.len());

    for line in line_iter.by_ref() {
        if line.starts_with("### Expected Int Section ###") {
            break;
        }

        let tokens: Vec<&str> = line.trim().split(',').collect();
        if tokens.len() < 13 || tokens[0] == "platform_number" {
            continue;
        }

        let num = |s: &str| -> Optioned<f64> { f64::from_str(s).ok().into() };
        let qc = |s: &str| s.chars().next().and_then(QcFlag::from_code);

        let rec = PointRecord {
            platform_number: u32::from_str(tokens[0]).ok().into(),
            cycle_number: u32::from_str(tokens[1]).ok().into(),
            direction: Direction::from_str(tokens[2]).ok(),
            data_mode: DataMode::from_str(tokens[3]).ok(),
            time: NaiveDateTime::parse_from_str(tokens[4], "%Y-%m-%dT%H:%M:%S").ok(),
            latitude: num(tokens[5]),
            longitude: num(tokens[6]),
            pressure: num(tokens[7]),
            temperature: f64::from_str(tokens[8]).ok().map(Celsius).into(),
            salinity: num(tokens[9]),
            pres_qc: qc(tokens[10]),
            temp_qc: qc(tokens[11]),
            psal_qc: qc(tokens[12]),
            ..PointRecord::default()
        };

        recs.push(rec);
    }

    //
    // Expected integer values
    //
    let mut ivals: HashMap<String, i64> = HashMap::new();
    for line in line_iter.by_ref() {
        if line.starts_with("### Expected Float Section ###") {
            break;
        }

        let tokens: Vec<&str> = line.trim().split(',').collect();
        if tokens.len() < 2 {
            continue;
        }

        let key = tokens[0].to_owned();
        let val = i64::from_str(tokens[1]).expect(&format!("Bad int value for {}", key));
        ivals.insert(key, val);
    }

    //
    // Expected float values
    //
    let mut fvals: HashMap<String, Vec<f64>> = HashMap::new();
    for line in line_iter {
        let tokens: Vec<&str> = line.trim().split(',').collect();
        if tokens.len() < 2 {
            continue;
        }

        let key = tokens[0].to_owned();
        let vals: Vec<f64> = tokens[1..]
            .iter()
            .map(|t| f64::from_str(t).expect(&format!("Bad float value for {}", key)))
            .collect();
        fvals.insert(key, vals);
    }

    (recs, ivals, fvals)
}

/// A sortable, comparable rendering of a batch of records. Two batches render the same if they
/// hold the same records, in any order.
pub fn canonical(records: &[PointRecord]) -> Vec<String> {
    let mut keys: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "{:?}",
                (
                    (
                        r.platform_number.into_option(),
                        r.cycle_number.into_option(),
                        r.direction,
                        r.data_mode,
                        r.time,
                    ),
                    (r.latitude.into_option(), r.longitude.into_option()),
                    (
                        r.pressure.into_option(),
                        r.temperature.into_option(),
                        r.salinity.into_option(),
                    ),
                    (r.pres_qc, r.temp_qc, r.psal_qc),
                )
            )
        })
        .collect();
    keys.sort();
    keys
}
