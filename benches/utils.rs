use argo_profiles::{DataMode, PointRecord, QcFlag};
use metfor::Celsius;

/// A batch of records shaped like a region request: many floats, ragged profiles and levels in
/// no particular order.
pub fn synthetic_batch(n_floats: u32, n_cycles: u32, max_levels: u32) -> Vec<PointRecord> {
    let mut recs = vec![];

    for level in 0..max_levels {
        for wmo in 0..n_floats {
            for cyc in 1..=n_cycles {
                // Vary profile lengths between half and all of max_levels.
                let n_levels = max_levels / 2 + (wmo * 7 + cyc * 13) % (max_levels / 2 + 1);
                if level >= n_levels {
                    continue;
                }

                let p = 5.0 + 10.0 * f64::from(level);
                recs.push(
                    PointRecord::new(6_900_000 + wmo, cyc)
                        .with_lat_lon((f64::from(cyc % 90), f64::from(wmo % 180)))
                        .with_data_mode(DataMode::Delayed)
                        .with_pressure(p)
                        .with_temperature(Celsius(25.0 - p / 100.0))
                        .with_salinity(35.0 + p / 1000.0)
                        .with_level_qc(QcFlag::Good, QcFlag::Good, QcFlag::Good),
                );
            }
        }
    }

    recs
}
