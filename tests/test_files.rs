#[macro_use]
mod utils;

test_file!(float_6902755, "float_6902755.csv");
test_file!(ragged_batch, "ragged_batch.csv");
test_file!(single_levels, "single_levels.csv");
