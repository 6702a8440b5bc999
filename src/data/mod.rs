pub mod record;
pub mod loader;
pub mod preprocess;

pub use record::{Dataset, EncodedRecord, Record, FEATURE_COUNT};
pub use loader::{load_dataset, one_hot, parse_dataset};
pub use preprocess::{l2_norm, normalize, normalize_rows, shuffle_pairs, validation_split};
