pub mod loader;
pub mod schema;
pub mod types;
pub mod validation;

pub use loader::{find_model_file, load_json_file, load_model_record};
pub use types::{BenchmarkScores, CommunityMetrics, ModelRecord, ModelSpecs};
pub use validation::{validate_record, ValidationError};
