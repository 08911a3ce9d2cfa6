//! Boundary adapters: versioned persistence, TSP.gov CSV import, and
//! projection/scenario export

pub mod export;
pub mod store;
pub mod tsp_csv;

pub use export::{
    format_thousands, scenario_filename, scenario_to_json, write_projection_csv,
    PROJECTION_CSV_MIME,
};
pub use store::{
    read_or_discard, read_record, write_record, ScenarioRecord, VersionedRecord,
    CURRENT_SCHEMA_VERSION,
};
pub use tsp_csv::{parse_tsp_activity, TspActivityRow};
