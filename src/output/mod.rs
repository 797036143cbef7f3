//! Presentation of aggregated series: export backends, plot, text table

pub mod jsonl_writer;
pub mod plot;
pub mod sqlite_writer;
pub mod table;
pub mod writer;
pub mod writer_backend;

pub use jsonl_writer::{SeriesJsonlWriter, SeriesRecord};
pub use plot::{render_series, PlotConfig};
pub use sqlite_writer::SqliteSeriesWriter;
pub use table::render_table;
pub use writer::{AggregatorWriter, BackendType};
pub use writer_backend::{AggregatorWriterBackend, AggregatorWriterError};
