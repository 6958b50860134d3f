pub mod error;
pub mod fetch;
pub mod normalize;
pub mod sanitize;
pub mod table;
pub mod values;

pub use error::{FetchError, SchemaError, TableError};
pub use fetch::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, FetchOptions, HttpResponse,
    HttpTransport, MatrixFetcher, RecordingSleeper, ReqwestTransport, Sleeper, ThreadSleeper,
    TransportError, export_url,
};
pub use normalize::{COLUMN_ALIASES, ColumnAlias, NormalizedTable, normalize_columns, resolve_columns};
pub use sanitize::{MISSING_DESCRIPTION, SanitizedTable, sanitize};
pub use table::RawTable;
pub use values::{clean_key, format_numeric, parse_f64};
