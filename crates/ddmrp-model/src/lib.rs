pub mod columns;
pub mod enums;
pub mod error;
pub mod record;
pub mod reports;

pub use enums::{BufferStatus, ExportFormat, SourceRole};
pub use error::{ModelError, Result};
pub use record::{BufferRecord, EnrichmentColumns, ZoneBoundaries, non_negative};
pub use reports::{ColumnMapping, ColumnResolution, SanitizeReport};
