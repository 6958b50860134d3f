//! Library side of the `ddmrp` command: logging setup and terminal tables.

pub mod logging;
pub mod render;
