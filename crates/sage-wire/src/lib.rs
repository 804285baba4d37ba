pub mod config;
pub mod cursor;
pub mod error;
pub mod grid;
pub mod text;

pub use config::{CharEncoding, ReaderConfig};
pub use cursor::ByteCursor;
pub use error::WireError;
pub use grid::Grid;
