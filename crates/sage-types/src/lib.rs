pub mod enums;
pub mod error;
pub mod file_kind;
pub mod headers;
pub mod record;

pub use enums::{BitmapCompression, CsfLanguage, EnumReadExt, WireEnum};
pub use error::TypeError;
pub use file_kind::FileKind;
pub use headers::AssetHeader;
pub use record::{Record, RecordReadExt, WireField, read_record};
pub use sage_wire::ByteCursor;
