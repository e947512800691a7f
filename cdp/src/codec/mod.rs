mod checksum;
mod reader;
mod writer;

pub use checksum::{internet_checksum, validate_checksum};
pub use reader::{AddressFamily, StreamReader};
pub use writer::StreamWriter;
