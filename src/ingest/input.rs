use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::Result;

/// Read buffer size for input streams
pub const INPUT_BUFFER_CAPACITY: usize = 1 << 16;

/// Path that selects standard input
pub const STDIN_PATH: &str = "-";

/// Opens a (possibly compressed) read stream
///
/// Compression is detected from the stream contents. `-` reads from standard input.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let (reader, format) = if path == Path::new(STDIN_PATH) {
        niffler::get_reader(Box::new(io::stdin()))?
    } else {
        niffler::from_path(path)?
    };
    log::debug!("Opened {} ({format:?})", path.display());
    Ok(Box::new(BufReader::with_capacity(
        INPUT_BUFFER_CAPACITY,
        reader,
    )))
}
