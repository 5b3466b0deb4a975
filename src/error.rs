/// Custom Result type for dnapack operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the dnapack library, encompassing all possible error cases
/// that can occur while ingesting reads or packing and unpacking symbols.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors raised while validating run configuration, before any I/O happens
    ConfigError(#[from] ConfigError),
    /// Errors that occur while ingesting a read stream
    IngestError(#[from] IngestError),
    /// Errors that occur while decoding packed data
    ReadError(#[from] ReadError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Failure to move a finished temporary file into its final location
    PersistError(#[from] tempfile::PersistError),
    /// Errors from writing the CSV run log
    CsvError(#[from] csv::Error),
    /// Errors from opening a (possibly compressed) input stream
    NifflerError(#[from] niffler::Error),
}

/// Errors in the parameters of a run or batch
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The read quota must be strictly positive
    #[error("Read quota must be greater than zero")]
    ZeroReadQuota,

    /// The k-mer length must be strictly positive
    #[error("K-mer length must be greater than zero")]
    ZeroKmerLength,

    /// The symbol buffer size (`kmer_length * read_quota`) does not fit in memory addressing
    #[error("Symbol buffer of {kmer_length} x {read_quota} symbols overflows the address space")]
    CapacityOverflow {
        kmer_length: usize,
        read_quota: usize,
    },

    /// A path required by the selected mode was not provided
    ///
    /// # Arguments
    /// * `&'static str` - Name of the missing path
    #[error("Missing required path: {0}")]
    MissingPath(&'static str),
}

/// Errors that terminate an ingestion run
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// A base outside of {A,C,G,T} was found inside the encoded prefix of an accepted read
    ///
    /// # Fields
    /// * `base` - The offending character
    /// * `position` - Its 0-based offset in the sequence
    /// * `record` - The 1-based record number in the stream
    /// * `sequence` - The full (newline stripped) sequence line
    #[error("Invalid base {base:?} at position {position} of record {record}: {sequence}")]
    InvalidBase {
        base: char,
        position: usize,
        record: usize,
        sequence: String,
    },

    /// The fixed-capacity symbol buffer could not be allocated
    ///
    /// # Arguments
    /// * `usize` - The requested capacity in symbols
    #[error("Unable to allocate a symbol buffer of {0} symbols")]
    BufferAllocation(usize),
}

/// Errors that can occur while reading packed data
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The file being mapped is not a regular file (e.g., it might be a directory or special file)
    #[error("File is not regular")]
    IncompatibleFile,

    /// The packed source ended before the requested number of symbols could be recovered
    ///
    /// # Fields
    /// * `expected` - Number of bytes required for the requested symbol count
    /// * `found` - Number of bytes actually available
    #[error(
        "Packed data is truncated: {expected} bytes required for the requested symbols, found {found}"
    )]
    Truncated { expected: usize, found: usize },
}
