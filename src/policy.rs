use crate::{error::IngestError, Result};

/// Policy for handling an accepted read whose encoded prefix holds a base outside {A,C,G,T}
///
/// Filtering already rejects reads containing `N`, so such a base means the stream
/// is not what the pipeline assumes it to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Fail the whole run; no output is written
    #[default]
    Abort,
    /// Drop the offending read and keep going
    SkipRecord,
}
impl Policy {
    /// Applies the policy to an invalid base
    ///
    /// Returns `Ok(())` when the read should be skipped, or the fatal error when the run
    /// must stop.
    ///
    /// # Arguments
    /// * `base` - The offending byte
    /// * `position` - Offset of the byte in the sequence
    /// * `record` - 1-based record number in the stream
    /// * `sequence` - The sequence line the byte was found in
    pub fn handle(self, base: u8, position: usize, record: usize, sequence: &[u8]) -> Result<()> {
        match self {
            Self::Abort => Err(IngestError::InvalidBase {
                base: char::from(base),
                position,
                record,
                sequence: String::from_utf8_lossy(sequence).into_owned(),
            }
            .into()),
            Self::SkipRecord => {
                log::warn!(
                    "Skipping record {record}: invalid base {:?} at position {position}",
                    char::from(base)
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::Error;

    #[test]
    fn test_abort_is_default() {
        assert_eq!(Policy::default(), Policy::Abort);
    }

    #[test]
    fn test_abort_reports_base() {
        match Policy::Abort.handle(b'R', 3, 7, b"ACGRT") {
            Err(Error::IngestError(IngestError::InvalidBase {
                base,
                position,
                record,
                sequence,
            })) => {
                assert_eq!(base, 'R');
                assert_eq!(position, 3);
                assert_eq!(record, 7);
                assert_eq!(sequence, "ACGRT");
            }
            other => panic!("expected invalid base error, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_record() {
        assert!(Policy::SkipRecord.handle(b'R', 3, 7, b"ACGRT").is_ok());
    }
}
