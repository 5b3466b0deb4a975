//! Line-oriented FASTQ record reader
//!
//! Records are taken in strict groups of four lines (identifier, sequence, separator,
//! quality). Only the sequence is kept; the other lines are consumed and discarded.
//! Line contents are not validated, so a misaligned stream is read as-is.

use std::io::BufRead;

use crate::Result;

/// A borrowed view of the sequence line of one record
#[derive(Debug, Clone, Copy)]
pub struct RefRead<'a> {
    /// 1-based position of the record in the stream
    number: usize,
    /// Sequence line with trailing line-ending characters removed
    seq: &'a [u8],
}
impl<'a> RefRead<'a> {
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    #[must_use]
    pub fn seq(&self) -> &'a [u8] {
        self.seq
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Strips trailing `\r` and `\n` bytes
fn trim_line_ending(line: &mut Vec<u8>) {
    while let Some(b'\n' | b'\r') = line.last() {
        line.pop();
    }
}

/// Streaming reader yielding the sequence of each complete 4-line record
///
/// A final record with fewer than four lines is silently dropped.
#[derive(Debug)]
pub struct RecordReader<R: BufRead> {
    inner: R,

    /// Reusable line buffers
    seq: Vec<u8>,
    scratch: Vec<u8>,

    /// Number of complete records produced
    n_records: usize,

    eof: bool,
}
impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            seq: Vec::new(),
            scratch: Vec::new(),
            n_records: 0,
            eof: false,
        }
    }

    /// Reads one line into `buf`, returning `false` at end of stream
    fn read_line(inner: &mut R, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        Ok(inner.read_until(b'\n', buf)? > 0)
    }

    /// Reads the next complete record
    ///
    /// Returns `None` once the stream is exhausted, including when the final record is
    /// truncated.
    pub fn next_record(&mut self) -> Option<Result<RefRead<'_>>> {
        if self.eof {
            return None;
        }

        match self.fill_record() {
            Ok(true) => {}
            Ok(false) => {
                self.eof = true;
                return None;
            }
            Err(e) => {
                self.eof = true;
                return Some(Err(e));
            }
        }

        self.n_records += 1;
        Some(Ok(RefRead {
            number: self.n_records,
            seq: &self.seq,
        }))
    }

    fn fill_record(&mut self) -> Result<bool> {
        // identifier
        if !Self::read_line(&mut self.inner, &mut self.scratch)? {
            return Ok(false);
        }
        // sequence
        if !Self::read_line(&mut self.inner, &mut self.seq)? {
            return Ok(false);
        }
        // separator, then quality
        for _ in 0..2 {
            if !Self::read_line(&mut self.inner, &mut self.scratch)? {
                return Ok(false);
            }
        }
        trim_line_ending(&mut self.seq);
        Ok(true)
    }

    /// Number of complete records read so far
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.n_records
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod testing {

    use super::*;
    use anyhow::Result;

    fn collect<R: BufRead>(mut reader: RecordReader<R>) -> Result<Vec<Vec<u8>>> {
        let mut seqs = Vec::new();
        while let Some(record) = reader.next_record() {
            seqs.push(record?.seq().to_vec());
        }
        Ok(seqs)
    }

    #[test]
    fn test_four_line_records() -> Result<()> {
        let input = b"@r1\nACGT\n+\nIIII\n@r2\nGGCC\n+\nIIII\n";
        let seqs = collect(RecordReader::new(&input[..]))?;
        assert_eq!(seqs, vec![b"ACGT".to_vec(), b"GGCC".to_vec()]);
        Ok(())
    }

    #[test]
    fn test_crlf_stripped_from_sequence() -> Result<()> {
        let input = b"@r1\r\nACGT\r\n+\r\nIIII\r\n";
        let seqs = collect(RecordReader::new(&input[..]))?;
        assert_eq!(seqs, vec![b"ACGT".to_vec()]);
        Ok(())
    }

    #[test]
    fn test_missing_final_newline() -> Result<()> {
        let input = b"@r1\nACGT\n+\nIIII";
        let seqs = collect(RecordReader::new(&input[..]))?;
        assert_eq!(seqs.len(), 1);
        Ok(())
    }

    #[test]
    fn test_truncated_final_record_dropped() -> Result<()> {
        let input = b"@r1\nACGT\n+\nIIII\n@r2\nGGCC\n+\n";
        let mut reader = RecordReader::new(&input[..]);
        assert_eq!(reader.next_record().transpose()?.map(|r| r.number()), Some(1));
        assert!(reader.next_record().is_none());
        assert!(reader.next_record().is_none());
        assert_eq!(reader.records_read(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_stream() -> Result<()> {
        assert!(collect(RecordReader::new(&b""[..]))?.is_empty());
        Ok(())
    }
}
