use crate::{error::ConfigError, Policy, Result};

/// Default number of accepted reads per run
pub const DEFAULT_READ_QUOTA: usize = 1_000_000;

/// Default length of the encoded prefix of each read
pub const DEFAULT_KMER_LENGTH: usize = 32;

/// Reads shorter than this are filtered out
pub const MIN_READ_LENGTH: usize = 32;

/// Validated parameters of an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Maximum number of accepted reads
    read_quota: usize,

    /// Number of leading bases encoded from each accepted read
    kmer_length: usize,

    /// Minimum sequence length of an accepted read
    min_length: usize,

    /// Handling of invalid bases inside an encoded prefix
    policy: Policy,
}
impl IngestConfig {
    /// Creates a configuration with the default length filter and policy
    pub fn new(read_quota: usize, kmer_length: usize) -> Result<Self> {
        IngestConfigBuilder::default()
            .read_quota(read_quota)
            .kmer_length(kmer_length)
            .build()
    }

    #[must_use]
    pub fn read_quota(&self) -> usize {
        self.read_quota
    }

    #[must_use]
    pub fn kmer_length(&self) -> usize {
        self.kmer_length
    }

    /// Effective minimum read length
    ///
    /// Never below the k-mer length, so every accepted read holds a full prefix.
    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length.max(self.kmer_length)
    }

    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Size of the symbol buffer (`kmer_length * read_quota`)
    #[must_use]
    pub fn capacity(&self) -> usize {
        // checked in `IngestConfigBuilder::build`
        self.kmer_length * self.read_quota
    }
}
impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            read_quota: DEFAULT_READ_QUOTA,
            kmer_length: DEFAULT_KMER_LENGTH,
            min_length: MIN_READ_LENGTH,
            policy: Policy::default(),
        }
    }
}

/// Builder for [`IngestConfig`]
///
/// Unset fields fall back to their defaults.
///
/// ```
/// use dnapack::{IngestConfigBuilder, Policy};
///
/// let config = IngestConfigBuilder::default()
///     .read_quota(500)
///     .kmer_length(21)
///     .policy(Policy::SkipRecord)
///     .build()
///     .unwrap();
/// assert_eq!(config.capacity(), 10_500);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestConfigBuilder {
    read_quota: Option<usize>,
    kmer_length: Option<usize>,
    min_length: Option<usize>,
    policy: Option<Policy>,
}
impl IngestConfigBuilder {
    #[must_use]
    pub fn read_quota(mut self, read_quota: usize) -> Self {
        self.read_quota = Some(read_quota);
        self
    }

    #[must_use]
    pub fn kmer_length(mut self, kmer_length: usize) -> Self {
        self.kmer_length = Some(kmer_length);
        self
    }

    #[must_use]
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Validates the parameters and builds the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The read quota is zero
    /// * The k-mer length is zero
    /// * `kmer_length * read_quota` overflows
    pub fn build(self) -> Result<IngestConfig> {
        let read_quota = self.read_quota.unwrap_or(DEFAULT_READ_QUOTA);
        let kmer_length = self.kmer_length.unwrap_or(DEFAULT_KMER_LENGTH);

        if read_quota == 0 {
            return Err(ConfigError::ZeroReadQuota.into());
        }
        if kmer_length == 0 {
            return Err(ConfigError::ZeroKmerLength.into());
        }
        if kmer_length.checked_mul(read_quota).is_none() {
            return Err(ConfigError::CapacityOverflow {
                kmer_length,
                read_quota,
            }
            .into());
        }

        Ok(IngestConfig {
            read_quota,
            kmer_length,
            min_length: self.min_length.unwrap_or(MIN_READ_LENGTH),
            policy: self.policy.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod testing {

    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let config = IngestConfigBuilder::default().build().unwrap();
        assert_eq!(config, IngestConfig::default());
        assert_eq!(config.capacity(), 32_000_000);
        assert_eq!(config.policy(), Policy::Abort);
    }

    #[test]
    fn test_zero_quota_rejected() {
        assert!(matches!(
            IngestConfig::new(0, 32),
            Err(Error::ConfigError(ConfigError::ZeroReadQuota))
        ));
    }

    #[test]
    fn test_zero_kmer_rejected() {
        assert!(matches!(
            IngestConfig::new(10, 0),
            Err(Error::ConfigError(ConfigError::ZeroKmerLength))
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            IngestConfig::new(usize::MAX, 2),
            Err(Error::ConfigError(ConfigError::CapacityOverflow { .. }))
        ));
    }

    #[test]
    fn test_min_length_follows_kmer() {
        let short = IngestConfig::new(1, 21).unwrap();
        assert_eq!(short.min_length(), MIN_READ_LENGTH);

        let long = IngestConfig::new(1, 50).unwrap();
        assert_eq!(long.min_length(), 50);
    }
}
