//! Checkpoint file names and the retention rule.
//!
//! OOMMF's time driver writes magnetisation snapshots as
//! `<prefix>-Oxs_TimeDriver-Magnetization-<9-digit seq>-<7-digit sub-seq>.omf`.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PruneError, ValidationError};

/// Project prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "dmi_paper";

/// Sequence numbers parsed from a checkpoint file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckpointName {
    pub seq: u64,
    pub sub_seq: u64,
}

/// Matcher for one project's checkpoint file names.
#[derive(Debug, Clone)]
pub struct CheckpointPattern {
    prefix: String,
    regex: Regex,
}

impl CheckpointPattern {
    /// Compiles the matcher for `prefix`. The prefix is matched literally.
    ///
    /// # Errors
    ///
    /// Returns `PruneError::Pattern` if the compiled expression is rejected.
    pub fn new(prefix: impl Into<String>) -> Result<Self, PruneError> {
        let prefix = prefix.into();
        let regex = Regex::new(&format!(
            r"^{}-Oxs_TimeDriver-Magnetization-(\d{{9}})-(\d{{7}})\.omf$",
            regex::escape(&prefix)
        ))?;
        Ok(Self { prefix, regex })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parses a file name, or returns `None` if it is not a checkpoint.
    #[must_use]
    pub fn parse(&self, file_name: &str) -> Option<CheckpointName> {
        let caps = self.regex.captures(file_name)?;
        let seq = caps.get(1)?.as_str().parse().ok()?;
        let sub_seq = caps.get(2)?.as_str().parse().ok()?;
        Some(CheckpointName { seq, sub_seq })
    }

    /// Formats the file name for a sequence pair.
    #[must_use]
    pub fn file_name(&self, seq: u64, sub_seq: u64) -> String {
        format!(
            "{}-Oxs_TimeDriver-Magnetization-{seq:09}-{sub_seq:07}.omf",
            self.prefix
        )
    }
}

/// Retention stride: keep every Nth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Stride(NonZeroU64);

impl Stride {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidStride` for zero.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidStride {
                value: value.to_string(),
            })
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// The retention rule: keep sequence 0 and every sequence whose
    /// successor is a multiple of the stride.
    #[must_use]
    pub fn keeps(self, seq: u64) -> bool {
        seq == 0 || seq.checked_add(1).is_some_and(|n| n % self.get() == 0)
    }
}

impl TryFrom<u64> for Stride {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stride> for u64 {
    fn from(stride: Stride) -> Self {
        stride.get()
    }
}

impl FromStr for Stride {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidStride {
                value: trimmed.to_string(),
            })?;
        Self::new(value)
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_name() {
        let pattern = CheckpointPattern::new("dmi_paper").unwrap();
        let parsed = pattern
            .parse("dmi_paper-Oxs_TimeDriver-Magnetization-000000499-0001234.omf")
            .unwrap();
        assert_eq!(parsed, CheckpointName { seq: 499, sub_seq: 1234 });
    }

    #[test]
    fn test_parse_rejects_near_misses() {
        let pattern = CheckpointPattern::new("dmi_paper").unwrap();
        for name in [
            "other-Oxs_TimeDriver-Magnetization-000000001-0000001.omf",
            "dmi_paper-Oxs_TimeDriver-Magnetization-00000001-0000001.omf",
            "dmi_paper-Oxs_TimeDriver-Magnetization-000000001-000001.omf",
            "dmi_paper-oxs_timedriver-magnetization-000000001-0000001.omf",
            "dmi_paper-Oxs_TimeDriver-Magnetization-000000001-0000001.omf.bak",
            "dmi_paper-Oxs_TimeDriver-Magnetization-000000001-0000001.ovf",
        ] {
            assert!(pattern.parse(name).is_none(), "{name} should not match");
        }
    }

    #[test]
    fn test_prefix_matched_literally() {
        let pattern = CheckpointPattern::new("run.1").unwrap();
        assert!(pattern
            .parse("run.1-Oxs_TimeDriver-Magnetization-000000000-0000000.omf")
            .is_some());
        assert!(pattern
            .parse("runX1-Oxs_TimeDriver-Magnetization-000000000-0000000.omf")
            .is_none());
    }

    #[test]
    fn test_file_name_round_trips_through_parse() {
        let pattern = CheckpointPattern::new(DEFAULT_PREFIX).unwrap();
        let name = pattern.file_name(42, 7);
        assert_eq!(
            name,
            "dmi_paper-Oxs_TimeDriver-Magnetization-000000042-0000007.omf"
        );
        assert_eq!(pattern.parse(&name), Some(CheckpointName { seq: 42, sub_seq: 7 }));
    }

    #[test]
    fn test_stride_rejects_zero() {
        assert!(matches!(
            Stride::new(0),
            Err(ValidationError::InvalidStride { .. })
        ));
        assert!("abc".parse::<Stride>().is_err());
        assert!("-3".parse::<Stride>().is_err());
        assert_eq!(" 500 ".parse::<Stride>().unwrap().get(), 500);
    }

    #[test]
    fn test_retention_rule() {
        let stride = Stride::new(500).unwrap();
        let kept: Vec<u64> = (0..1000).filter(|&s| stride.keeps(s)).collect();
        assert_eq!(kept, vec![0, 499, 999]);
    }

    #[test]
    fn test_stride_one_keeps_everything() {
        let stride = Stride::new(1).unwrap();
        assert!((0..50).all(|s| stride.keeps(s)));
    }

    #[test]
    fn test_retention_rule_at_sequence_limit() {
        assert!(!Stride::new(2).unwrap().keeps(u64::MAX));
        assert!(Stride::new(2).unwrap().keeps(u64::MAX - 1));
    }

    #[test]
    fn test_stride_serde() {
        let stride: Stride = serde_json::from_str("25").unwrap();
        assert_eq!(stride.get(), 25);
        assert!(serde_json::from_str::<Stride>("0").is_err());
        assert_eq!(serde_json::to_string(&stride).unwrap(), "25");
    }
}
