use std::str::FromStr;

use crate::error::WalkError;

/// Inclusive depth bounds parsed from `-n min,max`.
///
/// A `None` bound is unset. At filter time an unset bound takes the depth of
/// the entry being tested, so it never excludes anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl DepthRange {
    /// No depth filtering.
    pub const UNBOUNDED: DepthRange = DepthRange { min: None, max: None };

    /// Parse a `"min,max"` specification.
    ///
    /// ```rust
    /// use pwalk::DepthRange;
    ///
    /// assert_eq!(DepthRange::parse("").unwrap(), DepthRange::UNBOUNDED);
    /// assert_eq!(DepthRange::parse("3").unwrap(), DepthRange { min: Some(0), max: Some(3) });
    /// assert_eq!(DepthRange::parse("2,").unwrap(), DepthRange { min: Some(2), max: None });
    /// assert_eq!(DepthRange::parse(",4").unwrap(), DepthRange { min: None, max: Some(4) });
    /// assert!(DepthRange::parse("1,2,3").is_err());
    /// ```
    pub fn parse(spec: &str) -> Result<Self, WalkError> {
        if spec.is_empty() {
            return Ok(Self::UNBOUNDED);
        }

        let parts: Vec<&str> = spec.split(',').collect();
        match parts.as_slice() {
            [max] => Ok(Self {
                min: Some(0),
                max: Some(bound(spec, max)?),
            }),
            [min, max] => Ok(Self {
                min: optional_bound(spec, min)?,
                max: optional_bound(spec, max)?,
            }),
            _ => Err(WalkError::InvalidRange(spec.to_string())),
        }
    }

    /// Whether `depth` falls inside the range.
    pub fn admits(&self, depth: usize) -> bool {
        !self.below_min(depth) && !self.above_max(depth)
    }

    pub fn below_min(&self, depth: usize) -> bool {
        self.min.is_some_and(|min| (depth as i64) < min)
    }

    pub fn above_max(&self, depth: usize) -> bool {
        self.max.is_some_and(|max| (depth as i64) > max)
    }

    /// The deepest level a walker needs to visit. `None` means unlimited.
    ///
    /// A negative max still needs the root visited so it can be rejected by
    /// [`admits`](Self::admits).
    pub fn descend_limit(&self) -> Option<usize> {
        self.max.map(|max| usize::try_from(max).unwrap_or(0))
    }
}

impl FromStr for DepthRange {
    type Err = WalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn bound(spec: &str, part: &str) -> Result<i64, WalkError> {
    part.parse::<i64>()
        .map_err(|_| WalkError::InvalidRange(spec.to_string()))
}

fn optional_bound(spec: &str, part: &str) -> Result<Option<i64>, WalkError> {
    if part.is_empty() {
        Ok(None)
    } else {
        bound(spec, part).map(Some)
    }
}
