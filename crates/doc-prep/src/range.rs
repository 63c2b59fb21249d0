use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{DocPrepError, Result};

/// Inclusive, 1-based page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn full(total: u32) -> Self {
        Self::new(1, total)
    }

    /// Checks the range against a document of `total` pages.
    pub fn validate(&self, total: u32) -> Result<()> {
        if self.start > self.end {
            return Err(DocPrepError::InvalidRange(format!(
                "start page {} is after end page {}",
                self.start, self.end
            )));
        }
        if self.start < 1 {
            return Err(DocPrepError::InvalidRange(
                "pages are numbered from 1".to_string(),
            ));
        }
        if self.end > total {
            return Err(DocPrepError::InvalidRange(format!(
                "end page {} exceeds document length of {} pages",
                self.end, total
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> u32 {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages().contains(&page)
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Accepts `3-7` or a single page `5`.
impl FromStr for PageRange {
    type Err = DocPrepError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| DocPrepError::InvalidRange(format!("'{}' is not a page number", part.trim())))
        };
        match s.split_once('-') {
            Some((start, end)) => Ok(Self::new(parse(start)?, parse(end)?)),
            None => {
                let page = parse(s)?;
                Ok(Self::new(page, page))
            }
        }
    }
}
