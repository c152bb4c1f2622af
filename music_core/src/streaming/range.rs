//! `Range` header parsing.
//!
//! Only a single `bytes=<start>-<end>` range is understood. Suffix ranges
//! (`bytes=-N`) and multi-range requests are rejected as malformed.

use std::fmt;

use crate::error::{AppError, Result};

const BYTES_UNIT: &str = "bytes=";

/// A syntactically valid range header that has not yet been checked against
/// a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRangeRequest {
    pub start: u64,
    pub end: Option<u64>,
}

/// Inclusive byte offsets satisfying `start <= end < size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: u64,
}

impl ByteRangeRequest {
    pub fn parse(header: &str) -> Result<Self> {
        let malformed = || AppError::MalformedRange(header.to_string());

        let spec = header.trim().strip_prefix(BYTES_UNIT).ok_or_else(malformed)?;

        if spec.contains(',') {
            return Err(AppError::MalformedRange(format!(
                "multiple ranges are not supported: {}",
                header
            )));
        }

        let (start, end) = spec.split_once('-').ok_or_else(malformed)?;

        let start = parse_offset(start).ok_or_else(malformed)?;
        let end = if end.is_empty() {
            None
        } else {
            Some(parse_offset(end).ok_or_else(malformed)?)
        };

        Ok(Self { start, end })
    }

    /// Checks the request against a resource of `size` bytes.
    pub fn resolve(self, size: u64) -> Result<RangeSpec> {
        if self.start >= size {
            return Err(AppError::RangeNotSatisfiable { size });
        }

        let end = self.end.unwrap_or(size - 1);
        if end >= size || self.start > end {
            return Err(AppError::RangeNotSatisfiable { size });
        }

        Ok(RangeSpec {
            start: self.start,
            end,
        })
    }
}

impl fmt::Display for ByteRangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "bytes={}-{}", self.start, end),
            None => write!(f, "bytes={}-", self.start),
        }
    }
}

impl RangeSpec {
    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

// `u64::from_str` accepts a leading `+`, which is not valid in a range.
fn parse_offset(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_closed_range() {
        let range = ByteRangeRequest::parse("bytes=100-199").unwrap();
        assert_eq!(range, ByteRangeRequest { start: 100, end: Some(199) });
    }

    #[test]
    fn test_parse_open_ended_range() {
        let range = ByteRangeRequest::parse("bytes=900-").unwrap();
        assert_eq!(range, ByteRangeRequest { start: 900, end: None });
        assert_eq!(range.resolve(1000).unwrap(), RangeSpec { start: 900, end: 999 });
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        let range = ByteRangeRequest::parse("  bytes=0-0 ").unwrap();
        assert_eq!(range, ByteRangeRequest { start: 0, end: Some(0) });
    }

    #[test]
    fn test_parse_rejects_malformed_headers() {
        let cases = [
            "",
            "bytes",
            "bytes=",
            "bytes=-",
            "bytes=-500",
            "items=0-10",
            "Bytes=0-10",
            "bytes=abc-10",
            "bytes=0-xyz",
            "bytes=+5-10",
            "bytes=0--10",
            "bytes=0-10-20",
            "bytes=10",
            "bytes= 0-10",
            "bytes=0-99,200-299",
            "bytes=99999999999999999999-",
        ];

        for header in cases {
            assert!(
                matches!(ByteRangeRequest::parse(header), Err(AppError::MalformedRange(_))),
                "{:?} should be malformed",
                header
            );
        }
    }

    #[test]
    fn test_resolve_rejects_out_of_bounds() {
        let size = 1000;

        let cases = [
            ByteRangeRequest { start: 1000, end: Some(1005) },
            ByteRangeRequest { start: 1000, end: None },
            ByteRangeRequest { start: 0, end: Some(1000) },
            ByteRangeRequest { start: 500, end: Some(499) },
        ];

        for range in cases {
            assert!(
                matches!(range.resolve(size), Err(AppError::RangeNotSatisfiable { size: 1000 })),
                "{} should be unsatisfiable",
                range
            );
        }
    }

    #[test]
    fn test_resolve_empty_resource() {
        let range = ByteRangeRequest { start: 0, end: None };
        assert!(matches!(
            range.resolve(0),
            Err(AppError::RangeNotSatisfiable { size: 0 })
        ));
    }

    #[test]
    fn test_range_spec_headers() {
        let spec = ByteRangeRequest::parse("bytes=100-199")
            .unwrap()
            .resolve(1000)
            .unwrap();

        assert_eq!(spec.content_length(), 100);
        assert_eq!(spec.content_range(1000), "bytes 100-199/1000");
    }

    #[test]
    fn test_single_byte_at_end() {
        let spec = ByteRangeRequest::parse("bytes=999-999")
            .unwrap()
            .resolve(1000)
            .unwrap();

        assert_eq!(spec.content_length(), 1);
        assert_eq!(spec.content_range(1000), "bytes 999-999/1000");
    }
}
