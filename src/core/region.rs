// src/core/region.rs

use thiserror::Error;

/// Errors raised when a span does not fit the buffer it was computed for.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegionError {
    #[error("Region bounds are inverted: start {start} lies past end {end}.")]
    Inverted { start: usize, end: usize },
    #[error("Region end {end} lies past the end of the buffer ({len} bytes).")]
    OutOfBounds { end: usize, len: usize },
    #[error("Region offset {offset} is not a character boundary.")]
    NotCharBoundary { offset: usize },
}

/// A half-open span `[start, end)` of byte offsets into a buffer.
///
/// A `Region` is only ever built through [`Region::new`], which checks the
/// span against the buffer it belongs to, so slicing through it afterwards
/// cannot panic as long as the same buffer is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    start: usize,
    end: usize,
}

impl Region {
    /// Validates `start <= end <= buffer.len()` and that both offsets fall
    /// on character boundaries of `buffer`.
    pub fn new(start: usize, end: usize, buffer: &str) -> Result<Self, RegionError> {
        if start > end {
            return Err(RegionError::Inverted { start, end });
        }
        if end > buffer.len() {
            return Err(RegionError::OutOfBounds {
                end,
                len: buffer.len(),
            });
        }
        for offset in [start, end] {
            if !buffer.is_char_boundary(offset) {
                return Err(RegionError::NotCharBoundary { offset });
            }
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The content of the span within `buffer`.
    ///
    /// `buffer` must be the string the region was created for.
    pub fn slice<'a>(&self, buffer: &'a str) -> &'a str {
        &buffer[self.start..self.end]
    }

    /// Rebuilds `buffer` with the span's content swapped for `replacement`.
    /// Everything outside the span is carried over byte for byte.
    pub fn splice(&self, buffer: &str, replacement: &str) -> String {
        let mut rebuilt =
            String::with_capacity(buffer.len() - self.len() + replacement.len());
        rebuilt.push_str(&buffer[..self.start]);
        rebuilt.push_str(replacement);
        rebuilt.push_str(&buffer[self.end..]);
        rebuilt
    }
}
