//! Exact byte-pattern search over raw image buffers.
//!
//! Signatures are matched verbatim, including embedded zero bytes from
//! UTF-16 text, so nothing here treats the buffer as a C string. The
//! searcher is a Boyer-Moore-Horspool scan: a 256-entry bad-character
//! table is built once per pattern and windows are compared right to left.

pub mod pattern;

pub use pattern::{parse_hex_pattern, PatternError};

/// A compiled Horspool searcher for one pattern.
///
/// Building the shift table is the only setup cost; the finder can then be
/// reused across any number of buffers. It never mutates its inputs.
#[derive(Clone)]
pub struct Finder<'n> {
    needle: &'n [u8],
    skip: [usize; 256],
}

impl<'n> Finder<'n> {
    pub fn new(needle: &'n [u8]) -> Self {
        let mut skip = [needle.len(); 256];
        if let Some(last) = needle.len().checked_sub(1) {
            for (i, &b) in needle[..last].iter().enumerate() {
                skip[b as usize] = last - i;
            }
        }
        Self { needle, skip }
    }

    /// Lowest offset at which the pattern occurs in `haystack`.
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        self.find_from(haystack, 0)
    }

    /// Lowest offset `>= start` at which the pattern occurs.
    ///
    /// An empty pattern, an empty haystack, a start past the end, or a
    /// pattern longer than the remaining bytes all yield `None`.
    pub fn find_from(&self, haystack: &[u8], start: usize) -> Option<usize> {
        let n = self.needle.len();
        if n == 0 || start >= haystack.len() {
            return None;
        }
        let last = n - 1;
        let mut pos = start;
        while haystack.len() - pos >= n {
            let window = &haystack[pos..pos + n];
            let mut i = last;
            while window[i] == self.needle[i] {
                if i == 0 {
                    return Some(pos);
                }
                i -= 1;
            }
            pos += self.skip[window[last] as usize];
        }
        None
    }

    /// Whether the pattern occurs anywhere in `haystack`.
    pub fn is_present(&self, haystack: &[u8]) -> bool {
        self.find(haystack).is_some()
    }

    /// Every occurrence, overlapping ones included, in ascending order.
    pub fn find_iter<'f, 'h>(&'f self, haystack: &'h [u8]) -> FindIter<'f, 'n, 'h> {
        FindIter {
            finder: self,
            haystack,
            next_start: 0,
        }
    }

    /// Number of occurrences, overlapping ones included.
    pub fn count(&self, haystack: &[u8]) -> usize {
        self.find_iter(haystack).count()
    }
}

impl std::fmt::Debug for Finder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("needle", &hex::encode(self.needle))
            .finish()
    }
}

/// Iterator over successive matches; each search resumes at `match + 1`.
pub struct FindIter<'f, 'n, 'h> {
    finder: &'f Finder<'n>,
    haystack: &'h [u8],
    next_start: usize,
}

impl Iterator for FindIter<'_, '_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = self.finder.find_from(self.haystack, self.next_start)?;
        self.next_start = found + 1;
        Some(found)
    }
}

/// Lowest offset at which `needle` occurs in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    Finder::new(needle).find(haystack)
}

/// Lowest offset `>= start` at which `needle` occurs in `haystack`.
pub fn find_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    Finder::new(needle).find_from(haystack, start)
}

/// Number of (possibly overlapping) occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    Finder::new(needle).count(haystack)
}
