//! The 26-letter alphabet every stage works in, the normalisation that projects
//! free text onto it, and [`LetterCounts`], a fixed-size letter multiset.

use std::fmt;
use std::ops::Index;
#[cfg(test)]
use std::ops::RangeInclusive;

// Character-set constants
pub const ALPHABET_SIZE: usize = 26;
#[cfg(test)]
pub(crate) const LOWERCASE_ALPHABET: RangeInclusive<char> = 'a'..='z';
#[cfg(test)]
pub(crate) const UPPERCASE_ALPHABET: RangeInclusive<char> = 'A'..='Z';

pub trait AcrosticChar {
    /// Position of this character in `a..=z`, or `None` if it is not a lowercase ASCII letter.
    fn letter_index(&self) -> Option<usize>;
    fn is_letter(&self) -> bool;
}

impl AcrosticChar for char {
    fn letter_index(&self) -> Option<usize> {
        if self.is_letter() {
            Some(*self as usize - 'a' as usize)
        } else {
            None
        }
    }
    fn is_letter(&self) -> bool {
        self.is_ascii_lowercase()
    }
}

/// The letter at alphabet position `idx` (0 → 'a').
pub(crate) fn letter_at(idx: usize) -> char {
    debug_assert!(idx < ALPHABET_SIZE, "letter index {idx} out of range");
    (b'a' + idx as u8) as char
}

/// Lowercase `s` and drop everything that is not `a`-`z`.
///
/// ```
/// use acrostic::letters::alpha_only;
/// assert_eq!(alpha_only("Ask not what your country..."), "asknotwhatyourcountry");
/// ```
#[must_use]
pub fn alpha_only(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_letter())
        .collect()
}

/// A multiset over `a..=z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LetterCounts([u32; ALPHABET_SIZE]);

impl LetterCounts {
    /// Count the lowercase letters of `s`; any other character is ignored.
    #[must_use]
    pub fn from_alpha(s: &str) -> Self {
        s.chars().collect()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Count for `letter`; zero for anything outside `a..=z`.
    #[must_use]
    pub fn get(&self, letter: char) -> u32 {
        letter.letter_index().map_or(0, |i| self.0[i])
    }

    /// True if every letter of `self` is available in `pool` (sub-multiset test).
    #[must_use]
    pub fn fits_within(&self, pool: &LetterCounts) -> bool {
        self.0.iter().zip(pool.0.iter()).all(|(need, have)| need <= have)
    }

    /// Remove one copy of the letter at `idx`. Returns `false` (and leaves the
    /// count at zero) if there was nothing to remove.
    pub fn take(&mut self, idx: usize) -> bool {
        if self.0[idx] > 0 {
            self.0[idx] -= 1;
            true
        } else {
            false
        }
    }

    /// Remove `other` from `self`. Caller guarantees `other.fits_within(self)`.
    pub(crate) fn subtract(&mut self, other: &LetterCounts) {
        debug_assert!(other.fits_within(self), "cannot subtract {other} from {self}");
        for (have, need) in self.0.iter_mut().zip(other.0.iter()) {
            *have -= need;
        }
    }

    pub(crate) fn add(&mut self, other: &LetterCounts) {
        for (have, extra) in self.0.iter_mut().zip(other.0.iter()) {
            *have += extra;
        }
    }

    pub(crate) fn increment(&mut self, idx: usize) {
        self.0[idx] += 1;
    }

    /// `(letter, count)` for every letter with a non-zero count, in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .map(|(i, &n)| (letter_at(i), n))
    }

    #[must_use]
    pub fn as_array(&self) -> &[u32; ALPHABET_SIZE] {
        &self.0
    }
}

impl Index<usize> for LetterCounts {
    type Output = u32;

    fn index(&self, idx: usize) -> &u32 {
        &self.0[idx]
    }
}

impl FromIterator<char> for LetterCounts {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut counts = LetterCounts::default();
        for idx in iter.into_iter().filter_map(|c| c.letter_index()) {
            counts.increment(idx);
        }
        counts
    }
}

impl fmt::Display for LetterCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(c, n)| format!("{c}:{n}")).collect();
        write!(f, "{{{}}}", parts.join(" "))
    }
}
