//! DOS 8.3 short filename allocation.
//!
//! Staged files end up in a flat directory that is read by 16-bit setup
//! engines, so every file gets a unique 8.3 name derived from its long name.
//!
//! # Algorithm
//!
//! 1. Split the long name into base and extension (the extension keeps its dot)
//! 2. Replace every character outside `[A-Za-z0-9_~-]` with `_` and uppercase
//!    (the extension additionally keeps its leading `.`)
//! 3. Attempt 0: first 8 base characters + first 4 extension characters
//! 4. Attempt `n`: first `7 - len(n)` base characters + `~n` + extension
//!
//! Attempts continue until a name is found that is neither reserved nor
//! previously allocated.

use std::collections::HashSet;

/// Allocates unique 8.3 names within one output namespace.
///
/// A name returned by [`allocate`](Self::allocate) or passed to
/// [`reserve`](Self::reserve) is never handed out again by the same instance.
#[derive(Debug, Clone, Default)]
pub struct ShortNameAllocator {
    taken: HashSet<String>,
}

impl ShortNameAllocator {
    /// Creates an allocator with an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with the given names already reserved.
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allocator = Self::new();
        for name in names {
            allocator.reserve(name.as_ref());
        }
        allocator
    }

    /// Reserves a name without allocating it.
    ///
    /// Names are compared case-insensitively, as on a FAT volume.
    /// Returns `false` if the name was already taken.
    pub fn reserve(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_ascii_uppercase())
    }

    /// Returns whether `name` is reserved or already allocated.
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_ascii_uppercase())
    }

    /// Allocates a unique short name for `long_name`.
    ///
    /// `long_name` is a bare file name; directory components are not stripped.
    pub fn allocate(&mut self, long_name: &str) -> String {
        let (base, extension) = split_extension(long_name);

        let mut attempt = 0u32;
        let mut candidate = make_short_name(base, extension, attempt);
        while self.is_taken(&candidate) {
            attempt += 1;
            candidate = make_short_name(base, extension, attempt);
        }

        log::debug!("Allocated short name {} for {}", candidate, long_name);
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Builds the 8.3 candidate for one allocation attempt.
///
/// `extension` includes its leading dot (or is empty). An empty `base`
/// yields a name without a base part, e.g. `~1.TXT`.
pub fn make_short_name(base: &str, extension: &str, attempt: u32) -> String {
    let base = sanitize(base, false);
    let extension = sanitize(extension, true);
    let extension: String = extension.chars().take(4).collect();

    if attempt == 0 {
        let base: String = base.chars().take(8).collect();
        format!("{base}{extension}")
    } else {
        let number = attempt.to_string();
        let keep = 7usize.saturating_sub(number.len());
        let base: String = base.chars().take(keep).collect();
        format!("{base}~{number}{extension}")
    }
}

/// Splits a file name into base and extension.
///
/// Leading dots belong to the base, so `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => name.split_at(dot),
        _ => (name, ""),
    }
}

fn sanitize(part: &str, keep_dot: bool) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '~' | '-') || (keep_dot && c == '.') {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
