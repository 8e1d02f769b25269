//! Lenient version numbers for toolchain releases.
//!
//! Toolchains don't agree on a version scheme: go publishes `1.22.3` and
//! `1.21rc2`, python publishes `3.12.0` and `3.13.0b1`. [`Version`] accepts all
//! of those and orders them the way a human would, with pre-releases sorting
//! before the release they precede.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Malformed version number string {version}")]
    MalformedVersion { version: String },
    #[error("Invalid segment in version: {segment}")]
    InvalidSegment { segment: String },
    #[error("Version cannot contain newlines: {version}")]
    ContainsNewlines { version: String },
    #[error("Version cannot contain consecutive dots: {version}")]
    ConsecutiveDots { version: String },
    #[error("Version cannot be empty")]
    Empty,
    #[error("Version must start with a number: {version}")]
    NoLeadingNumber { version: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionSegment {
    Number(u64),
    String(String),
}

impl VersionSegment {
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Number(0))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl std::fmt::Display for VersionSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionSegment::Number(n) => write!(f, "{n}"),
            VersionSegment::String(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Eq)]
pub struct Version {
    /// The version exactly as it was written, minus surrounding whitespace.
    pub version: String,
    pub segments: Vec<VersionSegment>,
}

impl Version {
    pub fn new(version: impl AsRef<str>) -> Result<Self, VersionError> {
        let normalized = Self::normalize_version(version.as_ref())?;
        let segments = Self::parse_segments(&normalized)?;
        Ok(Self {
            version: normalized,
            segments,
        })
    }

    fn normalize_version(version: &str) -> Result<String, VersionError> {
        match version.trim() {
            "" => Err(VersionError::Empty),

            v if v.lines().count() > 1 => Err(VersionError::ContainsNewlines { version: v.into() }),
            v if v.contains("..") => Err(VersionError::ConsecutiveDots { version: v.into() }),

            // Every toolchain we know of starts its versions with a number.
            v if !v.starts_with(|c: char| c.is_ascii_digit()) => {
                Err(VersionError::NoLeadingNumber { version: v.into() })
            }

            v if v.ends_with('.') || v.contains(char::is_whitespace) => {
                Err(VersionError::MalformedVersion { version: v.into() })
            }

            v => Ok(v.into()),
        }
    }

    fn parse_segments(version: &str) -> Result<Vec<VersionSegment>, VersionError> {
        let mut segments = Vec::new();

        for (index, chunk) in version.split('-').enumerate() {
            if index > 0 {
                // Dash indicates prerelease, add "pre" marker
                segments.push(VersionSegment::String("pre".to_string()));
            }
            for part in chunk.split('.').filter(|part| !part.is_empty()) {
                Self::parse_segment(part, &mut segments)?;
            }
        }

        Ok(segments)
    }

    /// Parses one dot-separated part. A part like `21rc2` is split into the
    /// number `21` and the pre-release tag `rc2`.
    fn parse_segment(part: &str, segments: &mut Vec<VersionSegment>) -> Result<(), VersionError> {
        if !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(VersionError::InvalidSegment {
                segment: part.to_string(),
            });
        }

        let digits = part
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(part.len());
        let (number, tag) = part.split_at(digits);

        if !number.is_empty() {
            let number = number.parse::<u64>().map_err(|_| VersionError::InvalidSegment {
                segment: part.to_string(),
            })?;
            segments.push(VersionSegment::Number(number));
        }
        if !tag.is_empty() {
            segments.push(VersionSegment::String(tag.to_string()));
        }

        Ok(())
    }

    pub fn is_prerelease(&self) -> bool {
        self.segments.iter().any(|seg| seg.is_string())
    }

    pub fn canonical_segments(&self) -> Vec<VersionSegment> {
        // Step 1: Split on the first string segment
        let index = self
            .segments
            .iter()
            .position(|s| s.is_string())
            .unwrap_or(self.segments.len());

        let parts: [_; 2] = self.segments.split_at(index).into();

        // Step 2: seek behind from each tail and remove contigous zero chains.
        parts
            .iter()
            .flat_map(|part| {
                let mut part = part.to_vec();
                let last_nonzero_index = part.iter().rposition(|s| !s.is_zero()).unwrap_or(0);
                part.truncate(1 + last_nonzero_index); // `1 +` to keep at least one element.
                part
            })
            .collect::<Vec<_>>()
    }

    fn split_alphanumeric(s: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut last_was_digit = false;

        for ch in s.chars() {
            let is_digit = ch.is_ascii_digit();

            if !current.is_empty() && last_was_digit != is_digit {
                parts.push(current.clone());
                current.clear();
            }

            current.push(ch);
            last_was_digit = is_digit;
        }

        if !current.is_empty() {
            parts.push(current);
        }

        parts
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_segments() == other.canonical_segments()
    }
}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_segments().hash(state);
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        let self_segments = self.canonical_segments();
        let other_segments = other.canonical_segments();

        let max_len = self_segments.len().max(other_segments.len());

        for i in 0..max_len {
            let self_seg = self_segments.get(i).unwrap_or(&VersionSegment::Number(0));
            let other_seg = other_segments.get(i).unwrap_or(&VersionSegment::Number(0));

            match (self_seg, other_seg) {
                (VersionSegment::Number(a), VersionSegment::Number(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    other => return other,
                },
                (VersionSegment::Number(_), VersionSegment::String(_)) => return Ordering::Greater,
                (VersionSegment::String(_), VersionSegment::Number(_)) => return Ordering::Less,
                (VersionSegment::String(a), VersionSegment::String(b)) => {
                    // Tags like "rc10" vs "rc9" compare their numeric tails numerically.
                    let a_parts = Self::split_alphanumeric(a);
                    let b_parts = Self::split_alphanumeric(b);

                    for (a_part, b_part) in a_parts.iter().zip(b_parts.iter()) {
                        match (a_part.parse::<u64>(), b_part.parse::<u64>()) {
                            (Ok(num_a), Ok(num_b)) => match num_a.cmp(&num_b) {
                                Ordering::Equal => continue,
                                other => return other,
                            },
                            _ => match a_part.cmp(b_part) {
                                Ordering::Equal => continue,
                                other => return other,
                            },
                        }
                    }

                    match a_parts.len().cmp(&b_parts.len()) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }

        Ordering::Equal
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, VersionError> {
        Version::new(s)
    }
}
