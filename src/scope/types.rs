/// Scope type definition and validation
///
/// Provides the core Scope type with separator-aware decomposition into
/// its ordered ancestor prefix chain.

use std::fmt;

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors that can occur while parsing a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// Empty scope string provided
    EmptyScope,
    /// Scope string leads with the separator
    LeadingSeparator {
        /// The offending scope string
        scope: String,
        /// The configured separator
        separator: String,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScope => write!(f, "Scope cannot be empty"),
            Self::LeadingSeparator { scope, separator } => {
                write!(f, "{} leads with separator \"{}\"", scope, separator)
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// A validated hierarchical scope
///
/// Splitting the scope string on the configured separator yields its
/// ordered segments; joining them back up cumulatively yields the ancestor
/// chain from most-general to most-specific, the full scope always last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Original scope string
    raw: String,
    /// Parsed segments
    segments: Vec<String>,
    /// Separator the scope was parsed with
    separator: String,
}

impl Scope {
    /// Parse and validate a scope against a separator
    ///
    /// Fails if `raw` is empty or starts with `separator`; every write or
    /// read accepting a caller-supplied scope goes through here first.
    pub fn parse(raw: &str, separator: &str) -> ScopeResult<Self> {
        if raw.is_empty() {
            return Err(ScopeError::EmptyScope);
        }
        if raw.starts_with(separator) {
            return Err(ScopeError::LeadingSeparator {
                scope: raw.to_string(),
                separator: separator.to_string(),
            });
        }

        let segments = raw.split(separator).map(str::to_string).collect();

        Ok(Self {
            raw: raw.to_string(),
            segments,
            separator: separator.to_string(),
        })
    }

    /// Returns the raw scope string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the segments of this scope
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the depth of this scope (number of segments)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the ancestor prefix chain, least to most specific
    ///
    /// `admin::user::create` yields
    /// `["admin", "admin::user", "admin::user::create"]`. The chain has no
    /// duplicates because segments are joined in order without
    /// re-combination, and the full scope is always the last entry.
    pub fn prefix_chain(&self) -> Vec<String> {
        let mut chain = Vec::with_capacity(self.segments.len());
        let mut level = String::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                level.push_str(&self.separator);
            }
            level.push_str(segment);
            chain.push(level.clone());
        }

        chain
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
