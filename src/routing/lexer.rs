//! Bidirectional path rewriting for URI based matchers.
//!
//! A lexer strips the siteaccess-identifying prefix from an inbound path
//! (`analyse_uri`) and re-inserts it into an outbound one (`analyse_link`).
//! Host and port matchers have no lexer: their siteaccess lives outside
//! the path.

use std::fmt::Debug;
use std::sync::Arc;

/// Path rewriting capability exposed by some matchers.
pub trait UriLexer: Send + Sync + Debug {
    /// Strip the siteaccess segment(s), producing the semantic path.
    fn analyse_uri(&self, path: &str) -> String;

    /// Re-insert the siteaccess segment(s) into a semantic path.
    fn analyse_link(&self, path: &str) -> String;
}

/// Lexer for a fixed leading prefix such as `/first_sa` or `/test/foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixLexer {
    prefix: String,
}

impl PrefixLexer {
    /// Build from the matched segments, e.g. `["test", "foo"]` -> `/test/foo`.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefix = String::new();
        for segment in segments {
            prefix.push('/');
            prefix.push_str(segment.as_ref());
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl UriLexer for PrefixLexer {
    fn analyse_uri(&self, path: &str) -> String {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.to_string(),
            _ => path.to_string(),
        }
    }

    fn analyse_link(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.prefix, path)
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }
}

/// Ordered composition of child lexers.
///
/// `analyse_uri` applies the children in declaration order, `analyse_link`
/// in reverse.
#[derive(Debug, Clone)]
pub struct CompoundLexer {
    lexers: Vec<Arc<dyn UriLexer>>,
}

impl CompoundLexer {
    /// Collapse a list of child lexers: none gives `None`, one is returned as is.
    pub fn compose(mut lexers: Vec<Arc<dyn UriLexer>>) -> Option<Arc<dyn UriLexer>> {
        match lexers.len() {
            0 => None,
            1 => lexers.pop(),
            _ => Some(Arc::new(Self { lexers })),
        }
    }
}

impl UriLexer for CompoundLexer {
    fn analyse_uri(&self, path: &str) -> String {
        self.lexers
            .iter()
            .fold(path.to_string(), |path, lexer| lexer.analyse_uri(&path))
    }

    fn analyse_link(&self, path: &str) -> String {
        self.lexers
            .iter()
            .rev()
            .fold(path.to_string(), |path, lexer| lexer.analyse_link(&path))
    }
}
