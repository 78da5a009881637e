/*
 * Responsibility
 * - `/pm/:path*` 形式のパターンを segment 単位で解釈・照合する
 * - 公開ページ (exact / subtree) の判定
 *
 * Notes
 * - 文字列の前方一致は使わない: `/pm/login-something` は `/pm/login` の子ではない
 * - 末尾の `/` は 1 つだけ無視する。途中の空 segment はそのまま残す
 */
use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    NotAbsolute(String),
    #[error("empty segment in pattern: {0}")]
    EmptySegment(String),
    #[error("unnamed parameter in pattern: {0}")]
    UnnamedParam(String),
    #[error("wildcard must be the last segment: {0}")]
    WildcardNotLast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    // `:name`, exactly one non-empty segment
    Param,
    // `:name*`, zero or more segments
    Rest,
}

/// Route template such as `/pm/:path*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let raw = template
            .strip_prefix('/')
            .ok_or_else(|| PatternError::NotAbsolute(template.to_string()))?;

        let parts: Vec<&str> = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split('/').collect()
        };

        let mut segments = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                None if part.is_empty() => {
                    return Err(PatternError::EmptySegment(template.to_string()));
                }
                None => Segment::Static(part.to_string()),
                Some(name) => {
                    let (name, rest) = match name.strip_suffix('*') {
                        Some(n) => (n, true),
                        None => (name, false),
                    };
                    if name.is_empty() {
                        return Err(PatternError::UnnamedParam(template.to_string()));
                    }
                    if rest && i + 1 != parts.len() {
                        return Err(PatternError::WildcardNotLast(template.to_string()));
                    }
                    if rest { Segment::Rest } else { Segment::Param }
                }
            };
            segments.push(segment);
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn matches(&self, path: &str) -> bool {
        let Some(actual) = path_segments(path) else {
            return false;
        };
        let mut actual = actual.into_iter();

        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => match actual.next() {
                    Some(s) if !s.is_empty() => {}
                    _ => return false,
                },
                Segment::Static(expected) => {
                    if actual.next() != Some(expected.as_str()) {
                        return false;
                    }
                }
            }
        }

        actual.next().is_none()
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScope {
    /// Only the page itself.
    Exact,
    /// The page and every path-segment descendant.
    Subtree,
}

/// Page reachable without authentication even though it sits under a gated pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPage {
    path: String,
    scope: PageScope,
}

impl PublicPage {
    pub fn exact(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scope: PageScope::Exact,
        }
    }

    pub fn subtree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scope: PageScope::Subtree,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scope(&self) -> PageScope {
        self.scope
    }

    pub fn covers(&self, path: &str) -> bool {
        let (Some(page), Some(actual)) = (path_segments(&self.path), path_segments(path)) else {
            return false;
        };

        match self.scope {
            PageScope::Exact => actual == page,
            PageScope::Subtree => actual.starts_with(&page),
        }
    }
}

/// Splits an absolute path into segments. `None` for relative input.
pub(crate) fn path_segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    Some(rest.split('/').collect())
}
