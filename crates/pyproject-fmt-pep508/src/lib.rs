//! A library for python [dependency specifiers](https://packaging.python.org/en/latest/specifications/dependency-specifiers/),
//! better known as [PEP 508](https://peps.python.org/pep-0508/)
//!
//! ## Usage
//!
//! ```
//! use std::str::FromStr;
//! use pep508_rs::Requirement;
//!
//! let requirement = r#"requests [security,tests] >= 2.8.1, == 2.8.* ; python_version > "3.8""#;
//! let requirement = Requirement::from_str(requirement).unwrap();
//! assert_eq!(requirement.name, "requests");
//! assert_eq!(requirement.extras, Some(vec!["security".to_string(), "tests".to_string()]));
//! ```
//!
//! Unlike the published `pep508_rs` crate, this one never evaluates a marker against a live
//! environment: a `pyproject.toml` formatter only ever needs to parse a dependency specifier,
//! inspect its pieces and print it back out with normalized quoting.

#![deny(missing_docs)]

mod cursor;
mod marker;
mod verbatim_url;

use std::fmt::{Display, Formatter};
use std::str::{Chars, FromStr};

use pep440_rs::{VersionSpecifier, VersionSpecifierParseError, VersionSpecifiers};

pub use marker::{MarkerExpression, MarkerOperator, MarkerTree, MarkerValue, MarkerValueString, MarkerValueVersion};
pub use verbatim_url::VerbatimUrl;

use cursor::Cursor;

/// Error with a span attached so the caller can underline the offending part of the input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Pep508Error {
    /// Either an error from our own parser or an upstream error from the `url` crate.
    pub message: Pep508ErrorSource,
    /// Span start index (byte offset into `input`).
    pub start: usize,
    /// Span length in bytes.
    pub len: usize,
    /// The input string, so the error can print it underlined.
    pub input: String,
}

impl Display for Pep508Error {
    /// Pretty formatting with underline, e.g.:
    /// ```text
    /// Expected end of input, found ')'
    /// numpy >= 1.19)
    ///              ^
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let underline_start = self.input[..self.start].chars().count();
        let underline_len = self.input[self.start..self.start + self.len].chars().count().max(1);
        write!(
            f,
            "{}\n{}\n{}{}",
            self.message,
            self.input,
            " ".repeat(underline_start),
            "^".repeat(underline_len)
        )
    }
}

impl std::error::Error for Pep508Error {}

/// Either an error string from our parser or an upstream error from `url`.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Pep508ErrorSource {
    /// An error from our own parser.
    String(String),
    /// A URL parsing error.
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
}

impl Display for Pep508ErrorSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(string) => string.fmt(f),
            Self::UrlError(parse_err) => parse_err.fmt(f),
        }
    }
}

/// A PEP 508 dependency specification.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Requirement {
    /// The distribution name, e.g. `requests` in
    /// `requests [security,tests] >= 2.8.1, == 2.8.* ; python_version > "3.8"`
    pub name: String,
    /// The list of extras, e.g. `security`, `tests` above.
    pub extras: Option<Vec<String>>,
    /// The version specifier set or URL, e.g. `>= 2.8.1, == 2.8.*` above.
    pub version_or_url: Option<VersionOrUrl>,
    /// The marker expression, e.g. `python_version > "3.8"` above.
    pub marker: Option<MarkerTree>,
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(extras) = &self.extras {
            write!(f, "[{}]", extras.join(","))?;
        }
        if let Some(version_or_url) = &self.version_or_url {
            match version_or_url {
                VersionOrUrl::VersionSpecifier(version_specifier) => {
                    let version_specifier: Vec<String> = version_specifier.iter().map(ToString::to_string).collect();
                    write!(f, " {}", version_specifier.join(", "))?;
                }
                VersionOrUrl::Url(url) => write!(f, " @ {url}")?,
            }
        }
        if let Some(marker) = &self.marker {
            write!(f, " ; {marker}")?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = Pep508Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut chars = CharIter::new(input);
        parse(&mut chars)
    }
}

/// The actual version specifier or URL to install from.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum VersionOrUrl {
    /// A PEP 440 version specifier set, e.g. `>=1.19, <2.0`.
    VersionSpecifier(VersionSpecifiers),
    /// An installable URL, e.g. `https://example.org/foo-1.0.whl`.
    Url(VerbatimUrl),
}

/// A `&str` and a byte-based cursor position, used to drive the top-level requirement grammar.
///
/// Distinct from the marker grammar's [`Cursor`], which the marker parser inherited unchanged.
struct CharIter<'a> {
    input: &'a str,
    chars: Chars<'a>,
    pos: usize,
}

impl<'a> CharIter<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars(),
            pos: 0,
        }
    }

    fn copy_chars(&self) -> String {
        self.input.to_string()
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.chars.clone().next().map(|char| (self.pos, char))
    }

    fn eat(&mut self, token: char) -> Option<usize> {
        let (start_pos, peek_char) = self.peek()?;
        if peek_char == token {
            self.next();
            Some(start_pos)
        } else {
            None
        }
    }

    fn next(&mut self) -> Option<(usize, char)> {
        let pos = self.pos;
        let char = self.chars.next()?;
        self.pos += char.len_utf8();
        Some((pos, char))
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn get_pos(&self) -> usize {
        self.pos
    }

    fn take_while(&mut self, condition: impl Fn(char) -> bool) -> (String, usize, usize) {
        let mut substring = String::new();
        let start = self.get_pos();
        while let Some(char) = self.peek_char() {
            if !condition(char) {
                break;
            }
            substring.push(char);
            self.next();
        }
        let len = self.get_pos() - start;
        (substring, start, len)
    }

    fn eat_whitespace(&mut self) {
        while let Some(char) = self.peek_char() {
            if char.is_whitespace() {
                self.next();
            } else {
                return;
            }
        }
    }
}

fn parse_name(chars: &mut CharIter) -> Result<String, Pep508Error> {
    // https://peps.python.org/pep-0508/#names
    // ^([A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])$ with re.IGNORECASE
    let mut name = String::new();
    match chars.next() {
        Some((_, char)) if matches!(char, 'A'..='Z' | 'a'..='z' | '0'..='9') => name.push(char),
        Some((index, char)) => {
            return Err(Pep508Error {
                message: Pep508ErrorSource::String(format!(
                    "Expected package name starting with an alphanumeric character, found '{char}'"
                )),
                start: index,
                len: char.len_utf8(),
                input: chars.copy_chars(),
            })
        }
        None => {
            return Err(Pep508Error {
                message: Pep508ErrorSource::String("Empty field is not allowed for PEP 508".to_string()),
                start: 0,
                len: 1,
                input: chars.copy_chars(),
            })
        }
    }

    loop {
        match chars.peek() {
            Some((index, char @ ('A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '-' | '_'))) => {
                name.push(char);
                chars.next();
                if chars.peek().is_none() && matches!(char, '.' | '-' | '_') {
                    return Err(Pep508Error {
                        message: Pep508ErrorSource::String(format!(
                            "Package name must end with an alphanumeric character, not '{char}'"
                        )),
                        start: index,
                        len: char.len_utf8(),
                        input: chars.copy_chars(),
                    });
                }
            }
            Some(_) | None => return Ok(name),
        }
    }
}

/// Parses extras in `[extra1,extra2]` form.
fn parse_extras(chars: &mut CharIter) -> Result<Option<Vec<String>>, Pep508Error> {
    let Some(bracket_pos) = chars.eat('[') else {
        return Ok(None);
    };
    let mut extras = Vec::new();

    loop {
        chars.eat_whitespace();
        let mut buffer = String::new();
        let early_eof_error = || Pep508Error {
            message: Pep508ErrorSource::String(
                "Missing closing bracket (expected ']', found end of dependency specification)".to_string(),
            ),
            start: bracket_pos,
            len: 1,
            input: chars.copy_chars(),
        };

        match chars.next() {
            Some((_, alphanumeric @ ('a'..='z' | 'A'..='Z' | '0'..='9'))) => buffer.push(alphanumeric),
            Some((pos, other)) => {
                return Err(Pep508Error {
                    message: Pep508ErrorSource::String(format!(
                        "Expected an alphanumeric character starting the extra name, found '{other}'"
                    )),
                    start: pos,
                    len: other.len_utf8(),
                    input: chars.copy_chars(),
                })
            }
            None => return Err(early_eof_error()),
        }
        buffer.push_str(&chars.take_while(|char| matches!(char, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.')).0);
        if let Some((pos, char)) = chars.peek() {
            if char != ',' && char != ']' && !char.is_whitespace() {
                return Err(Pep508Error {
                    message: Pep508ErrorSource::String(format!(
                        "Invalid character in extras name, expected an alphanumeric character, '-', '_', '.', ',' or ']', found '{char}'"
                    )),
                    start: pos,
                    len: char.len_utf8(),
                    input: chars.copy_chars(),
                });
            }
        }
        chars.eat_whitespace();
        match chars.next() {
            Some((_, ',')) => extras.push(buffer),
            Some((_, ']')) => {
                extras.push(buffer);
                break;
            }
            Some((pos, other)) => {
                return Err(Pep508Error {
                    message: Pep508ErrorSource::String(format!(
                        "Expected either ',' (separating extras) or ']' (ending the extras section), found '{other}'"
                    )),
                    start: pos,
                    len: other.len_utf8(),
                    input: chars.copy_chars(),
                })
            }
            None => return Err(early_eof_error()),
        }
    }

    Ok(Some(extras))
}

fn parse_url(chars: &mut CharIter) -> Result<VersionOrUrl, Pep508Error> {
    chars.eat_whitespace();
    let (url, start, len) = chars.take_while(|char| !char.is_whitespace());
    if url.is_empty() {
        return Err(Pep508Error {
            message: Pep508ErrorSource::String("Expected URL".to_string()),
            start,
            len: len.max(1),
            input: chars.copy_chars(),
        });
    }
    let url = VerbatimUrl::parse(&url).map_err(|err| Pep508Error {
        message: Pep508ErrorSource::UrlError(err),
        start,
        len,
        input: chars.copy_chars(),
    })?;
    Ok(VersionOrUrl::Url(url))
}

fn parse_specifier(
    chars: &CharIter,
    buffer: &str,
    start: usize,
    end: usize,
) -> Result<VersionSpecifier, Pep508Error> {
    VersionSpecifier::from_str(buffer).map_err(|err: VersionSpecifierParseError| Pep508Error {
        message: Pep508ErrorSource::String(err.to_string()),
        start,
        len: end - start,
        input: chars.copy_chars(),
    })
}

/// Such as `>=1.19,<2.0`, either delimited by the end of the specifier or a `;` for the marker.
///
/// ```text
/// version_one (wsp* ',' version_one)*
/// ```
fn parse_version_specifier(chars: &mut CharIter) -> Result<Option<VersionOrUrl>, Pep508Error> {
    let mut start = chars.get_pos();
    let mut specifiers = Vec::new();
    let mut buffer = String::new();
    let requirement_kind = loop {
        match chars.peek() {
            Some((end, ',')) => {
                specifiers.push(parse_specifier(chars, &buffer, start, end)?);
                buffer.clear();
                chars.next();
                start = end + 1;
            }
            Some((_, ';')) | None => {
                let end = chars.get_pos();
                specifiers.push(parse_specifier(chars, &buffer, start, end)?);
                break Some(VersionOrUrl::VersionSpecifier(specifiers.into_iter().collect()));
            }
            Some((_, char)) => {
                buffer.push(char);
                chars.next();
            }
        }
    };
    Ok(requirement_kind)
}

/// Such as `(>=1.19,<2.0)`.
///
/// ```text
/// '(' version_one (wsp* ',' version_one)* ')'
/// ```
fn parse_version_specifier_parentheses(chars: &mut CharIter) -> Result<Option<VersionOrUrl>, Pep508Error> {
    let brace_pos = chars.get_pos();
    chars.next();
    chars.eat_whitespace();
    let mut start = chars.get_pos();
    let mut specifiers = Vec::new();
    let mut buffer = String::new();
    let requirement_kind = loop {
        match chars.next() {
            Some((end, ',')) => {
                specifiers.push(parse_specifier(chars, &buffer, start, end)?);
                buffer.clear();
                start = end + 1;
            }
            Some((end, ')')) => {
                specifiers.push(parse_specifier(chars, &buffer, start, end)?);
                break Some(VersionOrUrl::VersionSpecifier(specifiers.into_iter().collect()));
            }
            Some((_, char)) => buffer.push(char),
            None => {
                return Err(Pep508Error {
                    message: Pep508ErrorSource::String(
                        "Missing closing parenthesis (expected ')', found end of dependency specification)"
                            .to_string(),
                    ),
                    start: brace_pos,
                    len: 1,
                    input: chars.copy_chars(),
                })
            }
        }
    };
    Ok(requirement_kind)
}

/// Parses a [dependency specifier](https://packaging.python.org/en/latest/specifications/dependency-specifiers).
fn parse(chars: &mut CharIter) -> Result<Requirement, Pep508Error> {
    // specification = wsp* name wsp* extras? wsp* (('@' wsp* url_req) | ('(' versionspec ')') | (versionspec))?
    //                 wsp* (';' wsp* marker)? wsp*
    chars.eat_whitespace();
    let name = parse_name(chars)?;
    chars.eat_whitespace();
    let extras = parse_extras(chars)?;
    chars.eat_whitespace();

    let requirement_kind = match chars.peek_char() {
        Some('@') => {
            chars.next();
            Some(parse_url(chars)?)
        }
        Some('(') => parse_version_specifier_parentheses(chars)?,
        Some('<' | '=' | '>' | '~' | '!') => parse_version_specifier(chars)?,
        Some(';') | None => None,
        Some(other) => {
            return Err(Pep508Error {
                message: Pep508ErrorSource::String(format!(
                    "Expected one of `@`, `(`, `<`, `=`, `>`, `~`, `!`, `;`, found `{other}`"
                )),
                start: chars.get_pos(),
                len: other.len_utf8(),
                input: chars.copy_chars(),
            })
        }
    };

    chars.eat_whitespace();
    let marker = if chars.peek_char() == Some(';') {
        chars.next();
        // The marker grammar is independent of the requirement grammar, so hand the remainder
        // of the input to its own cursor. `parse_markers_impl` already rejects trailing garbage,
        // so fully consuming `chars` here is safe.
        let rest = &chars.input[chars.get_pos()..];
        let mut marker_cursor = Cursor::new(rest);
        let marker = marker::parse_markers_impl(&mut marker_cursor)?;
        chars.pos = chars.input.len();
        chars.chars = "".chars();
        Some(marker)
    } else {
        None
    };
    chars.eat_whitespace();
    if let Some((pos, char)) = chars.next() {
        return Err(Pep508Error {
            message: Pep508ErrorSource::String(if marker.is_none() {
                format!("Expected end of input or ';', found '{char}'")
            } else {
                format!("Expected end of input, found '{char}'")
            }),
            start: pos,
            len: char.len_utf8(),
            input: chars.copy_chars(),
        });
    }

    Ok(Requirement {
        name,
        extras,
        version_or_url: requirement_kind,
        marker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_only() {
        let requirement = Requirement::from_str("requests").unwrap();
        assert_eq!(requirement.name, "requests");
        assert!(requirement.extras.is_none());
        assert!(requirement.version_or_url.is_none());
        assert!(requirement.marker.is_none());
    }

    #[test]
    fn parses_extras_and_specifiers() {
        let requirement = Requirement::from_str("requests [security,tests] >= 2.8.1, == 2.8.*").unwrap();
        assert_eq!(requirement.extras, Some(vec!["security".to_string(), "tests".to_string()]));
        assert!(matches!(requirement.version_or_url, Some(VersionOrUrl::VersionSpecifier(_))));
    }

    #[test]
    fn parses_marker_and_round_trips_with_double_quotes() {
        let requirement = Requirement::from_str(r#"requests ; python_version > '3.8'"#).unwrap();
        assert_eq!(requirement.to_string(), r#"requests ; python_version > "3.8""#);
    }

    #[test]
    fn parses_url_dependency() {
        let requirement = Requirement::from_str("requests @ https://example.org/requests-2.0-py3-none-any.whl").unwrap();
        assert!(matches!(requirement.version_or_url, Some(VersionOrUrl::Url(_))));
        assert_eq!(
            requirement.to_string(),
            "requests @ https://example.org/requests-2.0-py3-none-any.whl"
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(Requirement::from_str("requests extra-garbage").is_err());
    }
}
