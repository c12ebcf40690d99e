use std::fmt;
use std::str::FromStr;

use crate::version::{Operator, OperatorParseError, Version, VersionParseError};

/// A single version specifier such as `>=1.2.3` or `==1.*`.
#[derive(Eq, PartialEq, Debug, Hash, Clone)]
pub struct VersionSpecifier {
    operator: Operator,
    version: Version,
    /// Whether the version carries a trailing `.*`, e.g. `== 1.2.*`.
    star: bool,
}

impl VersionSpecifier {
    /// Builds a specifier from its parts, validating the combination of operator and version.
    pub fn new(operator: Operator, version: Version, star: bool) -> Result<Self, VersionSpecifierParseError> {
        if star {
            let Some(starred) = operator.to_star() else {
                return Err(VersionSpecifierParseError::new(format!(
                    "operator {operator} cannot be used with a wildcard version"
                )));
            };
            if version.is_local() {
                return Err(VersionSpecifierParseError::new(
                    "wildcard versions cannot have a local segment",
                ));
            }
            return Ok(Self {
                operator: starred,
                version,
                star: true,
            });
        }
        if operator == Operator::TildeEqual && version.release().len() < 2 {
            return Err(VersionSpecifierParseError::new(
                "`~=` requires at least two release segments, e.g. `~=1.2`",
            ));
        }
        Ok(Self {
            operator,
            version,
            star: false,
        })
    }

    /// The comparison operator.
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// The version being compared against.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether this specifier carries a trailing `.*`, e.g. `== 1.2.*`.
    ///
    /// A star specifier's version is a prefix, not a version in its own right, so callers that
    /// trim trailing-zero release segments (e.g. a `pyproject.toml` formatter's
    /// `keep_full_version` option) need this to know that trimming `1.2.*` would change its
    /// meaning and must be skipped.
    pub fn is_star(&self) -> bool {
        self.star
    }

    /// Whether `version` satisfies this specifier.
    pub fn contains(&self, version: &Version) -> bool {
        // Pre-releases are excluded unless the specifier itself mentions one, matching the
        // opt-in behaviour required by PEP 440 for ordinary specifiers.
        if version.any_prerelease() && !self.version.any_prerelease() && !matches!(self.operator, Operator::ExactEqual) {
            return false;
        }

        match self.operator {
            Operator::Equal => {
                if self.version.is_local() {
                    *version == self.version
                } else {
                    version.without_local() == self.version
                }
            }
            Operator::EqualStar => {
                let prefix = self.version.release();
                version.epoch() == self.version.epoch() && version.release().starts_with(prefix)
            }
            Operator::ExactEqual => version.to_string() == self.version.to_string(),
            Operator::NotEqual => !Self {
                operator: Operator::Equal,
                version: self.version.clone(),
                star: false,
            }
            .contains(version),
            Operator::NotEqualStar => !Self {
                operator: Operator::EqualStar,
                version: self.version.clone(),
                star: true,
            }
            .contains(version),
            Operator::LessThan => {
                if self.version.is_local() {
                    version < &self.version
                } else {
                    version.without_local() < self.version
                }
            }
            Operator::LessThanEqual => version.without_local() <= self.version,
            Operator::GreaterThan => {
                if self.version.is_local() {
                    version > &self.version
                } else {
                    version.without_local() > self.version
                }
            }
            Operator::GreaterThanEqual => version.without_local() >= self.version,
            Operator::TildeEqual => {
                let release = self.version.release();
                let prefix = &release[..release.len() - 1];
                version.without_local() >= self.version && version.release().starts_with(prefix)
            }
        }
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.star {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

impl FromStr for VersionSpecifier {
    type Err = VersionSpecifierParseError;

    /// Parses e.g. `>=1.2.3` or `==1.2.*`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        let operator_len = spec
            .find(|c: char| !matches!(c, '=' | '!' | '<' | '>' | '~'))
            .ok_or_else(|| VersionSpecifierParseError::new(format!("missing version after operator in \"{spec}\"")))?;
        let (operator, rest) = spec.split_at(operator_len);
        let operator = Operator::from_str(operator)?;
        let rest = rest.trim_start();
        let (rest, star) = match rest.strip_suffix(".*") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let version = Version::from_str(rest)?;
        Self::new(operator, version, star)
    }
}

/// A whitespace-and-comma separated list of version specifiers, e.g. `>=1.16, <2.0`.
#[derive(Eq, PartialEq, Debug, Hash, Clone, Default)]
pub struct VersionSpecifiers(Vec<VersionSpecifier>);

impl VersionSpecifiers {
    /// Whether `version` satisfies every specifier in this list.
    pub fn contains(&self, version: &Version) -> bool {
        self.0.iter().all(|specifier| specifier.contains(version))
    }

    /// Iterates over the individual specifiers.
    pub fn iter(&self) -> std::slice::Iter<'_, VersionSpecifier> {
        self.0.iter()
    }

    /// The number of specifiers in this list.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this list has no specifiers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VersionSpecifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specifiers = self.0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        f.write_str(&specifiers)
    }
}

impl FromStr for VersionSpecifiers {
    type Err = VersionSpecifierParseError;

    fn from_str(specifiers: &str) -> Result<Self, Self::Err> {
        let specifiers = specifiers
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(VersionSpecifier::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(specifiers))
    }
}

impl IntoIterator for VersionSpecifiers {
    type Item = VersionSpecifier;
    type IntoIter = std::vec::IntoIter<VersionSpecifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<VersionSpecifier> for VersionSpecifiers {
    fn from_iter<T: IntoIterator<Item = VersionSpecifier>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An error that occurs when parsing an invalid version specifier.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum VersionSpecifierParseError {
    /// The operator could not be parsed.
    #[error(transparent)]
    Operator(#[from] OperatorParseError),
    /// The version could not be parsed.
    #[error(transparent)]
    Version(#[from] VersionParseError),
    /// The operator and version were individually valid but not a valid combination.
    #[error("{0}")]
    Invalid(String),
}

impl VersionSpecifierParseError {
    fn new(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let spec = VersionSpecifier::from_str(">=1.2.3").unwrap();
        assert_eq!(spec.to_string(), ">=1.2.3");
    }

    #[test]
    fn star_specifiers_match_prefix() {
        let spec = VersionSpecifier::from_str("==1.2.*").unwrap();
        assert!(spec.contains(&Version::from_str("1.2.5").unwrap()));
        assert!(!spec.contains(&Version::from_str("1.3.0").unwrap()));
    }

    #[test]
    fn excludes_prereleases_by_default() {
        let spec = VersionSpecifier::from_str(">=1.0").unwrap();
        assert!(!spec.contains(&Version::from_str("1.1a1").unwrap()));
        let spec = VersionSpecifier::from_str(">=1.0a1").unwrap();
        assert!(spec.contains(&Version::from_str("1.1a1").unwrap()));
    }

    #[test]
    fn tilde_equal_requires_two_segments() {
        assert!(VersionSpecifier::from_str("~=1").is_err());
        assert!(VersionSpecifier::from_str("~=1.2").is_ok());
    }

    #[test]
    fn list_contains_requires_all_specifiers() {
        let specifiers = VersionSpecifiers::from_str(">=1.16, <2.0").unwrap();
        assert!(specifiers.contains(&Version::from_str("1.19").unwrap()));
        assert!(!specifiers.contains(&Version::from_str("2.0").unwrap()));
    }
}
