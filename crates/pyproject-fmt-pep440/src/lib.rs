//! A library for python version numbers and specifiers, implementing
//! [PEP 440](https://peps.python.org/pep-0440)
//!
//! ```rust
//! use std::str::FromStr;
//! use pep440_rs::{VersionSpecifiers, Version, VersionSpecifier};
//!
//! let version = Version::from_str("1.19").unwrap();
//! let version_specifier = VersionSpecifier::from_str("==1.19").unwrap();
//! assert!(version_specifier.contains(&version));
//! let version_specifiers = VersionSpecifiers::from_str(">=1.16, <2.0").unwrap();
//! assert!(version_specifiers.contains(&version));
//! ```
//!
//! PEP 440 has a lot of unintuitive features, including:
//!
//! * An epoch that you can prefix the version which, e.g. `1!1.2.3`. Lower epoch always means lower
//!   version (`1.0 <=2!0.1`)
//! * post versions, which can be attached to both stable releases and pre-releases
//! * dev versions, which can be attached to both stable releases and pre-releases. When attached to a
//!   pre-release the dev version is ordered just below the normal pre-release, however when attached
//!   to a stable version, the dev version is sorted before the stable release
//! * local versions on top of all the others, which are added with a `+` and have implicitly typed
//!   string and number segments
//! * no semver-caret (`^`), but a pseudo-semver tilde (`~=`)
//!
//! This crate only implements the parts of PEP 440 that a `pyproject.toml` formatter needs:
//! parsing, ordering, string rendering and specifier evaluation. Unlike the full `pep440_rs`
//! published crate, it has no Python bindings and no packed small-integer representation for
//! versions, since a formatter never needs to compare millions of them per second.
#![deny(missing_docs)]

mod version;
mod version_specifier;

pub use version::{LocalSegment, Operator, OperatorParseError, Prerelease, PrereleaseKind, Version, VersionParseError};
pub use version_specifier::{VersionSpecifier, VersionSpecifierParseError, VersionSpecifiers};
