//! A small, self-contained grammar for `requires-python`-style interpreter version constraints.
//!
//! This is deliberately not PEP 440: operators are limited to `<`, `<=`, `>`, `>=`, `==`, `!=`
//! over bare `major.minor` pairs, with no pre/post/dev/local segments and no wildcards. A
//! `pep440_rs::Version` can represent `requires-python` values too, but its ordering treats
//! `3.8` and `3.8.0` as equal and has no notion of "the set of minor versions this excludes",
//! which is exactly what classifier synthesis needs; a dedicated grammar keeps that logic
//! simple instead of bolting it onto a type built for something else.

use std::fmt;

use crate::settings::PyVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Operator {
    fn matches(self, candidate: PyVersion, target: PyVersion) -> bool {
        match self {
            Self::Lt => candidate < target,
            Self::Le => candidate <= target,
            Self::Gt => candidate > target,
            Self::Ge => candidate >= target,
            Self::Eq => candidate == target,
            Self::Ne => candidate != target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Atom {
    operator: Operator,
    target: PyVersion,
}

/// A parsed `requires-python` value: a comma-separated conjunction of atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Constraint(Vec<Atom>);

/// `requires-python` did not parse as a comma-separated list of `major.minor` comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConstraintParseError;

impl fmt::Display for ConstraintParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid interpreter version constraint")
    }
}

impl Constraint {
    pub(crate) fn parse(text: &str) -> Result<Self, ConstraintParseError> {
        let atoms = text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_atom)
            .collect::<Result<Vec<_>, _>>()?;
        if atoms.is_empty() {
            return Err(ConstraintParseError);
        }
        Ok(Self(atoms))
    }

    fn satisfied_by(&self, candidate: PyVersion) -> bool {
        self.0.iter().all(|atom| atom.operator.matches(candidate, atom.target))
    }

    fn evaluate(&self, candidates: &[PyVersion]) -> Vec<PyVersion> {
        let mut out: Vec<PyVersion> = candidates.iter().copied().filter(|candidate| self.satisfied_by(*candidate)).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

fn parse_atom(part: &str) -> Result<Atom, ConstraintParseError> {
    let operator_len = part.find(|c: char| !matches!(c, '<' | '>' | '=' | '!')).ok_or(ConstraintParseError)?;
    let (operator, rest) = part.split_at(operator_len);
    let operator = match operator {
        "<" => Operator::Lt,
        "<=" => Operator::Le,
        ">" => Operator::Gt,
        ">=" => Operator::Ge,
        "==" => Operator::Eq,
        "!=" => Operator::Ne,
        _ => return Err(ConstraintParseError),
    };
    let target = parse_version(rest.trim())?;
    Ok(Atom { operator, target })
}

fn parse_version(text: &str) -> Result<PyVersion, ConstraintParseError> {
    let (major, minor) = text.split_once('.').ok_or(ConstraintParseError)?;
    let major: u8 = major.trim().parse().map_err(|_| ConstraintParseError)?;
    let minor: u8 = minor.trim().parse().map_err(|_| ConstraintParseError)?;
    Ok((major, minor))
}

/// Computes the interpreter versions that satisfy `constraint`, given the configured
/// `(min, max)` inclusive range and the minor versions already mentioned by classifiers already
/// present in the document (`existing`).
///
/// The starting window is the configured range, widened outward by any `>`, `>=`, `<`, `<=`
/// atom in `constraint` whose own bound falls outside it — so `requires-python = ">=3.6"` can
/// pull in `3.6` and `3.7` even when the configured minimum is `3.8`. If that window still
/// yields nothing (typically because the constraint's atoms point in conflicting directions,
/// like two upper bounds with no lower bound to widen from), the window is extended one minor
/// version at a time using only versions already present in `existing`, stopping as soon as the
/// result becomes non-empty or there is nothing adjacent left to extend with.
pub(crate) fn satisfying_versions(constraint: &Constraint, min_supported: PyVersion, max_supported: PyVersion, existing: &[PyVersion]) -> Vec<PyVersion> {
    let major = min_supported.0;
    let mut lo = min_supported.1;
    let mut hi = max_supported.1;

    for atom in &constraint.0 {
        if atom.target.0 != major {
            continue;
        }
        match atom.operator {
            Operator::Gt => lo = lo.min(atom.target.1.saturating_add(1)),
            Operator::Ge => lo = lo.min(atom.target.1),
            Operator::Lt => hi = hi.max(atom.target.1.saturating_sub(1)),
            Operator::Le => hi = hi.max(atom.target.1),
            Operator::Eq | Operator::Ne => {}
        }
    }

    loop {
        let window: Vec<PyVersion> = (lo..=hi).map(|minor| (major, minor)).collect();
        let satisfying = constraint.evaluate(&window);
        if !satisfying.is_empty() {
            return satisfying;
        }

        let mut widened = false;
        if lo > 0 && existing.contains(&(major, lo - 1)) {
            lo -= 1;
            widened = true;
        }
        if hi < u8::MAX && existing.contains(&(major, hi + 1)) {
            hi += 1;
            widened = true;
        }
        if !widened {
            return satisfying;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_used_as_is() {
        let constraint = Constraint::parse(">=3.7,<3.13").unwrap();
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &[]);
        assert_eq!(versions, vec![(3, 7), (3, 8), (3, 9), (3, 10), (3, 11), (3, 12)]);
    }

    #[test]
    fn lower_bound_widens_below_the_configured_minimum() {
        let constraint = Constraint::parse(">=3.6").unwrap();
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &[]);
        assert_eq!(versions, vec![(3, 6), (3, 7), (3, 8), (3, 9), (3, 10), (3, 11), (3, 12)]);
    }

    #[test]
    fn exclusive_lower_bound_excludes_its_own_target() {
        let constraint = Constraint::parse(">3.6").unwrap();
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &[]);
        assert_eq!(versions, vec![(3, 7), (3, 8), (3, 9), (3, 10), (3, 11), (3, 12)]);
    }

    #[test]
    fn upper_bound_alone_does_not_widen_without_existing_classifiers() {
        let constraint = Constraint::parse("<3.7").unwrap();
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &[]);
        assert!(versions.is_empty());
    }

    #[test]
    fn upper_bound_widens_one_step_using_existing_classifiers() {
        let constraint = Constraint::parse("<3.8").unwrap();
        let existing = [(3, 5), (3, 6), (3, 7), (3, 8)];
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &existing);
        assert_eq!(versions, vec![(3, 7)]);
    }

    #[test]
    fn not_equal_excludes_a_single_version() {
        let constraint = Constraint::parse("!=3.9").unwrap();
        let versions = satisfying_versions(&constraint, (3, 8), (3, 12), &[]);
        assert_eq!(versions, vec![(3, 8), (3, 10), (3, 11), (3, 12)]);
    }
}
