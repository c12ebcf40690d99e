use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One of `~=` `==` `!=` `<=` `>=` `<` `>` `===`
#[derive(Eq, Ord, PartialEq, PartialOrd, Debug, Hash, Clone, Copy)]
pub enum Operator {
    /// `== 1.2.3`
    Equal,
    /// `== 1.2.*`
    EqualStar,
    /// `===` (discouraged, arbitrary string equality)
    ExactEqual,
    /// `!= 1.2.3`
    NotEqual,
    /// `!= 1.2.*`
    NotEqualStar,
    /// `~=`
    TildeEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEqual,
}

impl Operator {
    /// Returns the wildcard version of this operator, if appropriate.
    pub(crate) fn to_star(self) -> Option<Self> {
        match self {
            Self::Equal => Some(Self::EqualStar),
            Self::NotEqual => Some(Self::NotEqualStar),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = OperatorParseError;

    /// Notably, this does not know about star versions, it just assumes the base operator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let operator = match s {
            "==" => Self::Equal,
            "===" => Self::ExactEqual,
            "!=" => Self::NotEqual,
            "~=" => Self::TildeEqual,
            "<" => Self::LessThan,
            "<=" => Self::LessThanEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanEqual,
            other => {
                return Err(OperatorParseError {
                    got: other.to_string(),
                })
            }
        };
        Ok(operator)
    }
}

impl fmt::Display for Operator {
    /// Note that `EqualStar` and `NotEqualStar` print as `==`/`!=`; the star itself is part of
    /// the version rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Equal | Self::EqualStar => "==",
            Self::ExactEqual => "===",
            Self::NotEqual | Self::NotEqualStar => "!=",
            Self::TildeEqual => "~=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
        };
        f.write_str(operator)
    }
}

/// An error that occurs when parsing an invalid version specifier operator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorParseError {
    got: String,
}

impl std::error::Error for OperatorParseError {}

impl fmt::Display for OperatorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no such comparison operator \"{}\"", self.got)
    }
}

/// Optional pre-release modifier (alpha, beta or release candidate) appended to a version.
///
/// <https://peps.python.org/pep-0440/#pre-releases>
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy, Ord, PartialOrd)]
pub enum PrereleaseKind {
    /// alpha pre-release, e.g. `1.0a1`
    Alpha,
    /// beta pre-release, e.g. `1.0b1`
    Beta,
    /// release candidate, e.g. `1.0rc1`
    Rc,
}

impl fmt::Display for PrereleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha => write!(f, "a"),
            Self::Beta => write!(f, "b"),
            Self::Rc => write!(f, "rc"),
        }
    }
}

/// A pre-release segment, e.g. the `a1` in `1.0a1`.
#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy, Ord, PartialOrd)]
pub struct Prerelease {
    /// The kind of pre-release.
    pub kind: PrereleaseKind,
    /// The number associated with the pre-release.
    pub number: u64,
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.number)
    }
}

/// A part of the [local version identifier](https://peps.python.org/pep-0440/#local-version-identifiers).
///
/// Local versions are a mess: if a segment consists entirely of ASCII digits it's compared as an
/// integer, otherwise it's compared case-insensitively as a string, and numeric segments always
/// sort after lexicographic ones. The default derived `Ord` for `Vec<LocalSegment>` already
/// matches the PEP 440 rules for comparing sequences of segments of differing length.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum LocalSegment {
    /// Not parseable as an integer segment of a local version.
    String(String),
    /// Inferred integer segment of a local version.
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(string) => write!(f, "{string}"),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(n1), Self::Number(n2)) => n1.cmp(n2),
            (Self::String(s1), Self::String(s2)) => s1.cmp(s2),
            (Self::Number(_), Self::String(_)) => Ordering::Greater,
            (Self::String(_), Self::Number(_)) => Ordering::Less,
        }
    }
}

/// A version number, as specified in [PEP 440](https://peps.python.org/pep-0440/).
///
/// Shows the normalized form when displayed: `Version::from_str("1.0.0")` and
/// `Version::from_str("1")` compare equal but the latter prints as `1`, i.e. the original input
/// string is not retained. Callers that need to preserve the author's exact spelling (e.g. the
/// formatter's `keep_full_version` option) must keep the source text alongside the parsed value.
#[derive(Clone, Debug, Eq)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<Prerelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

impl Version {
    /// Creates a new version from the release segments alone, e.g. `[1, 2, 3]` for `1.2.3`.
    pub fn new(release: impl Into<Vec<u64>>) -> Self {
        Self {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    /// The [versioning epoch](https://peps.python.org/pep-0440/#version-epochs). Normally `0`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The release segments, e.g. `[1, 2, 3]` for `4!1.2.3-a8.post9.dev1`.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The pre-release part of this version, if any.
    pub fn pre(&self) -> Option<Prerelease> {
        self.pre
    }

    /// The post-release part of this version, if any.
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// The dev-release part of this version, if any.
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// The local version segments, if any.
    pub fn local(&self) -> &[LocalSegment] {
        &self.local
    }

    /// Whether this is an alpha/beta/rc or dev version.
    pub fn any_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Whether this version has a non-empty local segment, e.g. `1.2.3+local`.
    pub fn is_local(&self) -> bool {
        !self.local.is_empty()
    }

    /// Returns a copy of this version with the local segment stripped.
    ///
    /// Per PEP 440, local version labels are ignored entirely when checking if a version
    /// satisfies a specifier (unless the specifier itself carries a local segment).
    pub fn without_local(&self) -> Self {
        Self {
            local: Vec::new(),
            ..self.clone()
        }
    }

    /// Strips trailing `.0` release segments, leaving at least one segment.
    ///
    /// `20.0` becomes `20`, `2.0.0` becomes `2`, `1.2.0` becomes `1.2`. Only the release part is
    /// touched; pre/post/dev/local segments are never dropped.
    pub fn without_trailing_zeros(&self) -> Self {
        let mut release = self.release.clone();
        while release.len() > 1 && *release.last().unwrap() == 0 {
            release.pop();
        }
        Self {
            release,
            ..self.clone()
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// `1.0.dev456 < 1.0a1 < 1.0a2.dev456 < 1.0a12.dev456 < 1.0a12 < 1.0b1.dev456 < 1.0b2`
    /// `< 1.0b2.post345.dev456 < 1.0b2.post345 < 1.0rc1.dev456 < 1.0rc1 < 1.0`
    /// `< 1.0.post456.dev34 < 1.0.post456`
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_release(&self.release, &other.release))
            .then_with(|| sortable_tuple(self).cmp(&sortable_tuple(other)))
    }
}

impl std::hash::Hash for Version {
    /// Ignores trailing zeros in the release segments, since `PartialEq` zero-pads them away.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        for segment in self.release.iter().rev().skip_while(|x| **x == 0) {
            segment.hash(state);
        }
        self.pre.hash(state);
        self.dev.hash(state);
        self.post.hash(state);
        self.local.hash(state);
    }
}

/// Shows the normalized version.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&release)?;
        if let Some(pre) = &self.pre {
            write!(f, "{pre}")?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if !self.local.is_empty() {
            let local = self
                .local
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".");
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    /// Parses a version such as `1.19`, `1.0a1`, `1.0+abc.5` or `1!2012.2`.
    ///
    /// Does not accept a trailing wildcard (`1.2.*`); use [`crate::VersionSpecifier::from_str`]
    /// for that, which strips the star before delegating here.
    fn from_str(version: &str) -> Result<Self, Self::Err> {
        parse_version(version)
    }
}

/// Compares release segments, zero-padding the shorter one.
///
/// "When comparing release segments with different numbers of components, the shorter segment
/// is padded out with additional zeros as necessary."
pub(crate) fn compare_release(this: &[u64], other: &[u64]) -> Ordering {
    let len = this.len().max(other.len());
    let this = this.iter().copied().chain(std::iter::repeat(0)).take(len);
    let other = other.iter().copied().chain(std::iter::repeat(0)).take(len);
    this.cmp(other)
}

/// Orders the parts attached after the release segment, given an equal release.
///
/// The order of pre/post-releases is `.devN < aN < bN < rcN < (final) < .postN`, but dev and
/// post releases can also be attached to a pre-release or the final release, so we build a
/// tuple: `(stage, pre_number, post, dev)` where `stage` ranks dev/alpha/beta/rc/final/post and
/// `post`/`dev` break ties within a stage. `None` for dev sorts highest (no dev suffix beats any
/// dev suffix), `None` for post sorts lowest (no post suffix is worse than any post suffix).
fn sortable_tuple(version: &Version) -> (u8, u64, Option<u64>, u64, &[LocalSegment]) {
    let dev_rank = |dev: Option<u64>| dev.unwrap_or(u64::MAX);
    match version.pre {
        None if version.dev.is_some() && version.post.is_none() => {
            (1, 0, None, version.dev.unwrap(), &version.local)
        }
        None => (
            if version.post.is_some() { 6 } else { 5 },
            0,
            version.post,
            dev_rank(version.dev),
            &version.local,
        ),
        Some(Prerelease { kind, number }) => {
            let stage = match kind {
                PrereleaseKind::Alpha => 2,
                PrereleaseKind::Beta => 3,
                PrereleaseKind::Rc => 4,
            };
            (stage, number, version.post, dev_rank(version.dev), &version.local)
        }
    }
}

fn parse_version(input: &str) -> Result<Version, VersionParseError> {
    let mut scanner = unscanny::Scanner::new(input.trim());

    let before_epoch = scanner.cursor();
    let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
    let epoch = if !digits.is_empty() && scanner.eat_if('!') {
        digits.parse().map_err(|_| VersionParseError::new(input, "epoch number too large"))?
    } else {
        scanner.jump(before_epoch);
        0
    };

    let release = parse_release(&mut scanner, input)?;
    let pre = parse_pre(&mut scanner, input)?;
    let post = parse_post(&mut scanner, input)?;
    let dev = parse_dev(&mut scanner, input)?;
    let local = parse_local(&mut scanner, input)?;

    if !scanner.done() {
        return Err(VersionParseError::new(
            input,
            format!("unexpected trailing characters \"{}\"", scanner.after(scanner.cursor())),
        ));
    }

    Ok(Version {
        epoch,
        release,
        pre,
        post,
        dev,
        local,
    })
}

fn parse_release(scanner: &mut unscanny::Scanner, input: &str) -> Result<Vec<u64>, VersionParseError> {
    let mut release = Vec::new();
    loop {
        let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
        if digits.is_empty() {
            if release.is_empty() {
                return Err(VersionParseError::new(input, "expected a version to start with a number"));
            }
            return Err(VersionParseError::new(input, "expected a number after `.` in the release segment"));
        }
        release.push(digits.parse().map_err(|_| VersionParseError::new(input, "release number too large"))?);
        if scanner.eat_if('.') {
            continue;
        }
        break;
    }
    Ok(release)
}

fn parse_pre(scanner: &mut unscanny::Scanner, input: &str) -> Result<Option<Prerelease>, VersionParseError> {
    let before = scanner.cursor();
    scanner.eat_if(['.', '-', '_']);
    let kind = if scanner.eat_if("alpha") || scanner.eat_if('a') {
        Some(PrereleaseKind::Alpha)
    } else if scanner.eat_if("beta") || scanner.eat_if('b') {
        Some(PrereleaseKind::Beta)
    } else if scanner.eat_if("rc") || scanner.eat_if("c") {
        Some(PrereleaseKind::Rc)
    } else {
        scanner.jump(before);
        None
    };
    let Some(kind) = kind else { return Ok(None) };
    let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
    let number = if digits.is_empty() { 0 } else { digits.parse().map_err(|_| VersionParseError::new(input, "pre-release number too large"))? };
    Ok(Some(Prerelease { kind, number }))
}

fn parse_post(scanner: &mut unscanny::Scanner, input: &str) -> Result<Option<u64>, VersionParseError> {
    let before = scanner.cursor();
    // `.post1`, `-post1`, `_post1` or the implicit `-1` form.
    if scanner.eat_if('.') || scanner.eat_if('_') {
        if scanner.eat_if("post") || scanner.eat_if("rev") || scanner.eat_if("r") {
            let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
            let number = if digits.is_empty() { 0 } else { digits.parse().map_err(|_| VersionParseError::new(input, "post-release number too large"))? };
            return Ok(Some(number));
        }
        scanner.jump(before);
        return Ok(None);
    }
    if scanner.eat_if('-') {
        let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
        if !digits.is_empty() {
            return Ok(Some(digits.parse().map_err(|_| VersionParseError::new(input, "post-release number too large"))?));
        }
        scanner.jump(before);
    }
    Ok(None)
}

fn parse_dev(scanner: &mut unscanny::Scanner, input: &str) -> Result<Option<u64>, VersionParseError> {
    let before = scanner.cursor();
    scanner.eat_if(['.', '-', '_']);
    if scanner.eat_if("dev") {
        let digits = scanner.eat_while(|c: char| c.is_ascii_digit());
        let number = if digits.is_empty() { 0 } else { digits.parse().map_err(|_| VersionParseError::new(input, "dev-release number too large"))? };
        return Ok(Some(number));
    }
    scanner.jump(before);
    Ok(None)
}

fn parse_local(scanner: &mut unscanny::Scanner, input: &str) -> Result<Vec<LocalSegment>, VersionParseError> {
    if !scanner.eat_if('+') {
        return Ok(Vec::new());
    }
    let mut segments = Vec::new();
    loop {
        let segment = scanner.eat_while(|c: char| c.is_ascii_alphanumeric());
        if segment.is_empty() {
            return Err(VersionParseError::new(input, "expected a local version segment after `+` or `.`"));
        }
        if segment.chars().all(|c| c.is_ascii_digit()) {
            segments.push(LocalSegment::Number(segment.parse().map_err(|_| VersionParseError::new(input, "local version segment too large"))?));
        } else {
            segments.push(LocalSegment::String(segment.to_ascii_lowercase()));
        }
        if scanner.eat_if(['.', '-', '_']) {
            continue;
        }
        break;
    }
    Ok(segments)
}

/// An error that occurs when parsing an invalid version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionParseError {
    input: String,
    message: String,
}

impl VersionParseError {
    fn new(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

impl std::error::Error for VersionParseError {}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse version \"{}\": {}", self.input, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_plain_release() {
        assert_eq!(Version::from_str("1.2.3").unwrap().to_string(), "1.2.3");
    }

    #[test]
    fn parses_epoch_pre_post_dev_local() {
        let version = Version::from_str("1!1.0a1.post2.dev3+local.1").unwrap();
        assert_eq!(version.epoch(), 1);
        assert_eq!(version.release(), &[1, 0]);
        assert_eq!(version.pre(), Some(Prerelease { kind: PrereleaseKind::Alpha, number: 1 }));
        assert_eq!(version.post(), Some(2));
        assert_eq!(version.dev(), Some(3));
        assert_eq!(version.to_string(), "1!1.0a1.post2.dev3+local.1");
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(Version::from_str("20.0").unwrap().without_trailing_zeros().to_string(), "20");
        assert_eq!(Version::from_str("2.0.0").unwrap().without_trailing_zeros().to_string(), "2");
        assert_eq!(Version::from_str("1.2.0").unwrap().without_trailing_zeros().to_string(), "1.2");
        assert_eq!(Version::from_str("1.0a1").unwrap().without_trailing_zeros().to_string(), "1.0a1");
    }

    #[test]
    fn orders_dev_pre_post() {
        let versions = [
            "1.0.dev456", "1.0a1", "1.0a2.dev456", "1.0a12.dev456", "1.0a12", "1.0b1.dev456",
            "1.0b2", "1.0b2.post345.dev456", "1.0b2.post345", "1.0rc1.dev456", "1.0rc1", "1.0",
            "1.0.post456.dev34", "1.0.post456",
        ]
        .map(|s| Version::from_str(s).unwrap());
        for window in versions.windows(2) {
            assert!(window[0] < window[1], "{} should sort before {}", window[0], window[1]);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(Version::from_str("abc").is_err());
        assert!(Version::from_str("1.2.").is_err());
        assert!(Version::from_str("1.2.3 and then some").is_err());
    }
}
