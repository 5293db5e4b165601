use std::fmt;
use std::str::FromStr;

/// Severity of a log call.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Numeric level used in bunyan-format records.
    pub fn bunyan_level(self) -> u8 {
        match self {
            Severity::Debug => 20,
            Severity::Info => 30,
            Severity::Warn => 40,
            Severity::Error => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Parse a level name, falling back to `Debug` when the name is missing,
    /// blank or not one of the four known levels.
    pub fn parse_or_debug(name: Option<&str>) -> Severity {
        name.and_then(|n| n.parse().ok()).unwrap_or(Severity::Debug)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: {}", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_bunyan_levels() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0].bunyan_level() < pair[1].bunyan_level());
        }
    }

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warn));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!(" Info ".parse::<Severity>(), Ok(Severity::Info));
        assert!("TRACE".parse::<Severity>().is_err());
    }

    #[test]
    fn unknown_or_missing_names_default_to_debug() {
        assert_eq!(Severity::parse_or_debug(None), Severity::Debug);
        assert_eq!(Severity::parse_or_debug(Some("")), Severity::Debug);
        assert_eq!(Severity::parse_or_debug(Some("verbose")), Severity::Debug);
        assert_eq!(Severity::parse_or_debug(Some("ERROR")), Severity::Error);
    }
}
