//! Port list parsing: `1,3,5-8` → `[1, 3, 5, 6, 7, 8]`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Highest port index accepted on the command line.
pub const MAX_PORT: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortListError {
    #[error("port list is empty")]
    Empty,

    #[error("'{0}' is not a port number")]
    Invalid(String),

    #[error("port indices start at 1")]
    Zero,

    #[error("port {0} is out of range (max {MAX_PORT})")]
    OutOfRange(u32),

    #[error("range {start}-{end} is reversed")]
    Reversed { start: u32, end: u32 },
}

/// Sorted, deduplicated, 1-based port indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortList(Vec<u32>);

impl PortList {
    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.binary_search(&index).is_ok()
    }
}

fn parse_index(raw: &str) -> Result<u32, PortListError> {
    let n: u32 = raw
        .trim()
        .parse()
        .map_err(|_| PortListError::Invalid(raw.trim().to_owned()))?;
    match n {
        0 => Err(PortListError::Zero),
        n if n > MAX_PORT => Err(PortListError::OutOfRange(n)),
        n => Ok(n),
    }
}

impl FromStr for PortList {
    type Err = PortListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports = BTreeSet::new();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(start)?;
                    let end = parse_index(end)?;
                    if start > end {
                        return Err(PortListError::Reversed { start, end });
                    }
                    ports.extend(start..=end);
                }
                None => {
                    ports.insert(parse_index(part)?);
                }
            }
        }

        if ports.is_empty() {
            return Err(PortListError::Empty);
        }
        Ok(Self(ports.into_iter().collect()))
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Vec<u32>, PortListError> {
        s.parse::<PortList>().map(PortList::into_vec)
    }

    #[test]
    fn singles_and_ranges() {
        assert_eq!(parse("1,3,5-8").unwrap(), vec![1, 3, 5, 6, 7, 8]);
        assert_eq!(parse("7").unwrap(), vec![7]);
        assert_eq!(parse(" 2 , 4 - 5 ").unwrap(), vec![2, 4, 5]);
    }

    #[test]
    fn sorts_and_dedups() {
        assert_eq!(parse("8,1-3,2,8").unwrap(), vec![1, 2, 3, 8]);
        assert_eq!(parse("3-3").unwrap(), vec![3]);
    }

    #[test]
    fn trailing_commas_are_ignored() {
        assert_eq!(parse("1,,2,").unwrap(), vec![1, 2]);
    }

    #[test]
    fn rejects_zero_reversed_and_junk() {
        assert_eq!(parse("0"), Err(PortListError::Zero));
        assert_eq!(parse("0-3"), Err(PortListError::Zero));
        assert_eq!(parse("5-2"), Err(PortListError::Reversed { start: 5, end: 2 }));
        assert_eq!(parse("a"), Err(PortListError::Invalid("a".into())));
        assert_eq!(parse("1-"), Err(PortListError::Invalid(String::new())));
        assert_eq!(parse("-1"), Err(PortListError::Invalid(String::new())));
        assert_eq!(parse("1-2-3"), Err(PortListError::Invalid("2-3".into())));
        assert_eq!(parse(""), Err(PortListError::Empty));
        assert_eq!(parse(" , "), Err(PortListError::Empty));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(parse("513"), Err(PortListError::OutOfRange(513)));
        assert!(parse("1-4000000000").is_err());
    }

    #[test]
    fn displays_as_comma_list() {
        assert_eq!("3,1-2".parse::<PortList>().unwrap().to_string(), "1,2,3");
    }
}
