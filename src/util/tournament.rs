use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const TOURNAMENT_NAMES: [&str; 5] = ["bernie", "elizabeth", "jordan", "ken", "charles"];

/// Numerai tournament, numbered 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Tournament {
    Bernie = 1,
    Elizabeth = 2,
    Jordan = 3,
    Ken = 4,
    Charles = 5,
}

impl Tournament {
    pub const ALL: [Tournament; 5] = [
        Tournament::Bernie,
        Tournament::Elizabeth,
        Tournament::Jordan,
        Tournament::Ken,
        Tournament::Charles,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        TOURNAMENT_NAMES[self as usize - 1]
    }

    pub fn from_id(tournament_int: i64) -> Result<Self> {
        if tournament_int < 1 {
            return Err(Error::TournamentOutOfRange {
                value: tournament_int,
                reason: "greater than 0",
            });
        }
        if tournament_int > 5 {
            return Err(Error::TournamentOutOfRange {
                value: tournament_int,
                reason: "less than 6",
            });
        }
        Ok(Self::ALL[tournament_int as usize - 1])
    }
}

impl FromStr for Tournament {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TOURNAMENT_NAMES
            .iter()
            .position(|name| *name == s)
            .map(|idx| Self::ALL[idx])
            .ok_or_else(|| Error::UnknownTournament(s.to_string()))
    }
}

impl fmt::Display for Tournament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert tournament integer to string name
pub fn tournament_int2str(tournament_int: i64) -> Result<&'static str> {
    Tournament::from_id(tournament_int).map(Tournament::as_str)
}

/// Convert tournament name to tournament integer
pub fn tournament_str2int(tournament_str: &str) -> Result<u8> {
    tournament_str.parse::<Tournament>().map(Tournament::id)
}

/// Iterate, in order, through tournaments yielding `(id, name)`
pub fn tournament_iter() -> TournamentIter {
    TournamentIter { ids: 1..6 }
}

#[derive(Debug, Clone)]
pub struct TournamentIter {
    ids: Range<u8>,
}

impl Iterator for TournamentIter {
    type Item = (u8, &'static str);

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| (id, TOURNAMENT_NAMES[id as usize - 1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for TournamentIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids
            .next_back()
            .map(|id| (id, TOURNAMENT_NAMES[id as usize - 1]))
    }
}

impl ExactSizeIterator for TournamentIter {}

impl FusedIterator for TournamentIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for name in TOURNAMENT_NAMES {
            let id = tournament_str2int(name).unwrap();
            assert_eq!(tournament_int2str(id as i64).unwrap(), name);
        }
    }

    #[test]
    fn test_round_trip_ids() {
        for id in 1..=5i64 {
            let name = tournament_int2str(id).unwrap();
            assert_eq!(tournament_str2int(name).unwrap() as i64, id);
        }
    }

    #[test]
    fn test_int2str_bounds() {
        let err = tournament_int2str(0).unwrap_err();
        assert!(matches!(err, Error::TournamentOutOfRange { value: 0, .. }));
        assert!(err.to_string().contains("greater than 0"));

        let err = tournament_int2str(6).unwrap_err();
        assert!(matches!(err, Error::TournamentOutOfRange { value: 6, .. }));
        assert!(err.to_string().contains("less than 6"));

        assert!(tournament_int2str(-3).is_err());
    }

    #[test]
    fn test_str2int_unknown() {
        let err = tournament_str2int("burt").unwrap_err();
        assert!(matches!(err, Error::UnknownTournament(ref name) if name == "burt"));
        assert!(tournament_str2int("Bernie").is_err());
    }

    #[test]
    fn test_tournament_iter() {
        let pairs: Vec<_> = tournament_iter().collect();
        assert_eq!(
            pairs,
            vec![
                (1, "bernie"),
                (2, "elizabeth"),
                (3, "jordan"),
                (4, "ken"),
                (5, "charles"),
            ]
        );
        assert_eq!(tournament_iter().len(), 5);
    }

    #[test]
    fn test_tournament_iter_restartable() {
        let first: Vec<_> = tournament_iter().collect();
        let second: Vec<_> = tournament_iter().collect();
        assert_eq!(first, second);

        let iter = tournament_iter();
        let cloned: Vec<_> = iter.clone().collect();
        assert_eq!(cloned, iter.collect::<Vec<_>>());
    }

    #[test]
    fn test_enum_metadata() {
        assert_eq!(Tournament::Bernie.id(), 1);
        assert_eq!(Tournament::Charles.as_str(), "charles");
        assert_eq!(Tournament::Ken.to_string(), "ken");
        assert_eq!("jordan".parse::<Tournament>().unwrap(), Tournament::Jordan);
        assert_eq!(Tournament::from_id(2).unwrap(), Tournament::Elizabeth);
    }
}
