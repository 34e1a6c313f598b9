use std::fmt;

use serde::Serialize;

/// One change made to a Numerai tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub tournament: u8,
    pub round: u32,
    pub comment: &'static str,
}

impl HistoryEntry {
    pub const COLUMNS: [&'static str; 3] = ["tournament", "round", "comment"];

    const fn new(tournament: u8, round: u32, comment: &'static str) -> Self {
        Self {
            tournament,
            round,
            comment,
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10} {:>5}  {}", self.tournament, self.round, self.comment)
    }
}

static HISTORY: [HistoryEntry; 11] = [
    HistoryEntry::new(1, 1, "December 1, 2015"),
    HistoryEntry::new(1, 51, "first live logloss"),
    HistoryEntry::new(1, 61, "first stake; $3000 prize pool"),
    HistoryEntry::new(1, 67, "the big burn"),
    HistoryEntry::new(1, 78, "stake prize pool increased to $6000"),
    HistoryEntry::new(1, 81, "originality no longer a staking requirement"),
    HistoryEntry::new(1, 85, "rounds resolve on Saturdays instead of Mondays"),
    HistoryEntry::new(1, 94, "main tournament dropped; staking adds nmr prizes"),
    HistoryEntry::new(1, 100, "rank corr > 0.1 with example predictions"),
    HistoryEntry::new(1, 101, "corr > 0.1 with example predictions"),
    HistoryEntry::new(1, 102, "logloss benchmark 0.693; corr>0.2; [0.3, 0.7]"),
];

/// History of changes made to the Numerai tournaments
pub fn history() -> &'static [HistoryEntry] {
    &HISTORY
}
