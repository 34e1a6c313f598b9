pub mod history;
pub mod tournament;
pub mod types;

pub use history::{history, HistoryEntry};
pub use tournament::{
    tournament_int2str, tournament_iter, tournament_str2int, Tournament, TournamentIter,
    TOURNAMENT_NAMES,
};
pub use types::{isint, isstring};
