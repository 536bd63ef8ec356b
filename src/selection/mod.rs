pub mod selector;
pub mod tournament;

pub use selector::Selector;
pub use tournament::TournamentSelector;
