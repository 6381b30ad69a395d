pub mod counts;
pub mod gate;
pub mod prefs;
pub mod puzzles;
