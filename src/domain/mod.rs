pub mod episode;
pub mod feed;
pub mod release;
pub mod schedule;
pub mod state;
