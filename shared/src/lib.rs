pub mod leaderboard;
pub mod query;
pub mod season;
pub mod store;

pub use leaderboard::{LeaderboardRow, leaderboard};
pub use query::{SortOrder, list};
pub use season::*;
pub use store::{SeasonStore, StoreError};
