mod category;
mod difficulty;
mod email;
mod error;
mod flag;
mod ids;
mod points;
mod standings;

pub use category::Category;
pub use difficulty::Difficulty;
pub use email::UserEmail;
pub use error::DomainError;
pub use flag::{ChallengeTitle, Flag, FlagFormat};
pub use ids::{ChallengeId, SubmissionId};
pub use points::{Award, Points};
pub use standings::{
    Solve, SolverEntry, Standing, UserStats, order_solvers, rank_standings, user_stats,
};
