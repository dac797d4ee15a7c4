// Match engine and round state machine

pub mod difficulty;
pub mod logic;
pub mod scheduler;
pub mod session;
pub mod stats;

pub use difficulty::Difficulty;
pub use logic::{MatchVerdict, calculate_score, check_melody_match};
pub use scheduler::{SessionEvent, TransitionScheduler};
pub use session::{Feedback, GameSession, GameState, SessionView};
pub use stats::GameStats;
