// Melody generation and the playback collaborator contract

pub mod generator;
pub mod history;
pub mod melody;
pub mod playback;

pub use generator::MelodyGenerator;
pub use history::MelodyHistory;
pub use melody::Melody;
pub use playback::{LogPlayer, MelodyPlayer, playback_duration};
