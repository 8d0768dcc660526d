//! Simulation engine: round resolution, wager state machine, session loop.
//!
//! Control flow per session:
//! `SessionSimulator` → (`WagerController`, `RoundResolver`)

pub mod resolver;
pub mod session;
pub mod wager;

pub use resolver::{resolve_round, RoundResolver, DEFAULT_TOSS_CEILING};
pub use session::{simulate_session, SessionSimulator};
pub use wager::{WagerController, WagerState};
