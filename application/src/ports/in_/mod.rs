pub mod matchmaker;

pub use matchmaker::{Matchmaker, MatchmakerError};
