//! Local stand-in for the game server: world rules, filler opponents and
//! the session delivering events to a paintbot

pub mod arena;
pub mod opponent;
pub mod session;
