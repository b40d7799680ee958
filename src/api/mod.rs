//! This is the API set shared by paintbots and the game client driving them

pub mod action;
pub mod client;
pub mod coordinate;
pub mod events;
pub mod map;
pub mod map_utility;
pub mod settings;
