pub mod aggregate;
pub mod boxscore;
pub mod freeze;
pub mod identity;
pub mod persist;
pub mod retry;
pub mod roster;
pub mod schedule;
