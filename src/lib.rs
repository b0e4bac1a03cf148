//! Panic System - unit morale and pilot ejection for turn-based mech combat

pub mod core;
pub mod panic;
