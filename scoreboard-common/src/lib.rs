pub mod bundles;

pub mod clock_time;

pub mod config;

pub mod game_snapshot;
