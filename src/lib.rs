pub mod clutch_score;
pub mod comparison;
pub mod config;
pub mod game_stats;
pub mod http_cache;
pub mod http_client;
pub mod leaderboard;
pub mod parse;
pub mod report;
pub mod season;
pub mod shot_classifier;
pub mod shot_repository;
pub mod shot_trends;
pub mod shots;
pub mod teams;
