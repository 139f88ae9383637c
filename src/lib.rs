pub mod budget;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod formation;
pub mod roster;
pub mod state;
pub mod view;
