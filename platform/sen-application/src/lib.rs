pub mod config;
pub mod data;
pub mod navigation;
pub mod settings;
pub mod timers;
pub mod views;
