pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod data_models;
pub mod error;
pub mod page;
pub mod render;
pub mod state;
