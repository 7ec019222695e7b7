// src/releases/mod.rs
pub mod client;
pub mod models;
