pub mod config;
pub mod db;
pub mod domain;
pub mod generator;
pub mod handlers;
pub mod runtime;
pub mod session;
pub mod state;
