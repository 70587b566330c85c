// src/lib.rs

//! Apot notice pipeline library
//!
//! Scrapes the notice board listing pages, replicates the extracted notices
//! to the remote store on a recurring schedule, and keeps a local archive of
//! notices the user chose to save.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod utils;
