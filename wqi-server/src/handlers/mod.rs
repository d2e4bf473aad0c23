//! HTTP request handlers, grouped by concern.

pub mod chat;
pub mod export;
pub mod iot;
pub mod locations;
pub mod pages;
pub mod samples;
pub mod score;
