//! HTTP surface: request handlers

pub mod handlers;
