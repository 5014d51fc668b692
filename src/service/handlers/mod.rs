//! HTTP request handlers for the prediction web service

pub mod effect;
pub mod health;
pub mod info;
pub mod normalize;
pub mod predict;
