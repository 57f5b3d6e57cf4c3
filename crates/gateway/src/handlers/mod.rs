//! API handlers module

pub mod admin;
pub mod compare;
pub mod documents;
pub mod graph;
pub mod health;
pub mod search;
