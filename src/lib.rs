//! LyricSwitch - song lyrics lookup and translation
//!
//! Looks up lyrics, translates them through a hosted language model and finds
//! the matching music video. The heart of the crate is the search flow in
//! [`coordinator`], driving the state machine in [`session`].

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod language;
pub mod lyrics;
pub mod render;
pub mod session;
pub mod translate;
pub mod video;
pub mod workflow;
