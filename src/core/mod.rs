//! Core skill types

pub mod skill;

pub use skill::{DisplayField, Label, Skill};
