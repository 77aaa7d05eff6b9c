//! Core pipeline orchestration and domain logic for corpusgen.
//!
//! This crate walks an authored content tree in navigation order and
//! assembles the single-file documentation corpus (`llms-full.txt`).

pub mod assembler;
pub mod collector;
pub mod meta;
pub mod pipeline;
pub mod url_map;

#[cfg(test)]
pub(crate) mod test_helpers;
