//! Reference genome metadata (chromosome sizes and cytobands) from UCSC
//! goldenPath, assembled into one alias-keyed JSON document.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod output;
pub mod ucsc;
