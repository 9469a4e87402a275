//! Filesystem side of the browser: the lazily expanded tree and content search.

pub mod search;
pub mod tree;
