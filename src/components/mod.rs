pub mod matches;
pub mod tree;
