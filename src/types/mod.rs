pub mod addon;
pub mod collection;
