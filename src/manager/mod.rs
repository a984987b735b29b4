pub mod commands;
pub mod edit;
pub mod prompt;
pub mod view;
