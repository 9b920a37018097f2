// Shared foundation for the dugout workspace: configuration loading and
// validation.

pub mod config;
