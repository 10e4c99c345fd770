// Configuration module
//
// This module contains all configuration-related functionality split into focused submodules:
// - types: Configuration structure and conversions into proxy components
// - loader: Configuration file loading and saving
// - validator: Configuration validation logic

pub mod loader;
pub mod types;
pub mod validator;

pub use types::Config;
