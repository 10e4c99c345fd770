// Utilities module
//
// This module contains common utility functions:
// - path: Joining the upstream prefix with request paths and queries
// - validation: Port and timeout checks

pub mod path;
pub mod validation;
