// handlers/mod.rs - HTTP handlers grouped by security level
//
// public/    no authentication, listed in the public path prefixes
// protected/ bearer token required, identity read from request extensions

pub mod protected;
pub mod public;
