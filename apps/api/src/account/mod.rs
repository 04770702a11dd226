//! Who is optimizing, and whether they still may.

pub mod auth;
pub mod entitlements;
