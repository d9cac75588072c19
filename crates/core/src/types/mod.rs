//! Core types for the Eqori client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod blog;
pub mod email;
pub mod generation;
pub mod id;
pub mod user;

pub use blog::{BlogPost, BlogPostSummary};
pub use email::{Email, EmailError};
pub use generation::{GeneratedCopy, GenerationPatch, GenerationRecord, ProductBrief};
pub use id::*;
pub use user::CurrentUser;
