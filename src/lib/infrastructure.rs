//! Infrastructure modules

pub mod content;
pub mod email;
