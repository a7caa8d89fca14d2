//! Progress reporting for pending replies.

pub mod typing;
