//! Authentication subdomain: registered users.

pub mod entities;
