//! Chat subdomain: sessions, messages, titles and ids.

pub mod entities;
pub mod id;
pub mod title;
