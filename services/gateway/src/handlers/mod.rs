pub mod admin;
pub mod markets;
pub mod orders;
