//! `mensa admin` — management commands, gated on the Admin role

pub mod import;
pub mod menus;
pub mod products;
pub mod users;
