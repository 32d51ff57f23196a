pub mod crypto;
pub mod guards;
pub mod time;
