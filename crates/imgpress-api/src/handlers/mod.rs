pub mod compress;
pub mod fallback;
pub mod health;
