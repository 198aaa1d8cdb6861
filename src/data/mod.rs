pub mod loader;
pub mod record;
pub mod validate;
