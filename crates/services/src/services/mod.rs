pub mod auth;
pub mod booking;
pub mod config;
pub mod database_validator;
pub mod portal;
pub mod profile;
pub mod rest_store;
pub mod studio;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_store;
