pub mod error;
pub mod executor;
pub mod row;
pub mod sql;
pub mod value;

#[cfg(feature = "testing")]
pub mod testing;
