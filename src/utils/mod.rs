pub mod db_utils;
pub mod pagination;
pub mod serde_helpers;
