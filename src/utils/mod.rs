pub mod short_code;
pub mod time;
