mod short_link;

pub use short_link::{validate_custom_alias, validate_url};
