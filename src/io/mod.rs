pub mod site_json;

pub use site_json::{read_site, site_from_str, write_report};
