mod admin;
mod lookup;
mod pages;
mod resolve;

pub use admin::health;
pub use lookup::{get_uuid_page, load_lookup_path};
pub use pages::index;
pub use resolve::{get_image, get_metadata};
