mod loader;
mod ordered;

pub use loader::{LoadError, load_catalog_from_json, parse_catalog};
pub(crate) use ordered::OrderedMap;
