//! geoscan Route Packager
//!
//! This crate packages a plain domain list into a v2rayTun routing import
//! token. It performs no matching and does not read geosite catalogs.

pub mod builder;
pub mod optimizer;
pub mod parser;

pub use builder::{build_route, encode_token, Route, RouteError, RouteOptions, RouteRule};
pub use optimizer::dedupe_domains;
pub use parser::parse_domain_list;
