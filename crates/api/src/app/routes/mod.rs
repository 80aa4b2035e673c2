use crate::app::versioning::{ApiVersion, RouteTable};

pub mod system;
pub mod usernames;

/// Every public endpoint, keyed by method, path and version.
pub fn route_table(default_version: ApiVersion) -> RouteTable {
    RouteTable::new(default_version)
        .get("/health", ApiVersion::V1, system::health)
        .post("/username", ApiVersion::V1, usernames::create_username)
}
