pub mod ask;
pub mod fallback_route;
pub mod index_route;
pub mod upload;
