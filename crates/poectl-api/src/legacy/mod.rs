// Legacy API client modules
//
// Hand-written client for the UniFi controller's legacy (non-OpenAPI)
// endpoints used for switch port configuration. Every response is wrapped
// in the standard `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod devices;
pub mod models;

pub use client::LegacyClient;
pub use devices::merge_poe_overrides;
