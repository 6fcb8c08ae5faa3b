// Bluesky public API — search-based post collection.
//
// All read endpoints on the public AT Protocol API are unauthenticated, so
// collection needs no credentials at all. The client is a thin XRPC GET
// wrapper; search handles query pagination and row extraction.

pub mod client;
pub mod search;
