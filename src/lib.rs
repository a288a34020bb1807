// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive Pocket
// authorization tool.
//
// Module responsibilities:
// - `api`: Encapsulates the Pocket OAuth calls (request token, token
//   exchange, retrieve) behind `PocketClient` and a stubbable HTTP seam.
// - `store`: String-keyed property store the credentials live in, with an
//   environment-backed and a file-backed implementation.
// - `ui`: Implements the terminal menu flows and delegates to `api`.
//
// Keeping this separation lets the tests drive `PocketClient` with an
// in-memory store and a canned transport instead of the real network.
pub mod api;
pub mod store;
pub mod ui;
