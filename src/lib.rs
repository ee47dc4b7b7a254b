//! Triage client - session lifecycle and authenticated requests for the
//! Triage call service
//!
//! The crate keeps a user signed in against a token-based API: it logs in
//! with email and password, persists the access/refresh token pair in a
//! secret store, attaches the access token to every protected request, and
//! refreshes it transparently when the server answers 401.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the client)
//! - [`client`] - Wires configuration, store, session, and gateway together
//! - [`auth`] - Token state and the session manager that owns it
//! - [`gateway`] - Request pipeline with bearer injection and 401 retry
//! - [`records`] - Call records from the protected listing endpoint
//! - [`secrets`] - Secret storage abstraction
//! - [`config`] - Configuration schema and loading
//! - [`logging`] - Diagnostic log subscriber
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! 1. The session is authenticated only while both tokens are held
//! 2. All session transitions are serialized through one manager
//! 3. Concurrent 401s spend the refresh token once
//! 4. A request is retried at most once
//! 5. Token values never reach logs, errors, or `Debug` output

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod records;
pub mod secrets;
pub mod ui;
