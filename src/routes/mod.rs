/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// The session gate middleware (src/gate.rs) sits above both of them and is
/// the single enforcement point: routers here only declare paths and handlers,
/// they perform no access checks of their own.

/// Routes the gate always lets through: the marketing shell, the public
/// project listing/creation API, image upload, and the login endpoints.
pub mod public;

/// Routes under the admin prefixes. Requests only reach these handlers after
/// the gate has accepted a structurally valid session token.
pub mod admin;
