/// Transport kernel shared by both session flavors.
///
/// The kernel contains only request plumbing and no endpoint knowledge:
///
/// - `UrlBuilder`: assembles `https://{host}/api/{version}/{method}?{params}`
/// - `ApiSigner`: HMAC-SHA512 over the full URL, sent as the `apisign` header
/// - `Transport` / `BlockingTransport`: one suspending and one blocking GET
///   implementation over reqwest, behind traits so tests can inject canned
///   responses
pub mod rest;
pub mod signer;
pub mod url;

// Re-export key types for convenience
pub use rest::{BlockingTransport, ReqwestBlocking, ReqwestTransport, SignedRequest, Transport};
pub use signer::{nonce, ApiSigner};
pub use url::UrlBuilder;
