//! Chrome DevTools Protocol tab source for FlowTab.
//!
//! Start Chrome with remote debugging enabled:
//!
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```
//!
//! [`CdpTabSource`] lists, activates and closes tabs through the HTTP
//! discovery endpoints and extracts readable text over each page's
//! WebSocket with `Runtime.evaluate`.

mod error;
mod protocol;
mod script;
mod session;
mod source;

pub use error::CdpError;
pub use protocol::PageInfo;
pub use source::CdpTabSource;
