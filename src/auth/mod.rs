//! Authentication module

pub mod clock;
pub mod codec;
pub mod error;
pub mod jwt;
pub mod middleware;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TokenError;
pub use jwt::{Claims, TokenKind, TokenManager, TokenPair};
pub use middleware::{auth_gate_middleware, extract_token, AuthGate, CurrentUser};
