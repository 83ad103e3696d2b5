//! Authentication: login, signup, current identity, and the session
//! machinery (token codec, password hashing, cookie plumbing) they share.

pub mod login;
pub mod me;
pub mod password;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;

pub(crate) mod signup;

pub use self::login::login;
pub use self::me::me;
pub use self::session::logout;
pub use self::signup::signup;
pub use self::state::{AuthConfig, AuthState};
