//! Trakt OAuth lifecycle: cached tokens, refresh, and the device-code flow.

pub mod authenticator;
pub mod clock;
pub mod device_code;
pub mod error;
pub mod store;
pub mod token;
pub mod transport;

pub use authenticator::{AuthState, Authenticator, DevicePrompt};
pub use clock::{Clock, SystemClock};
pub use device_code::{DeviceCodePoll, DeviceCodeResponse, DeviceCodeSession};
pub use error::AuthError;
pub use store::{FileTokenStore, TokenStore};
pub use token::{Credential, TokenGrant, EXPIRY_SAFETY_MARGIN_SECS};
pub use transport::{OAuthTransport, RefreshOutcome, TraktOAuthClient};
