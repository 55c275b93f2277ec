//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod login;
pub mod logout;
pub mod refresh_session;
pub mod register;
pub mod session_token;
pub mod verify;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use login::{LoginInput, LoginUseCase, SessionOutput};
pub use logout::LogoutUseCase;
pub use refresh_session::RefreshSessionUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session_token::{SessionClaims, TokenIssuer};
pub use verify::VerifyUseCase;
