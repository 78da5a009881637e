pub mod bearer;
pub mod factory;
pub mod role;
pub mod session;

pub use bearer::BearerSecret;
pub use factory::build_session_service;
pub use role::Role;
pub use session::{SessionClaims, SessionGrant, SessionService, SessionSettings, SessionVerifier};
