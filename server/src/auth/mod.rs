mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use db::{create_session, ensure_admin, revoke_session, revoke_user_sessions};
pub use extractor::{bearer_token, AdminUser, AuthUser, MaybeAuthUser};
