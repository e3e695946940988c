mod password;
mod sessions;
mod users;

pub use password::{hash_password, verify_password};
pub use sessions::{SESSION_COOKIE, SessionStore};
pub use users::{NewUser, User, UserProfile, UserStore};
