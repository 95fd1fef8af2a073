use serde::{Deserialize, Serialize};
use web_sys::window;

const USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// Signed-in user as kept in localStorage under "user"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub email: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Read the current user from localStorage
pub fn current_user() -> Option<SessionUser> {
    let raw = get_local_storage()?.get_item(USER_KEY).ok()??;
    parse_user(&raw)
}

pub fn parse_user(raw: &str) -> Option<SessionUser> {
    match serde_json::from_str(raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Ignoring malformed session user: {}", e);
            None
        }
    }
}
