use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Portal roles. The owner role unconditionally carries the elevated
/// structure-administration capability; for everyone else it is granted
/// per user via `can_manage_structure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Employee,
}

impl Role {
    /// Lenient parse for values coming out of the users table. The portal
    /// only ever writes "owner" and "employee"; anything else is read as a
    /// plain employee rather than rejecting the whole row.
    pub fn from_db(value: &str) -> Self {
        match value {
            "owner" => Role::Owner,
            other => {
                if other != "employee" {
                    tracing::warn!("unknown role '{}', treating as employee", other);
                }
                Role::Employee
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Employee => "employee",
        }
    }
}

/// The acting user, established by the portal's authentication layer and
/// carried through request extensions (server side) or decoded from the
/// session token (client side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub can_manage_structure: bool,
}

impl Identity {
    /// The elevated capability: organization-wide structure administration.
    pub fn can_manage_all_departments(&self) -> bool {
        matches!(self.role, Role::Owner) || self.can_manage_structure
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}
