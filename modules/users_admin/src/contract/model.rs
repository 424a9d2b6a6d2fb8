use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque, stable user identifier (e.g. `user-42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Editor,
    Viewer,
    #[serde(rename = "Standard User")]
    StandardUser,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Editor,
        Role::Viewer,
        Role::StandardUser,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
            Role::StandardUser => "Standard User",
        }
    }

    /// Human-readable summary shown next to the role picker.
    pub fn description(self) -> &'static str {
        match self {
            Role::Admin => "Full system access and configuration control",
            Role::Manager => "Can manage users and view all content",
            Role::Editor => "Can create and edit content",
            Role::Viewer => "Read-only access to content",
            Role::StandardUser => "Basic access privileges",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status restriction of a list query; `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    /// Lenient parse used for query strings: anything unrecognised means `All`.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "active" => StatusFilter::Active,
            "inactive" => StatusFilter::Inactive,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(self, status: UserStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == UserStatus::Active,
            StatusFilter::Inactive => status == UserStatus::Inactive,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure user model (no serde); REST DTOs handle the wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// Partial update data for a user. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none() && self.status.is_none()
    }

    /// Patch carrying every mutable field of `user`.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            role: Some(user.role),
            status: Some(user.status),
        }
    }

    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

/// Canonical filter/pagination state of the users list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub search_text: String,
    pub status_filter: StatusFilter,
}

impl ListQuery {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search_text: String::new(),
            status_filter: StatusFilter::All,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_status(mut self, filter: StatusFilter) -> Self {
        self.status_filter = filter;
        self
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size.max(1) as usize
    }

    /// Search (case-insensitive substring of name or email) and status filter.
    pub fn matches(&self, user: &User) -> bool {
        if !self.status_filter.matches(user.status) {
            return false;
        }
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        user.name.to_lowercase().contains(&needle) || user.email.to_lowercase().contains(&needle)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of the filtered users list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListResult {
    pub items: Vec<User>,
    /// Size of the filtered set, independent of paging.
    pub total_count: u64,
}

impl ListResult {
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total_count, page_size)
    }

    pub fn find(&self, id: &UserId) -> Option<&User> {
        self.items.iter().find(|u| &u.id == id)
    }
}

/// `ceil(total / page_size)`, never less than 1.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total_count.div_ceil(size);
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub roles: BTreeMap<Role, u64>,
}

impl UserStats {
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        users.into_iter().fold(Self::default(), |mut acc, u| {
            acc.total_users += 1;
            match u.status {
                UserStatus::Active => acc.active_users += 1,
                UserStatus::Inactive => acc.inactive_users += 1,
            }
            *acc.roles.entry(u.role).or_insert(0) += 1;
            acc
        })
    }
}
