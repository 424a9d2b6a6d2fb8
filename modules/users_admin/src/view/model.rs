use crate::contract::model::{Role, User, UserId, UserStatus};

/// One table row, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub initials: String,
    pub joined: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            initials: initials(&user.name),
            joined: user.created_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Full-width row shown instead of data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderRow {
    NoResults,
    Error(String),
}

/// Derived state of the users table and its pager.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListView {
    pub rows: Vec<UserRow>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub is_loading: bool,
    /// Rows belong to a previous query and are kept while the current one loads.
    pub is_placeholder: bool,
    pub placeholder_row: Option<PlaceholderRow>,
}

impl ListView {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// First letter of up to two words, uppercased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
