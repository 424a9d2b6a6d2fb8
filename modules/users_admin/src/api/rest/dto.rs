use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::contract::model::{
    ListQuery, ListResult, Role, StatusFilter, User, UserId, UserPatch, UserStats, UserStatus,
};

pub const USER_UPDATED_MESSAGE: &str = "User updated successfully";
pub const USER_DELETED_MESSAGE: &str = "User deleted successfully";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// REST DTO for user representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUserReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Raw list query parameters; parsed leniently so bad values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub query: Option<String>,
    pub status: Option<String>,
}

impl ListUsersParams {
    pub fn into_query(self, default_page_size: u32) -> ListQuery {
        let page = self
            .page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1);
        let page_size = self
            .page_size
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(default_page_size);

        ListQuery::new(page_size)
            .with_page(page)
            .with_search(self.query.unwrap_or_default())
            .with_status(
                self.status
                    .as_deref()
                    .map(StatusFilter::parse_lenient)
                    .unwrap_or_default(),
            )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListData {
    pub total_count: u64,
    pub users: Vec<UserDto>,
}

/// `GET /api/users` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub data: UserListData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub roles: BTreeMap<Role, u64>,
}

/// `GET /api/users/stats` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub success: bool,
    pub data: UserStatsDto,
}

/// `PATCH /api/users/{id}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub success: bool,
    pub data: UserDto,
    pub message: String,
}

/// `DELETE /api/users/{id}` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

/// Error body for every non-2xx answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// Conversions between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            role: dto.role,
            status: dto.status,
            created_at: dto.created_at,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
            status: req.status,
        }
    }
}

impl From<UserPatch> for UpdateUserReq {
    fn from(patch: UserPatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            role: patch.role,
            status: patch.status,
        }
    }
}

impl From<ListResult> for UserListResponse {
    fn from(page: ListResult) -> Self {
        Self {
            data: UserListData {
                total_count: page.total_count,
                users: page.items.into_iter().map(UserDto::from).collect(),
            },
        }
    }
}

impl From<UserListResponse> for ListResult {
    fn from(resp: UserListResponse) -> Self {
        Self {
            items: resp.data.users.into_iter().map(User::from).collect(),
            total_count: resp.data.total_count,
        }
    }
}

impl From<UserStats> for UserStatsDto {
    fn from(s: UserStats) -> Self {
        Self {
            total_users: s.total_users,
            active_users: s.active_users,
            inactive_users: s.inactive_users,
            roles: s.roles,
        }
    }
}

impl From<UserStatsDto> for UserStats {
    fn from(s: UserStatsDto) -> Self {
        Self {
            total_users: s.total_users,
            active_users: s.active_users,
            inactive_users: s.inactive_users,
            roles: s.roles,
        }
    }
}
