use chrono::{DateTime, Duration, Utc};

use crate::contract::model::{Role, User, UserId, UserStatus};

const FIRST_NAMES: [&str; 16] = [
    "John", "Jane", "Alice", "Bob", "Carol", "David", "Emma", "Frank", "Grace", "Henry", "Isabel",
    "Jack", "Karen", "Liam", "Maria", "Noah",
];

const LAST_NAMES: [&str; 13] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson",
    "Taylor", "Anderson", "Thomas", "Moore",
];

// 2025-01-01T09:00:00Z
const SEED_EPOCH_SECS: i64 = 1_735_722_000;

/// Deterministic demo users `user-1..=user-{count}`.
///
/// Every fourth user is inactive; roles cycle in declaration order; each
/// user joined one day before the previous one.
pub fn demo_users(count: usize) -> Vec<User> {
    let epoch = DateTime::<Utc>::from_timestamp(SEED_EPOCH_SECS, 0).unwrap_or_default();

    (1..=count)
        .map(|n| {
            let i = n - 1;
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i * 7) % LAST_NAMES.len()];
            User {
                id: UserId::new(format!("user-{n}")),
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}{n}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                role: Role::ALL[i % Role::ALL.len()],
                status: if n % 4 == 0 {
                    UserStatus::Inactive
                } else {
                    UserStatus::Active
                },
                created_at: epoch - Duration::days(i as i64),
            }
        })
        .collect()
}
