use crate::models::ForumCategory;

/// Roles allowed to edit or delete anybody's posts and comments.
pub const MANAGEMENT_ROLES: [&str; 3] = ["Management", "Head Management", "Developer"];

/// Roles allowed to create, rename and delete categories.
pub const CATEGORY_ADMIN_ROLES: [&str; 3] = ["Projektleitung", "Developer", "Head Management"];

/// Role names offered when configuring a category.
pub const ASSIGNABLE_ROLES: [&str; 7] = [
    "Projektleitung",
    "Head Management",
    "Management",
    "Developer",
    "Diamond Club",
    "Diamond Teams",
    "Entropy Member",
];

fn holds_any<S: AsRef<str>>(user_roles: &[S], wanted: &[&str]) -> bool {
    user_roles.iter().any(|r| wanted.contains(&r.as_ref()))
}

pub fn has_management_role<S: AsRef<str>>(user_roles: &[S]) -> bool {
    holds_any(user_roles, &MANAGEMENT_ROLES)
}

pub fn can_manage_categories<S: AsRef<str>>(user_roles: &[S]) -> bool {
    holds_any(user_roles, &CATEGORY_ADMIN_ROLES)
}

/// Splits a stored `required_roles` column, dropping blanks.
pub fn parse_required_roles(required_roles: Option<&str>) -> Vec<&str> {
    required_roles
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .collect()
}

/// Joins role names for storage; no roles means a public category.
pub fn join_required_roles<S: AsRef<str>>(roles: &[S]) -> Option<String> {
    let roles: Vec<&str> = roles
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .collect();
    (!roles.is_empty()).then(|| roles.join(","))
}

pub fn can_access<S: AsRef<str>>(required_roles: Option<&str>, user_roles: &[S]) -> bool {
    let required = parse_required_roles(required_roles);
    required.is_empty() || holds_any(user_roles, &required)
}

/// Whether the author or a manager may change a post or comment.
pub fn can_modify<S: AsRef<str>>(author_id: i64, user_id: i64, user_roles: &[S]) -> bool {
    author_id == user_id || has_management_role(user_roles)
}

impl ForumCategory {
    pub fn is_accessible_by<S: AsRef<str>>(&self, user_roles: &[S]) -> bool {
        can_access(self.required_roles.as_deref(), user_roles)
    }
}

pub fn accessible_categories<S: AsRef<str>>(
    categories: Vec<ForumCategory>,
    user_roles: &[S],
) -> Vec<ForumCategory> {
    categories
        .into_iter()
        .filter(|c| c.is_accessible_by(user_roles))
        .collect()
}
