use serde::Serialize;

/// Which dashboard a user lands on after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    Platform,
    Franchise,
    Branch,
}

impl DashboardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::Franchise => "franchise",
            Self::Branch => "branch",
        }
    }
}

/// The set of branches an authenticated administrator may see and manage.
///
/// Resolved once per request from the user's roles and the `admins` table,
/// then passed down to services, which translate it into repository filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessScope {
    /// Platform administrators see every record of their hub.
    Platform,
    /// Franchise administrators see the branches of one franchise.
    Franchise {
        franchise_id: i32,
        branch_ids: Vec<i32>,
    },
    /// Branch administrators see the branches assigned to them.
    Branch { branch_ids: Vec<i32> },
}

impl AccessScope {
    pub fn is_platform(&self) -> bool {
        matches!(self, Self::Platform)
    }

    /// Branch identifiers used to filter queries; `None` means unrestricted.
    pub fn branch_filter(&self) -> Option<Vec<i32>> {
        match self {
            Self::Platform => None,
            Self::Franchise { branch_ids, .. } | Self::Branch { branch_ids } => {
                Some(branch_ids.clone())
            }
        }
    }

    pub fn can_access_branch(&self, branch_id: i32) -> bool {
        match self {
            Self::Platform => true,
            Self::Franchise { branch_ids, .. } | Self::Branch { branch_ids } => {
                branch_ids.contains(&branch_id)
            }
        }
    }

    /// Franchises, catalog, promotions and administrators are platform-wide.
    pub fn can_manage_franchises(&self) -> bool {
        self.is_platform()
    }

    /// Creating, editing and deleting branches is reserved to platform and franchise admins.
    pub fn can_manage_branches(&self) -> bool {
        !matches!(self, Self::Branch { .. })
    }

    pub fn franchise_id(&self) -> Option<i32> {
        match self {
            Self::Franchise { franchise_id, .. } => Some(*franchise_id),
            _ => None,
        }
    }

    pub fn dashboard(&self) -> DashboardKind {
        match self {
            Self::Platform => DashboardKind::Platform,
            Self::Franchise { .. } => DashboardKind::Franchise,
            Self::Branch { .. } => DashboardKind::Branch,
        }
    }
}
