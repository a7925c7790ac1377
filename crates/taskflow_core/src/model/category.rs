//! Fixed category registry shared by the store and the UI.
//!
//! # Invariants
//! - The registry is static and not user-editable.
//! - The last entry is the fallback for unknown ids.

/// Display metadata for one task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    /// `#RRGGBB` accent color.
    pub color: &'static str,
    pub icon: &'static str,
}

/// Category preselected by the add-task form.
pub const DEFAULT_CATEGORY_ID: &str = "personal";

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "work",
        label: "Work",
        color: "#007AFF",
        icon: "💼",
    },
    Category {
        id: "personal",
        label: "Personal",
        color: "#34C759",
        icon: "🏠",
    },
    Category {
        id: "urgent",
        label: "Urgent",
        color: "#FF3B30",
        icon: "⚡",
    },
    Category {
        id: "other",
        label: "Other",
        color: "#8E8E93",
        icon: "📌",
    },
];

/// Returns the fallback category used for unresolved ids.
pub fn fallback_category() -> &'static Category {
    &CATEGORIES[CATEGORIES.len() - 1]
}

/// Returns the category the add-task form starts with.
pub fn default_category() -> &'static Category {
    find_category(DEFAULT_CATEGORY_ID)
}

/// Looks up a category by id, falling back to the last registry entry.
pub fn find_category(id: &str) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .unwrap_or_else(fallback_category)
}

/// Returns whether `id` names a registered category.
pub fn is_known_category(id: &str) -> bool {
    CATEGORIES.iter().any(|category| category.id == id)
}
