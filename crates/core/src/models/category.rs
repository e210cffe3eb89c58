use serde::{Deserialize, Serialize};

/// Display color for any category outside the known set.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6c757d";

/// The fixed set of expense categories offered by the app.
/// Expenses may still carry free-text categories; those fall back to
/// [`DEFAULT_CATEGORY_COLOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Alimentacao,
    Casa,
    Compras,
    Transporte,
    Saude,
    Outros,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Alimentacao,
        Category::Casa,
        Category::Compras,
        Category::Transporte,
        Category::Saude,
        Category::Outros,
    ];

    /// The label stored on expenses and shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Alimentacao => "Alimentação",
            Category::Casa => "Casa",
            Category::Compras => "Compras",
            Category::Transporte => "Transporte",
            Category::Saude => "Saúde",
            Category::Outros => "Outros",
        }
    }

    /// Chart color for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Alimentacao => "#FF6384",
            Category::Casa => "#36A2EB",
            Category::Compras => "#FFCE56",
            Category::Transporte => "#4BC0C0",
            Category::Saude => "#9966FF",
            Category::Outros => "#FF9F40",
        }
    }

    /// Exact (case-sensitive) label lookup.
    pub fn from_label(label: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Color lookup by label; unknown labels get [`DEFAULT_CATEGORY_COLOR`].
pub fn category_color(label: &str) -> &'static str {
    Category::from_label(label)
        .map(|c| c.color())
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}
