use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Recipe not found with id: {0}")]
    RecipeNotFound(i64),

    #[error("Meal plan not found with id: {0}")]
    MealPlanNotFound(i64),

    #[error("Meal plan entry not found with id: {0}")]
    MealPlanEntryNotFound(i64),

    #[error("Pantry item not found with id: {0}")]
    PantryItemNotFound(i64),

    #[error("Grocery list not found with id: {0}")]
    GroceryListNotFound(i64),

    #[error("Item index {index} is out of range for grocery list {list_id}")]
    ItemIndexOutOfRange { list_id: i64, index: usize },

    #[error("Quantity must be a positive number, got {0}")]
    InvalidQuantity(f64),

    #[error("Unknown grocery list status: {0}")]
    InvalidStatus(String),

    #[error("At least one item is required")]
    EmptyItems,
}

impl MealBuddyError {
    /// True for every "referenced record does not exist or is not yours" failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecipeNotFound(_)
                | Self::MealPlanNotFound(_)
                | Self::MealPlanEntryNotFound(_)
                | Self::PantryItemNotFound(_)
                | Self::GroceryListNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MealBuddyError>;
