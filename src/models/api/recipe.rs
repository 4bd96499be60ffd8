use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit assumed when a recipe ingredient carries none
pub const DEFAULT_UNIT: &str = "piece";

/// Complete recipe with all ingredients for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Native serving count; absent, zero or negative counts as one serving
    #[serde(default)]
    pub servings: Option<i64>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub created_at: String,
}

/// A single ingredient within a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: Some(amount),
            unit: Some(unit.into()),
        }
    }

    /// Amount with a missing value read as zero
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Unit with a missing or empty value read as [`DEFAULT_UNIT`]
    pub fn unit_or_default(&self) -> &str {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => unit,
            _ => DEFAULT_UNIT,
        }
    }
}

impl Recipe {
    /// Serving count used as the scaling denominator, never below one
    pub fn native_servings(&self) -> i64 {
        self.servings.unwrap_or(0).max(1)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recipe: {}", self.name)?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Serves: {}", self.native_servings())?;
        writeln!(f, "Created: {}", self.created_at)?;
        writeln!(f, "\nIngredients:")?;

        for ingredient in &self.ingredients {
            match ingredient.amount {
                Some(amount) => writeln!(
                    f,
                    "  - {} {} {}",
                    amount,
                    ingredient.unit_or_default(),
                    ingredient.name
                )?,
                None => writeln!(f, "  - {}", ingredient.name)?,
            }
        }

        if let Some(instructions) = &self.instructions {
            write!(f, "\nInstructions:\n{}\n", instructions)?;
        }

        Ok(())
    }
}
