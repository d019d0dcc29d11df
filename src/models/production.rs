//! Products and the shared resources they consume.
//!
//! Each unit of a product draws a fixed amount of every resource it needs
//! and earns a fixed profit. Quantities are continuous.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A product of the production mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Profit per unit produced.
    pub profit: f64,
    /// Amount of each resource drawn per unit.
    pub needs: HashMap<String, f64>,
    /// Committed minimum output; 0 means none.
    #[serde(default)]
    pub min_output: f64,
}

impl Product {
    /// Creates a product with no resource needs.
    pub fn new(id: impl Into<String>, profit: f64) -> Self {
        Self {
            id: id.into(),
            profit,
            needs: HashMap::new(),
            min_output: 0.0,
        }
    }

    /// Adds a per-unit resource need.
    pub fn with_need(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.needs.insert(resource.into(), amount);
        self
    }

    /// Commits to producing at least `quantity` units.
    pub fn with_min_output(mut self, quantity: f64) -> Self {
        self.min_output = quantity;
        self
    }

    /// Per-unit draw on `resource` (0 if not needed).
    pub fn need(&self, resource: &str) -> f64 {
        self.needs.get(resource).copied().unwrap_or(0.0)
    }
}

/// A resource with a fixed availability over the planning period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionResource {
    pub id: String,
    pub available: f64,
}

impl ProductionResource {
    pub fn new(id: impl Into<String>, available: f64) -> Self {
        Self {
            id: id.into(),
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_default_to_zero() {
        let p = Product::new("doors", 3.0).with_need("plant1", 1.0);
        assert_eq!(p.need("plant1"), 1.0);
        assert_eq!(p.need("plant2"), 0.0);
        assert_eq!(p.min_output, 0.0);
    }

    #[test]
    fn test_product_from_json() {
        let p: Product = serde_json::from_str(r#"{"id": "windows", "profit": 5.0, "needs": {"plant2": 2.0}}"#).unwrap();
        assert_eq!(p.need("plant2"), 2.0);
        assert_eq!(p.min_output, 0.0);
    }
}
