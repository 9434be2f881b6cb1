//! Conjunctive product filter.
//!
//! Up to three independently optional clauses are ANDed together; an absent
//! clause is vacuously true, so the empty filter matches every product.

use serde::Deserialize;

use crate::product::Product;

/// One active filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Case-insensitive literal substring of the product name. Stored lowercased.
    NameContains(String),
    /// `price >= bound`
    PriceAtLeast(f64),
    /// `price <= bound`
    PriceAtMost(f64),
}

impl FilterClause {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FilterClause::NameContains(needle) => {
                product.name().to_lowercase().contains(needle.as_str())
            }
            FilterClause::PriceAtLeast(min) => product.price() >= *min,
            FilterClause::PriceAtMost(max) => product.price() <= *max,
        }
    }
}

/// Product list filter, decoded directly from the list query string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price_min(mut self, min: f64) -> Self {
        self.price_min = Some(min);
        self
    }

    pub fn with_price_max(mut self, max: f64) -> Self {
        self.price_max = Some(max);
        self
    }

    /// Name clause operand, if active. An empty name is treated as absent.
    pub fn name_pattern(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Active clauses in a fixed order (name, min, max).
    pub fn clauses(&self) -> Vec<FilterClause> {
        let mut clauses = Vec::with_capacity(3);
        if let Some(name) = self.name_pattern() {
            clauses.push(FilterClause::NameContains(name.to_lowercase()));
        }
        if let Some(min) = self.price_min {
            clauses.push(FilterClause::PriceAtLeast(min));
        }
        if let Some(max) = self.price_max {
            clauses.push(FilterClause::PriceAtMost(max));
        }
        clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.clauses().iter().all(|c| c.matches(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductPayload;
    use catalog_core::{CategoryId, ProductId};
    use chrono::Utc;

    fn product(id: i64, name: &str, price: f64) -> Product {
        let fields = ProductPayload::new(name, "desc", price, CategoryId::from_i64(1))
            .validate()
            .unwrap();
        Product::create(ProductId::from_i64(id), fields, Utc::now())
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Product A", 5.99),
            product(2, "Product B", 15.99),
            product(3, "Product C", 25.99),
        ]
    }

    fn names(filter: &ProductFilter, products: &[Product]) -> Vec<String> {
        products
            .iter()
            .filter(|p| filter.matches(p))
            .map(|p| p.name().to_string())
            .collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::new();
        assert!(filter.is_empty());
        assert_eq!(names(&filter, &sample()).len(), 3);
    }

    #[test]
    fn combined_clauses_select_single_product() {
        let filter = ProductFilter::new()
            .with_name("Product")
            .with_price_min(10.0)
            .with_price_max(20.0);
        assert_eq!(names(&filter, &sample()), vec!["Product B"]);
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let filter = ProductFilter::new().with_name("duct c");
        assert_eq!(names(&filter, &sample()), vec!["Product C"]);
    }

    #[test]
    fn empty_name_is_vacuous() {
        let filter = ProductFilter::new().with_name("");
        assert!(filter.clauses().is_empty());
        assert_eq!(names(&filter, &sample()).len(), 3);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filter = ProductFilter::new()
            .with_price_min(15.99)
            .with_price_max(15.99);
        assert_eq!(names(&filter, &sample()), vec!["Product B"]);
    }

    #[test]
    fn inverted_price_range_matches_nothing() {
        let filter = ProductFilter::new()
            .with_price_min(20.0)
            .with_price_max(10.0);
        assert!(names(&filter, &sample()).is_empty());
    }

    #[test]
    fn name_wildcard_characters_are_literal() {
        let products = vec![product(1, "100% Cotton", 3.0), product(2, "Cotton", 4.0)];
        let filter = ProductFilter::new().with_name("%");
        assert_eq!(names(&filter, &products), vec!["100% Cotton"]);
    }

    #[test]
    fn decodes_from_query_shape() {
        let filter: ProductFilter =
            serde_json::from_str(r#"{"name":"x","price_max":3.5}"#).unwrap();
        assert_eq!(filter.name.as_deref(), Some("x"));
        assert_eq!(filter.price_min, None);
        assert_eq!(filter.price_max, Some(3.5));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            ("[a-dA-D]{1,6}", 0.01f64..100.0, 1i64..1000)
                .prop_map(|(name, price, id)| product(id, &name, price))
        }

        proptest! {
            #[test]
            fn conjunction_equals_all_single_clause_filters(
                p in arb_product(),
                name in proptest::option::of("[a-d]{0,2}"),
                min in proptest::option::of(0.0f64..100.0),
                max in proptest::option::of(0.0f64..100.0),
            ) {
                let combined = ProductFilter { name: name.clone(), price_min: min, price_max: max };
                let by_name = ProductFilter { name, ..ProductFilter::default() };
                let by_min = ProductFilter { price_min: min, ..ProductFilter::default() };
                let by_max = ProductFilter { price_max: max, ..ProductFilter::default() };

                prop_assert_eq!(
                    combined.matches(&p),
                    by_name.matches(&p) && by_min.matches(&p) && by_max.matches(&p)
                );
            }

            #[test]
            fn clause_evaluation_order_does_not_matter(
                p in arb_product(),
                min in 0.0f64..100.0,
                max in 0.0f64..100.0,
            ) {
                let filter = ProductFilter::new().with_name("a").with_price_min(min).with_price_max(max);
                let mut clauses = filter.clauses();
                let forward = clauses.iter().all(|c| c.matches(&p));
                clauses.reverse();
                let backward = clauses.iter().all(|c| c.matches(&p));
                prop_assert_eq!(forward, backward);
                prop_assert_eq!(forward, filter.matches(&p));
            }
        }
    }
}
