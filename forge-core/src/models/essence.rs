use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essence {
    pub name: String,
    pub unit_price: Decimal,
    pub image: String,
}

impl Essence {
    pub fn new(
        name: impl Into<String>,
        unit_price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            image: image.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no essences")]
    Empty,

    #[error("duplicate essence name '{0}'")]
    DuplicateName(String),

    #[error("essence '{name}' has non-positive price {price}")]
    NonPositivePrice { name: String, price: Decimal },

    #[error("essence '{name}' is priced below the essence before it")]
    OutOfOrder { name: String },
}

/// Ordered list of essences, cheapest first.
///
/// The order matters: recommendations walk it in reverse so the most
/// valuable essence is offered first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    essences: Vec<Essence>,
}

const WIKI: &str = "https://static.wikitide.net/theforgewiki";

impl Catalog {
    /// Builds a catalog after checking names are unique, prices positive
    /// and prices non-decreasing.
    pub fn new(essences: Vec<Essence>) -> Result<Self, CatalogError> {
        if essences.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut previous: Option<Decimal> = None;
        for (idx, essence) in essences.iter().enumerate() {
            if essence.unit_price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice {
                    name: essence.name.clone(),
                    price: essence.unit_price,
                });
            }
            if essences[..idx].iter().any(|e| e.name == essence.name) {
                return Err(CatalogError::DuplicateName(essence.name.clone()));
            }
            if previous.is_some_and(|p| essence.unit_price < p) {
                return Err(CatalogError::OutOfOrder {
                    name: essence.name.clone(),
                });
            }
            previous = Some(essence.unit_price);
        }

        Ok(Self { essences })
    }

    /// The seven essences sold at the forge.
    pub fn forge() -> Self {
        Self {
            essences: vec![
                Essence::new("Minúscula", dec!(2.5), format!("{WIKI}/e/ef/TinyEssence.png")),
                Essence::new("Pequeña", dec!(5), format!("{WIKI}/8/84/SmallEssence.png")),
                Essence::new(
                    "Mediana",
                    dec!(15),
                    format!("{WIKI}/thumb/3/38/MediumEssence.png/100px-MediumEssence.png"),
                ),
                Essence::new(
                    "Grande",
                    dec!(35),
                    format!("{WIKI}/thumb/3/33/LargeEssence.png/100px-LargeEssence.png"),
                ),
                Essence::new(
                    "Mayor",
                    dec!(50),
                    format!("{WIKI}/thumb/3/3c/GreaterEssence.png/100px-GreaterEssence.png"),
                ),
                Essence::new(
                    "Superior",
                    dec!(75),
                    format!("{WIKI}/thumb/6/6b/SuperiorEssence.png/100px-SuperiorEssence.png"),
                ),
                Essence::new(
                    "Épica",
                    dec!(100),
                    format!("{WIKI}/thumb/8/89/EpicEssence.png/100px-EpicEssence.png"),
                ),
            ],
        }
    }

    pub fn essences(&self) -> &[Essence] {
        &self.essences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Essence> {
        self.essences.iter()
    }

    pub fn len(&self) -> usize {
        self.essences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.essences.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Essence> {
        self.essences.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The highest-priced essence; ties go to the one listed last.
    pub fn optimal(&self) -> &Essence {
        // `new` and `forge` both reject empty catalogs
        &self.essences[self.essences.len() - 1]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::forge()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Essence;
    type IntoIter = std::slice::Iter<'a, Essence>;

    fn into_iter(self) -> Self::IntoIter {
        self.essences.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn essence(name: &str, price: Decimal) -> Essence {
        Essence::new(name, price, "")
    }

    #[test]
    fn forge_catalog_has_seven_essences_in_price_order() {
        let catalog = Catalog::forge();

        let prices: Vec<Decimal> = catalog.iter().map(|e| e.unit_price).collect();

        assert_eq!(
            prices,
            vec![dec!(2.5), dec!(5), dec!(15), dec!(35), dec!(50), dec!(75), dec!(100)]
        );
    }

    #[test]
    fn forge_catalog_passes_validation() {
        let catalog = Catalog::forge();

        let rebuilt = Catalog::new(catalog.essences().to_vec());

        assert_eq!(rebuilt, Ok(catalog));
    }

    #[test]
    fn optimal_is_epica() {
        let catalog = Catalog::forge();

        assert_eq!(catalog.optimal().name, "Épica");
        assert_eq!(catalog.optimal().unit_price, dec!(100));
    }

    #[test]
    fn get_finds_by_exact_name() {
        let catalog = Catalog::forge();

        assert_eq!(catalog.get("Grande").map(|e| e.unit_price), Some(dec!(35)));
        assert!(catalog.get("grande").is_none());
        assert!(!catalog.contains("Legendaria"));
    }

    #[test]
    fn new_rejects_empty_list() {
        assert_eq!(Catalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let result = Catalog::new(vec![essence("A", dec!(1)), essence("A", dec!(2))]);

        assert_eq!(result, Err(CatalogError::DuplicateName("A".to_string())));
    }

    #[test]
    fn new_rejects_zero_price() {
        let result = Catalog::new(vec![essence("A", dec!(0))]);

        assert_eq!(
            result,
            Err(CatalogError::NonPositivePrice {
                name: "A".to_string(),
                price: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_descending_prices() {
        let result = Catalog::new(vec![essence("A", dec!(10)), essence("B", dec!(5))]);

        assert_eq!(
            result,
            Err(CatalogError::OutOfOrder {
                name: "B".to_string()
            })
        );
    }
}
