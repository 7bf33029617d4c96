//! # Product Catalog
//!
//! The built-in list of products offered on the counting screen. Each form
//! starts from a catalog product and becomes a [`ProductEntry`] once the
//! user types quantities.

use serde::Serialize;

use crate::money::Money;
use crate::types::ProductEntry;

/// Shelf grouping, used only for display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Butter,
    Desserts,
    Juices,
    MilkAndDairy,
    Smoothies,
    Yogurts,
}

/// A product the catalog knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Stable key, independent of the display language.
    pub key: &'static str,
    pub name: &'static str,
    pub unit_price: Money,
    pub pack_size: u32,
    pub category: Category,
}

impl CatalogProduct {
    /// Starts an entry for this product with no quantities.
    pub fn entry(&self) -> ProductEntry {
        ProductEntry::new(self.name, self.unit_price, self.pack_size)
    }
}

const fn product(
    key: &'static str,
    name: &'static str,
    major: i64,
    minor: i64,
    pack_size: u32,
    category: Category,
) -> CatalogProduct {
    CatalogProduct {
        key,
        name,
        unit_price: Money::from_major_minor(major, minor),
        pack_size,
        category,
    }
}

static PRODUCTS: [CatalogProduct; 23] = [
    product("beurre_carton_25kg", "Beurre Carton 25kg", 40, 0, 5, Category::Butter),
    product("flany_caramel_80g", "Flany Caramel 80g", 2, 0, 24, Category::Desserts),
    product("creme_dessert_chocolat_80g", "Crème Dessert Chocolat 80g", 2, 0, 24, Category::Desserts),
    product("panna_cotta_fruits_rouges_80g", "Panna Cotta Fruits Rouges 80g", 2, 50, 24, Category::Desserts),
    product("fresh_o_juice_orange_160g", "Fresh'O Juice Orange 160g", 1, 50, 24, Category::Juices),
    product("lait_demiereme_albane_485g", "Lait Demi-Écrémé Albane 485g", 4, 0, 12, Category::MilkAndDairy),
    product("product_lben_025l", "Lben 0.25L", 3, 50, 12, Category::MilkAndDairy),
    product("leben_sachet_450g", "Leben Sachet 450g", 3, 0, 12, Category::MilkAndDairy),
    product("raib_vanille_450g", "Raib Vanille 450g", 4, 0, 12, Category::MilkAndDairy),
    product("lait_uht_entier_12_litre", "Lait UHT Entier 1/2 Litre", 5, 0, 12, Category::MilkAndDairy),
    product("smoozy_pinacolada_440g", "Smoozy Piña Colada 440g", 6, 0, 12, Category::Smoothies),
    product("moniich_avocat_amande_440g", "Moniich Avocat Amande 440g", 6, 50, 12, Category::Smoothies),
    product("moniich_banane_sachet_215g", "Moniich Banane Sachet 215g", 3, 0, 24, Category::Smoothies),
    product("piko_raibi_grenadine_75g", "Piko Raibi Grenadine 75g", 1, 50, 24, Category::Yogurts),
    product("piko_yaourt_boisson_vanille_140g", "Piko Yaourt Boisson Vanille 140g", 2, 0, 24, Category::Yogurts),
    product("yaourt_boisson_fraise_170g", "Yaourt Boisson Fraise 170g", 2, 0, 24, Category::Yogurts),
    product("raibi_grenadine_165g", "Raibi Grenadine 165g", 2, 0, 24, Category::Yogurts),
    product("moniich_carton_fraise_260g", "Moniich Carton Fraise 260g", 3, 0, 12, Category::Yogurts),
    product("nice_ferme_banane_110g", "Nice Ferme Banane 110g", 1, 50, 24, Category::Yogurts),
    product("yaourt_brosse_fraise_110g", "Yaourt Brassé Fraise 110g", 1, 50, 24, Category::Yogurts),
    product("piko_brosse_banane_60g", "Piko Brassé Banane 60g", 1, 0, 24, Category::Yogurts),
    product("fruits_brosse_cereales_110g", "Fruits Brassé Céréales 110g", 2, 0, 24, Category::Yogurts),
    product("grec_muesli_110g", "Grec Muesli 110g", 2, 0, 24, Category::Yogurts),
];

/// All catalog products in display order.
pub fn products() -> &'static [CatalogProduct] {
    &PRODUCTS
}

/// Looks a product up by its stable key.
pub fn find(key: &str) -> Option<&'static CatalogProduct> {
    PRODUCTS.iter().find(|p| p.key == key)
}

/// One empty entry per catalog product, ready for a counting session.
pub fn blank_entries() -> Vec<ProductEntry> {
    PRODUCTS.iter().map(CatalogProduct::entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_entries;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_is_valid() {
        let entries = blank_entries();
        assert_eq!(entries.len(), 23);
        assert!(validate_entries(&entries).is_ok());
        assert!(entries.iter().all(|e| !e.has_activity()));
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = products().iter().map(|p| p.key).collect();
        assert_eq!(keys.len(), products().len());
    }

    #[test]
    fn test_find() {
        let milk = find("lait_demiereme_albane_485g").unwrap();
        assert_eq!(milk.unit_price, Money::from_cents(400));
        assert_eq!(milk.pack_size, 12);
        assert!(find("unknown").is_none());

        let panna = find("panna_cotta_fruits_rouges_80g").unwrap();
        assert_eq!(panna.entry().unit_price.cents(), 250);
    }
}
