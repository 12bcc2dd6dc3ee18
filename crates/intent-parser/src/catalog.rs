//! Static product catalog and alias matching.

use crate::normalize::{normalize, tokens};
use crate::{IntentError, Size};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Screen position of a product card. Carried for the UI only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAnchor {
    pub left: String,
    pub top: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Display price, e.g. "$78"
    pub price: String,
    pub tag: String,
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub anchor: Option<CardAnchor>,
}

impl Product {
    /// Canonical name followed by the configured aliases.
    pub fn alias_phrases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// True when every token of some alias occurs inside `normalized`.
    pub fn matches(&self, normalized: &str) -> bool {
        self.alias_phrases().any(|alias| {
            let alias = normalize(alias);
            let alias_tokens = tokens(&alias);
            !alias_tokens.is_empty() && alias_tokens.iter().all(|t| normalized.contains(t))
        })
    }

    /// Descriptive text submitted to the embedding service.
    pub fn embedding_text(&self) -> String {
        let sizes: Vec<&str> = self.sizes.iter().map(Size::code).collect();
        format!(
            "{}. {}. {}. Sizes: {}.",
            self.name,
            self.tag,
            self.description,
            sizes.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, IntentError> {
        if products.is_empty() {
            return Err(IntentError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(IntentError::DuplicateProduct(product.id.clone()));
            }
            if product.sizes.is_empty() {
                return Err(IntentError::NoSizes(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The three-product storefront shipped with the demo.
    pub fn builtin() -> Self {
        Self {
            products: vec![
                product(
                    "stadium-mesh-pants",
                    "Stadium Mesh Pants",
                    "$78",
                    "Training",
                    "Breathable mesh for long sessions.",
                    &["stadium mesh pants", "mesh pants", "stadium pants", "stadium mesh pant"],
                    &[Size::ExtraSmall, Size::Small, Size::Medium, Size::Large, Size::ExtraLarge],
                    ("26%", "30%"),
                ),
                product(
                    "velocity-track-jacket",
                    "Velocity Track Jacket",
                    "$96",
                    "Running",
                    "Lightweight warmth with a sleek fit.",
                    &["velocity track jacket", "track jacket", "velocity jacket"],
                    &[Size::Small, Size::Medium, Size::Large, Size::ExtraLarge],
                    ("52%", "35%"),
                ),
                product(
                    "studio-cargo-shorts",
                    "Studio Cargo Shorts",
                    "$64",
                    "Everyday",
                    "Flexible utility pockets for essentials.",
                    &["studio cargo shorts", "cargo shorts", "studio shorts", "studio cargo short"],
                    &[Size::ExtraSmall, Size::Small, Size::Medium, Size::Large],
                    ("78%", "32%"),
                ),
            ],
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// First product, in catalog order, with an alias fully present in `normalized`.
    pub fn match_product(&self, normalized: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.matches(normalized))
    }

    /// True when any single alias token appears among `tokens`.
    pub fn mentions_alias_token(&self, tokens_in: &[&str]) -> bool {
        self.products.iter().any(|p| {
            p.alias_phrases().any(|alias| {
                let alias = normalize(alias);
                tokens(&alias).iter().any(|t| tokens_in.contains(t))
            })
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    price: &str,
    tag: &str,
    description: &str,
    aliases: &[&str],
    sizes: &[Size],
    anchor: (&str, &str),
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: price.to_string(),
        tag: tag.to_string(),
        description: description.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        sizes: sizes.to_vec(),
        anchor: Some(CardAnchor {
            left: anchor.0.to_string(),
            top: anchor.1.to_string(),
        }),
    }
}

/// Load and validate a catalog from a YAML file with a top-level `products` list.
pub fn load_catalog_file(path: impl AsRef<Path>) -> anyhow::Result<Catalog> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading catalog: {}", path.display()))?;
    let file: CatalogFile = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing catalog yaml: {}", path.display()))?;
    let catalog = Catalog::new(file.products)
        .with_context(|| format!("validating catalog: {}", path.display()))?;
    tracing::info!(
        products = catalog.products().len(),
        "loaded catalog from {}",
        path.display()
    );
    Ok(catalog)
}
