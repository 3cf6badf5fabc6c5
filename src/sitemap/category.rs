//! Sitemap categories and the category-keyed collection type

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Coarse bucket assigned to a sitemap, and transitively to its pages
///
/// Variant order is the order buckets appear in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pages,
    Products,
    Categories,
    Brands,
    News,
    Other,
}

impl Category {
    /// Every category, in output order
    pub const ALL: [Category; 6] = [
        Category::Pages,
        Category::Products,
        Category::Categories,
        Category::Brands,
        Category::News,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Brands => "brands",
            Self::News => "news",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-string rules, checked in order after the path rule
const QUERY_RULES: [(&str, Category); 4] = [
    ("pages", Category::Pages),
    ("categories", Category::Categories),
    ("brands", Category::Brands),
    ("news", Category::News),
];

/// Categorizes a sitemap URL
///
/// Rules are applied in priority order and the first match wins:
///
/// 1. path contains `product-sitemap` → `products`
/// 2. query contains `pages` → `pages`
/// 3. query contains `categories` → `categories`
/// 4. query contains `brands` → `brands`
/// 5. query contains `news` → `news`
/// 6. otherwise → `other`
///
/// Matching is a plain substring test on the raw component, so
/// `?foo=pages-info` still lands in `pages`. Strings that do not parse as
/// absolute URLs fall through to `other`.
///
/// # Examples
///
/// ```
/// use canon_sweep::sitemap::{categorize, Category};
///
/// assert_eq!(categorize("https://example.com/product-sitemap1.xml"), Category::Products);
/// assert_eq!(categorize("https://example.com/sitemap.xml?brands=1"), Category::Brands);
/// assert_eq!(categorize("https://example.com/foo.xml"), Category::Other);
/// ```
pub fn categorize(sitemap_url: &str) -> Category {
    let parsed = match Url::parse(sitemap_url) {
        Ok(url) => url,
        Err(_) => return Category::Other,
    };

    if parsed.path().contains("product-sitemap") {
        return Category::Products;
    }

    let query = parsed.query().unwrap_or("");
    QUERY_RULES
        .iter()
        .find(|(needle, _)| query.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

/// Ordered values grouped by category
///
/// Every category key exists from construction, so consumers always see all
/// six buckets even when most are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap<T> {
    buckets: BTreeMap<Category, Vec<T>>,
}

impl<T> CategoryMap<T> {
    /// Creates a map with an empty bucket for every category
    pub fn new() -> Self {
        Self {
            buckets: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Appends a value to the end of a category bucket
    pub fn push(&mut self, category: Category, value: T) {
        self.buckets.entry(category).or_default().push(value);
    }

    /// Appends values to the end of a category bucket, keeping their order
    pub fn extend<I>(&mut self, category: Category, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.buckets.entry(category).or_default().extend(values);
    }

    /// Returns the values of one category in insertion order
    pub fn get(&self, category: Category) -> &[T] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over every bucket in category order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[T])> {
        self.buckets.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Iterates over every value across all buckets
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.buckets.values().flatten()
    }

    /// Total number of values across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of values per category
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.get(*c).len()))
            .collect()
    }
}

impl<T> Default for CategoryMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
