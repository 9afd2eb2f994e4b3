//! `browse` - render the home screen once.

use std::io::Write;

use pocket_shop_core::Product;
use pocket_shop_storefront::firebase::DocumentStore;
use pocket_shop_storefront::screens::{HomeScreen, HomeView, Listing};
use pocket_shop_storefront::state::AppState;
use serde_json::json;

use super::CommandError;

/// Mount the home screen, optionally switch category, and print the result.
///
/// # Errors
///
/// Returns `CommandError::Load` if categories cannot be loaded,
/// `CommandError::UnknownCategory` if `category` is not in the store, or an
/// output error.
pub async fn run(
    state: &AppState,
    category: Option<&str>,
    as_json: bool,
) -> Result<(), CommandError> {
    let screen = state.home_screen();
    screen.mount().await;

    if let Some(name) = category {
        select_by_name(&screen, name).await?;
    }

    let view = screen.view().await;
    screen.unmount().await;

    let listing = match view {
        HomeView::Listing(listing) => listing,
        HomeView::Error { message, .. } => return Err(CommandError::Load(message)),
        HomeView::Spinner => return Err(CommandError::Load("Catalog did not load".to_string())),
    };

    let mut out = std::io::stdout().lock();
    if as_json {
        let body = json!({
            "title": listing.title,
            "categories": listing.categories.iter().map(|chip| json!({
                "id": chip.category.id,
                "name": chip.category.name,
                "selected": chip.selected,
            })).collect::<Vec<_>>(),
            "products": listing.products,
            "error": listing.error,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        render(&mut out, &listing)?;
    }
    Ok(())
}

async fn select_by_name<S: DocumentStore>(
    screen: &HomeScreen<S>,
    name: &str,
) -> Result<(), CommandError> {
    let snapshot = screen.snapshot().await;
    let category = snapshot
        .categories()
        .iter()
        .find(|c| c.is_named(name))
        .ok_or_else(|| CommandError::UnknownCategory(name.to_string()))?;
    screen.select_category(category).await;
    Ok(())
}

fn render(out: &mut impl Write, listing: &Listing) -> std::io::Result<()> {
    let chips: Vec<String> = listing
        .categories
        .iter()
        .map(|chip| {
            if chip.selected {
                format!("[{}]", chip.category.name)
            } else {
                chip.category.name.clone()
            }
        })
        .collect();
    writeln!(out, "Categories: {}", chips.join("  "))?;
    writeln!(out)?;
    writeln!(out, "{}", listing.title)?;

    if let Some(error) = &listing.error {
        writeln!(out, "  ! {error}")?;
    }
    if let Some(message) = listing.empty_message {
        writeln!(out, "  {message}")?;
    }
    for product in &listing.products {
        writeln!(out, "  {}", product_line(product))?;
    }
    Ok(())
}

fn product_line(product: &Product) -> String {
    let price = product
        .price
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    format!("{:<32} {price:>10}", product.display_name())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pocket_shop_core::Category;
    use pocket_shop_storefront::screens::CategoryChip;
    use serde_json::{Map, Value};

    use super::*;

    fn product(id: &str, fields: Value) -> Product {
        let Value::Object(map) = fields else {
            return Product::from_fields(id, Map::new());
        };
        Product::from_fields(id, map)
    }

    #[test]
    fn test_render_listing() {
        let listing = Listing {
            title: "Men's (2 items)".to_string(),
            categories: vec![
                CategoryChip {
                    category: Category::new("c1", "Men's"),
                    selected: true,
                },
                CategoryChip {
                    category: Category::new("c2", "Women's"),
                    selected: false,
                },
            ],
            products: vec![
                product("p1", json!({"name": "Shirt", "price": 20})),
                product("p2", json!({"price": "free"})),
            ],
            loading: false,
            error: None,
            empty_message: None,
        };

        let mut out = Vec::new();
        render(&mut out, &listing).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Categories: [Men's]  Women's\n"));
        assert!(text.contains("Men's (2 items)"));
        assert!(text.contains("Shirt"));
        assert!(text.contains("$20"));
        assert!(text.contains("(unnamed)"));
    }
}
