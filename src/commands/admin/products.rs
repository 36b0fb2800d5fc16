//! `mensa admin products` — catalog management

use anyhow::{Context, Result};

use crate::api::{ApiClient, PageRequest};
use crate::session::Session;

/// List products with pagination and optional search
pub async fn list(
    client: &ApiClient,
    session: &Session,
    search: Option<&str>,
    page: u32,
    page_size: u32,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let request = PageRequest {
        start: page.saturating_sub(1) * page_size,
        limit: page_size,
    };
    let envelope = client.list_products(search, request).await?;

    if envelope.data.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &envelope.data {
        println!(
            "{:<28} {:<16} {}",
            product.name,
            product
                .category
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("-"),
            product.document_id
        );
    }

    if let Some(total) = envelope
        .meta
        .and_then(|m| m.pagination)
        .and_then(|p| p.total)
    {
        println!("\n{} product(s) total.", total);
    }
    Ok(())
}

/// Show one product
pub async fn show(client: &ApiClient, session: &Session, product_id: &str) -> Result<()> {
    super::super::require_admin(session).await?;

    let product = client.get_product(product_id).await?;
    println!("Id:       {}", product.document_id);
    println!("Name:     {}", product.name);
    println!(
        "Category: {}",
        product
            .category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("-")
    );
    Ok(())
}

/// Create a product under a category, matched by name
pub async fn create(
    client: &ApiClient,
    session: &Session,
    name: &str,
    category: &str,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let category_id = resolve_category(client, category).await?;
    let product = client.create_product(name, &category_id).await?;
    println!("Created product {} ({}).", product.name, product.document_id);
    Ok(())
}

pub async fn update(
    client: &ApiClient,
    session: &Session,
    product_id: &str,
    name: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    super::super::require_admin(session).await?;

    if name.is_none() && category.is_none() {
        anyhow::bail!("nothing to update, pass --name or --category");
    }

    let category_id = match category {
        Some(category) => Some(resolve_category(client, category).await?),
        None => None,
    };
    let product = client
        .update_product(product_id, name, category_id.as_deref())
        .await?;
    println!("Updated product {}.", product.name);
    Ok(())
}

pub async fn delete(client: &ApiClient, session: &Session, product_id: &str) -> Result<()> {
    super::super::require_admin(session).await?;

    client.delete_product(product_id).await?;
    println!("Deleted product {}.", product_id);
    Ok(())
}

/// List categories in display order
pub async fn categories(client: &ApiClient, session: &Session) -> Result<()> {
    super::super::require_admin(session).await?;

    for category in client.list_categories().await? {
        println!("{:<16} {}", category.name, category.document_id);
    }
    Ok(())
}

async fn resolve_category(client: &ApiClient, name: &str) -> Result<String> {
    let categories = client.list_categories().await?;
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.document_id.clone())
        .with_context(|| {
            format!(
                "unknown category '{}' (available: {})",
                name,
                categories
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
}
