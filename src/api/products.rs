//! Product catalog and categories

use serde::Deserialize;
use serde_json::json;

use super::menus::Category;
use super::{ApiClient, ApiError, Envelope, PageRequest, Query};

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
}

impl ApiClient {
    /// Page through products, optionally matching a case-insensitive search
    /// over name and category name
    ///
    /// The full envelope is returned so callers can read the pagination
    /// totals when walking the catalog.
    pub async fn list_products(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Envelope<Vec<Product>>, ApiError> {
        let mut query = Query::new()
            .populate(0, "category")
            .paginate(page.start, page.limit);
        if let Some(term) = search {
            query = query
                .or_contains(0, "name", term)
                .relation_or_contains(1, "category", "name", term);
        }

        self.get("api/items", &query).await
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self
            .get(
                &format!("api/items/{}", product_id),
                &Query::new().populate(0, "category"),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn create_product(
        &self,
        name: &str,
        category_id: &str,
    ) -> Result<Product, ApiError> {
        let envelope: Envelope<Product> = self
            .post(
                "api/items",
                &Query::new().populate(0, "category"),
                json!({ "data": { "name": name, "category": category_id } }),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn update_product(
        &self,
        product_id: &str,
        name: Option<&str>,
        category_id: Option<&str>,
    ) -> Result<Product, ApiError> {
        let mut data = json!({});
        if let Some(name) = name {
            data["name"] = json!(name);
        }
        if let Some(category_id) = category_id {
            data["category"] = json!(category_id);
        }

        let envelope: Envelope<Product> = self
            .put(
                &format!("api/items/{}", product_id),
                &Query::new().populate(0, "category"),
                json!({ "data": data }),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("api/items/{}", product_id)).await
    }

    /// All categories in display order
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let envelope: Envelope<Vec<Category>> = self
            .get("api/categories", &Query::new().raw("sort", "order"))
            .await?;
        Ok(envelope.data)
    }
}
