//! 产品存储层

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::model::{Product, ProductFields, ProductPatch};
use crate::core::error::CoreError;

/// 产品存储接口
///
/// 查不到记录时返回 `None`/`false`，由调用方决定如何处理。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 按插入顺序返回全部产品
    async fn find_all(&self) -> Result<Vec<Product>, CoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CoreError>;
    async fn create(&self, fields: ProductFields) -> Result<Product, CoreError>;
    /// 只替换 patch 中出现的字段，返回更新后的记录
    async fn update_by_id(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CoreError>;
    /// 返回是否真的删除了记录，不存在时不报错
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError>;
}

const PRODUCT_COLUMNS: &str = "id, name, price, category, created_at, updated_at";

/// 基于 PostgreSQL 的实现
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, CoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, CoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, name, price, category) VALUES ($1, $2, $3, $4) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CoreError> {
        // NULL 参数表示保留原值
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = COALESCE($1, name), price = COALESCE($2, price), \
             category = COALESCE($3, category), updated_at = NOW() \
             WHERE id = $4 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(patch.name)
        .bind(patch.price)
        .bind(patch.category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 进程内实现，用于测试和 `--memory` 开发模式
#[derive(Clone, Default)]
pub struct MemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, CoreError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: fields.name,
            price: fields.price,
            category: fields.category,
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<Product>, CoreError> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() != before)
    }
}

/// 存储为空时写入示例产品
pub async fn seed_products(repo: &dyn ProductRepository) -> Result<(), CoreError> {
    if !repo.find_all().await?.is_empty() {
        info!("Product store already contains data, skipping seed");
        return Ok(());
    }

    let samples = [
        ("Fairy Eggplant", 1.00, "vegetable"),
        ("Organic Goddess Melon", 4.99, "fruit"),
        ("Organic Mini Seedless Watermelon", 3.99, "fruit"),
        ("Organic Celery", 1.50, "vegetable"),
        ("Chocolate Whole Milk", 2.69, "dairy"),
    ];

    for (name, price, category) in samples {
        repo.create(ProductFields {
            name: name.to_string(),
            price,
            category: category.to_string(),
        })
        .await?;
    }

    info!("Seeded {} sample products", samples.len());
    Ok(())
}
