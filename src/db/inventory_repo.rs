// src/db/inventory_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::StockLevelEntry,
    models::inventory::{
        BakeryProductStock, DailyBakeryProduction, Ingredient, InventoryRevisionReport, Product,
        ProductRecipe, Production, ProductionIngredientUsage, Purchase, RevisionTarget,
    },
};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Produtos e receitas (caminho de seed — o catálogo em si não é gerido aqui)
    // ---

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit_price: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, unit_price) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn get_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn add_recipe_line<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        ingredient_id: Uuid,
        amount_per_meshok: Decimal,
    ) -> Result<ProductRecipe, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, ProductRecipe>(
            r#"
            INSERT INTO product_recipes (product_id, ingredient_id, amount_per_meshok)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, ingredient_id)
            DO UPDATE SET amount_per_meshok = $3
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(ingredient_id)
        .bind(amount_per_meshok)
        .fetch_one(executor)
        .await?;
        Ok(line)
    }

    pub async fn get_recipe<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<ProductRecipe>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, ProductRecipe>(
            "SELECT * FROM product_recipes WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    // ---
    // Ingredientes
    // ---

    pub async fn create_ingredient<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit: &str,
        quantity: Decimal,
        low_stock_threshold: Decimal,
    ) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients (name, unit, quantity, low_stock_threshold)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(quantity)
        .bind(low_stock_threshold)
        .fetch_one(executor)
        .await?;
        Ok(ingredient)
    }

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        let ingredients =
            sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(ingredients)
    }

    pub async fn get_ingredient_for_update<'e, E>(
        &self,
        executor: E,
        ingredient_id: Uuid,
    ) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ingredient =
            sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1 FOR UPDATE")
                .bind(ingredient_id)
                .fetch_optional(executor)
                .await?;
        Ok(ingredient)
    }

    /// Soma (ou subtrai) uma quantidade do estoque do ingrediente.
    /// O UPDATE relativo é atômico na linha.
    pub async fn adjust_ingredient_quantity<'e, E>(
        &self,
        executor: E,
        ingredient_id: Uuid,
        delta: Decimal,
    ) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "UPDATE ingredients SET quantity = quantity + $2 WHERE id = $1 RETURNING *",
        )
        .bind(ingredient_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(ingredient)
    }

    /// Correção manual: valor absoluto, não delta.
    pub async fn set_ingredient_quantity<'e, E>(
        &self,
        executor: E,
        ingredient_id: Uuid,
        quantity: Decimal,
    ) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            "UPDATE ingredients SET quantity = $2 WHERE id = $1 RETURNING *",
        )
        .bind(ingredient_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(ingredient)
    }

    // ---
    // Compras
    // ---

    pub async fn insert_purchase<'e, E>(
        &self,
        executor: E,
        ingredient_id: Uuid,
        quantity: Decimal,
        price: Option<Decimal>,
        note: Option<&str>,
    ) -> Result<Purchase, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (ingredient_id, quantity, price, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ingredient_id)
        .bind(quantity)
        .bind(price)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(purchase)
    }

    pub async fn get_purchase_for_update<'e, E>(
        &self,
        executor: E,
        purchase_id: Uuid,
    ) -> Result<Option<Purchase>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let purchase =
            sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE id = $1 FOR UPDATE")
                .bind(purchase_id)
                .fetch_optional(executor)
                .await?;
        Ok(purchase)
    }

    pub async fn delete_purchase<'e, E>(
        &self,
        executor: E,
        purchase_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, AppError> {
        let purchases =
            sqlx::query_as::<_, Purchase>("SELECT * FROM purchases ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(purchases)
    }

    pub async fn purchases_today(&self) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(price), 0) FROM purchases WHERE date::date = CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // ---
    // Produção (consumo de ingredientes por receita)
    // ---

    pub async fn insert_production<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        meshok: Decimal,
        note: Option<&str>,
    ) -> Result<Production, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let production = sqlx::query_as::<_, Production>(
            "INSERT INTO productions (product_id, meshok, note) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(product_id)
        .bind(meshok)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(production)
    }

    pub async fn get_production<'e, E>(
        &self,
        executor: E,
        production_id: Uuid,
    ) -> Result<Option<Production>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let production =
            sqlx::query_as::<_, Production>("SELECT * FROM productions WHERE id = $1")
                .bind(production_id)
                .fetch_optional(executor)
                .await?;
        Ok(production)
    }

    pub async fn delete_production<'e, E>(
        &self,
        executor: E,
        production_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // As linhas de uso caem junto (ON DELETE CASCADE).
        sqlx::query("DELETE FROM productions WHERE id = $1")
            .bind(production_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_usage<'e, E>(
        &self,
        executor: E,
        production_id: Uuid,
        ingredient_id: Uuid,
        quantity_used: Decimal,
    ) -> Result<ProductionIngredientUsage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usage = sqlx::query_as::<_, ProductionIngredientUsage>(
            r#"
            INSERT INTO production_ingredient_usages (production_id, ingredient_id, quantity_used)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(production_id)
        .bind(ingredient_id)
        .bind(quantity_used)
        .fetch_one(executor)
        .await?;
        Ok(usage)
    }

    pub async fn list_usages<'e, E>(
        &self,
        executor: E,
        production_id: Uuid,
    ) -> Result<Vec<ProductionIngredientUsage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usages = sqlx::query_as::<_, ProductionIngredientUsage>(
            "SELECT * FROM production_ingredient_usages WHERE production_id = $1",
        )
        .bind(production_id)
        .fetch_all(executor)
        .await?;
        Ok(usages)
    }

    // ---
    // Estoque de produto acabado
    // ---

    /// UPSERT atômico: cria a linha de estoque do produto se não existir,
    /// senão aplica o delta à quantidade existente.
    pub async fn adjust_product_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        delta: Decimal,
    ) -> Result<BakeryProductStock, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, BakeryProductStock>(
            r#"
            INSERT INTO bakery_product_stock (product_id, quantity)
            VALUES ($1, $2)
            ON CONFLICT (product_id)
            DO UPDATE SET
                quantity = bakery_product_stock.quantity + $2,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(stock)
    }

    pub async fn get_product_stock_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<BakeryProductStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, BakeryProductStock>(
            "SELECT * FROM bakery_product_stock WHERE product_id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    pub async fn set_product_stock<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: Decimal,
    ) -> Result<BakeryProductStock, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock = sqlx::query_as::<_, BakeryProductStock>(
            r#"
            INSERT INTO bakery_product_stock (product_id, quantity)
            VALUES ($1, $2)
            ON CONFLICT (product_id)
            DO UPDATE SET quantity = $2, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(stock)
    }

    pub async fn stock_levels(&self) -> Result<Vec<StockLevelEntry>, AppError> {
        let levels = sqlx::query_as::<_, StockLevelEntry>(
            r#"
            SELECT s.product_id, p.name AS product_name, s.quantity
            FROM bakery_product_stock s
            JOIN products p ON p.id = s.product_id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(levels)
    }

    // ---
    // Produção diária
    // ---

    pub async fn insert_daily_production<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity: Decimal,
        production_date: NaiveDate,
    ) -> Result<DailyBakeryProduction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, DailyBakeryProduction>(
            r#"
            INSERT INTO daily_bakery_productions (product_id, quantity, production_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(production_date)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    pub async fn get_daily_production_for_update<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
    ) -> Result<Option<DailyBakeryProduction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, DailyBakeryProduction>(
            "SELECT * FROM daily_bakery_productions WHERE id = $1 FOR UPDATE",
        )
        .bind(record_id)
        .fetch_optional(executor)
        .await?;
        Ok(record)
    }

    pub async fn update_daily_production_quantity<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
        quantity: Decimal,
    ) -> Result<DailyBakeryProduction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, DailyBakeryProduction>(
            "UPDATE daily_bakery_productions SET quantity = $2 WHERE id = $1 RETURNING *",
        )
        .bind(record_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    /// Transição de mão única: uma vez confirmado, nunca volta.
    pub async fn confirm_daily_production<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
    ) -> Result<DailyBakeryProduction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, DailyBakeryProduction>(
            "UPDATE daily_bakery_productions SET confirmed = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(record_id)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    pub async fn delete_daily_production<'e, E>(
        &self,
        executor: E,
        record_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM daily_bakery_productions WHERE id = $1")
            .bind(record_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Auditoria de correções manuais
    // ---

    pub async fn insert_revision_report<'e, E>(
        &self,
        executor: E,
        target: RevisionTarget,
        target_id: Uuid,
        old_quantity: Decimal,
        new_quantity: Decimal,
        actor: &str,
        note: Option<&str>,
    ) -> Result<InventoryRevisionReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let report = sqlx::query_as::<_, InventoryRevisionReport>(
            r#"
            INSERT INTO inventory_revision_reports
                (target, target_id, old_quantity, new_quantity, actor, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(target)
        .bind(target_id)
        .bind(old_quantity)
        .bind(new_quantity)
        .bind(actor)
        .bind(note)
        .fetch_one(executor)
        .await?;
        Ok(report)
    }

    pub async fn list_revision_reports(&self) -> Result<Vec<InventoryRevisionReport>, AppError> {
        let reports = sqlx::query_as::<_, InventoryRevisionReport>(
            "SELECT * FROM inventory_revision_reports ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }
}
