// src/services/inventory_service.rs
//
// Estoque de insumos e de produto acabado. Todo movimento que mexe em
// dinheiro (compra) delega o lado do caixa ao FinanceService dentro da
// mesma transação.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::money::{quantize_money, quantize_qty},
    db::InventoryRepository,
    models::inventory::{
        DailyBakeryProduction, Ingredient, InventoryRevisionReport, Product, ProductRecipe,
        Production, Purchase, RevisionTarget,
    },
    services::FinanceService,
};

#[derive(Clone)]
pub struct InventoryService {
    pool: PgPool,
    inventory_repo: InventoryRepository,
    finance: FinanceService,

    // Tolerância a estoque negativo no consumo de produção. Com a flag
    // desligada o consumo que estouraria o estoque falha a transação inteira.
    allow_negative_stock: bool,
}

impl InventoryService {
    pub fn new(
        pool: PgPool,
        inventory_repo: InventoryRepository,
        finance: FinanceService,
        allow_negative_stock: bool,
    ) -> Self {
        Self {
            pool,
            inventory_repo,
            finance,
            allow_negative_stock,
        }
    }

    // ---
    // Catálogo (caminho de seed)
    // ---

    pub async fn create_product(
        &self,
        name: &str,
        unit_price: Decimal,
    ) -> Result<Product, AppError> {
        self.inventory_repo
            .create_product(&self.pool, name, quantize_money(unit_price))
            .await
    }

    pub async fn add_recipe_line(
        &self,
        product_id: Uuid,
        ingredient_id: Uuid,
        amount_per_meshok: Decimal,
    ) -> Result<ProductRecipe, AppError> {
        let mut tx = self.pool.begin().await?;
        self.inventory_repo
            .get_product(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        let line = self
            .inventory_repo
            .add_recipe_line(
                &mut *tx,
                product_id,
                ingredient_id,
                quantize_qty(amount_per_meshok),
            )
            .await?;
        tx.commit().await?;
        Ok(line)
    }

    pub async fn create_ingredient(
        &self,
        name: &str,
        unit: &str,
        quantity: Decimal,
        low_stock_threshold: Decimal,
    ) -> Result<Ingredient, AppError> {
        self.inventory_repo
            .create_ingredient(
                &self.pool,
                name,
                unit,
                quantize_qty(quantity),
                quantize_qty(low_stock_threshold),
            )
            .await
    }

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        self.inventory_repo.list_ingredients().await
    }

    // ---
    // Compras
    // ---

    /// Compra de insumo: soma ao estoque e, se houver preço, debita o caixa.
    pub async fn record_purchase(
        &self,
        ingredient_id: Uuid,
        quantity: Decimal,
        price: Option<Decimal>,
        note: Option<&str>,
    ) -> Result<Purchase, AppError> {
        let mut tx = self.pool.begin().await?;

        let ingredient = self
            .inventory_repo
            .get_ingredient_for_update(&mut *tx, ingredient_id)
            .await?
            .ok_or(AppError::IngredientNotFound)?;

        let quantity = quantize_qty(quantity);
        let price = price.map(quantize_money);

        let purchase = self
            .inventory_repo
            .insert_purchase(&mut *tx, ingredient.id, quantity, price, note)
            .await?;

        self.inventory_repo
            .adjust_ingredient_quantity(&mut *tx, ingredient.id, quantity)
            .await?;

        if let Some(price) = price {
            self.finance.adjust_balance_in(&mut *tx, -price).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Compra de {} {} de {} registrada",
            quantity,
            ingredient.unit,
            ingredient.name
        );
        Ok(purchase)
    }

    /// Estorno de compra: desfaz exatamente o que a compra fez, estoque e
    /// caixa.
    pub async fn delete_purchase(&self, purchase_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let purchase = self
            .inventory_repo
            .get_purchase_for_update(&mut *tx, purchase_id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        let ingredient = self
            .inventory_repo
            .get_ingredient_for_update(&mut *tx, purchase.ingredient_id)
            .await?
            .ok_or(AppError::IngredientNotFound)?;

        self.inventory_repo
            .delete_purchase(&mut *tx, purchase.id)
            .await?;

        let updated = self
            .inventory_repo
            .adjust_ingredient_quantity(&mut *tx, ingredient.id, -purchase.quantity)
            .await?;
        self.warn_if_low(&updated);

        if let Some(price) = purchase.price {
            self.finance.adjust_balance_in(&mut *tx, price).await?;
        }

        tx.commit().await?;

        tracing::warn!("Compra {} estornada ({})", purchase.id, ingredient.name);
        Ok(())
    }

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, AppError> {
        self.inventory_repo.list_purchases().await
    }

    // ---
    // Produção por receita
    // ---

    /// Produção em meshok: consome cada ingrediente da receita e grava as
    /// linhas de uso, que tornam o estorno exato mesmo se a receita mudar
    /// depois.
    pub async fn record_production(
        &self,
        product_id: Uuid,
        meshok: Decimal,
        note: Option<&str>,
    ) -> Result<Production, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .inventory_repo
            .get_product(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let recipe = self.inventory_repo.get_recipe(&mut *tx, product.id).await?;
        let meshok = quantize_qty(meshok);

        let production = self
            .inventory_repo
            .insert_production(&mut *tx, product.id, meshok, note)
            .await?;

        for line in &recipe {
            let ingredient = self
                .inventory_repo
                .get_ingredient_for_update(&mut *tx, line.ingredient_id)
                .await?
                .ok_or(AppError::IngredientNotFound)?;

            let used = quantize_qty(line.amount_per_meshok * meshok);
            self.inventory_repo
                .insert_usage(&mut *tx, production.id, ingredient.id, used)
                .await?;

            let updated = self
                .inventory_repo
                .adjust_ingredient_quantity(&mut *tx, ingredient.id, -used)
                .await?;

            if updated.quantity.is_sign_negative() {
                if !self.allow_negative_stock {
                    return Err(AppError::InsufficientStock(ingredient.name));
                }
                tracing::warn!(
                    "Ingrediente {} ficou negativo ({}) na produção {}",
                    ingredient.name,
                    updated.quantity,
                    production.id
                );
            }
            self.warn_if_low(&updated);
        }

        tx.commit().await?;

        tracing::info!(
            "Produção de {} meshok de {} registrada",
            meshok,
            product.name
        );
        Ok(production)
    }

    /// Estorno de produção: devolve ao estoque exatamente o que as linhas de
    /// uso dizem que foi consumido.
    pub async fn delete_production(&self, production_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let production = self
            .inventory_repo
            .get_production(&mut *tx, production_id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        let usages = self
            .inventory_repo
            .list_usages(&mut *tx, production.id)
            .await?;

        for usage in &usages {
            self.inventory_repo
                .get_ingredient_for_update(&mut *tx, usage.ingredient_id)
                .await?
                .ok_or(AppError::IngredientNotFound)?;
            self.inventory_repo
                .adjust_ingredient_quantity(&mut *tx, usage.ingredient_id, usage.quantity_used)
                .await?;
        }

        self.inventory_repo
            .delete_production(&mut *tx, production.id)
            .await?;

        tx.commit().await?;

        tracing::warn!(
            "Produção {} estornada, {} ingredientes devolvidos",
            production.id,
            usages.len()
        );
        Ok(())
    }

    // ---
    // Produção diária (estoque de produto acabado)
    // ---

    pub async fn record_daily_production(
        &self,
        product_id: Uuid,
        quantity: Decimal,
        production_date: NaiveDate,
    ) -> Result<DailyBakeryProduction, AppError> {
        let mut tx = self.pool.begin().await?;

        self.inventory_repo
            .get_product(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let quantity = quantize_qty(quantity);
        let record = self
            .inventory_repo
            .insert_daily_production(&mut *tx, product_id, quantity, production_date)
            .await?;

        self.inventory_repo
            .adjust_product_stock(&mut *tx, product_id, quantity)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Edição aplica a DIFERENÇA ao estoque, não o valor absoluto. Registro
    /// confirmado é imutável.
    pub async fn edit_daily_production(
        &self,
        record_id: Uuid,
        new_quantity: Decimal,
    ) -> Result<DailyBakeryProduction, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = self
            .inventory_repo
            .get_daily_production_for_update(&mut *tx, record_id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        if record.confirmed {
            return Err(AppError::ProductionConfirmed);
        }

        let new_quantity = quantize_qty(new_quantity);
        let delta = new_quantity - record.quantity;

        let updated = self
            .inventory_repo
            .update_daily_production_quantity(&mut *tx, record.id, new_quantity)
            .await?;

        if !delta.is_zero() {
            self.inventory_repo
                .adjust_product_stock(&mut *tx, record.product_id, delta)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Confirmação é de mão única e idempotente.
    pub async fn confirm_daily_production(
        &self,
        record_id: Uuid,
    ) -> Result<DailyBakeryProduction, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = self
            .inventory_repo
            .get_daily_production_for_update(&mut *tx, record_id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        let record = if record.confirmed {
            record
        } else {
            self.inventory_repo
                .confirm_daily_production(&mut *tx, record.id)
                .await?
        };

        tx.commit().await?;
        Ok(record)
    }

    pub async fn delete_daily_production(&self, record_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let record = self
            .inventory_repo
            .get_daily_production_for_update(&mut *tx, record_id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        if record.confirmed {
            return Err(AppError::ProductionConfirmed);
        }

        self.inventory_repo
            .delete_daily_production(&mut *tx, record.id)
            .await?;
        self.inventory_repo
            .adjust_product_stock(&mut *tx, record.product_id, -record.quantity)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ---
    // Correção manual com trilha de auditoria
    // ---

    /// Grava o valor ABSOLUTO informado e deixa uma linha de auditoria com o
    /// antes e o depois.
    pub async fn apply_manual_revision(
        &self,
        target: RevisionTarget,
        target_id: Uuid,
        new_quantity: Decimal,
        actor: &str,
        note: Option<&str>,
    ) -> Result<InventoryRevisionReport, AppError> {
        let mut tx = self.pool.begin().await?;
        let new_quantity = quantize_qty(new_quantity);

        let old_quantity = match target {
            RevisionTarget::Ingredient => {
                let ingredient = self
                    .inventory_repo
                    .get_ingredient_for_update(&mut *tx, target_id)
                    .await?
                    .ok_or(AppError::IngredientNotFound)?;
                self.inventory_repo
                    .set_ingredient_quantity(&mut *tx, ingredient.id, new_quantity)
                    .await?;
                ingredient.quantity
            }
            RevisionTarget::ProductStock => {
                // Produto primeiro: sem isso o upsert de estoque estoura a
                // chave estrangeira e o erro sai como 500 em vez de 404.
                self.inventory_repo
                    .get_product(&mut *tx, target_id)
                    .await?
                    .ok_or(AppError::ProductNotFound)?;

                let old = self
                    .inventory_repo
                    .get_product_stock_for_update(&mut *tx, target_id)
                    .await?
                    .map(|s| s.quantity)
                    .unwrap_or(Decimal::ZERO);
                self.inventory_repo
                    .set_product_stock(&mut *tx, target_id, new_quantity)
                    .await?;
                old
            }
        };

        let report = self
            .inventory_repo
            .insert_revision_report(
                &mut *tx,
                target,
                target_id,
                old_quantity,
                new_quantity,
                actor,
                note,
            )
            .await?;

        tx.commit().await?;

        tracing::warn!(
            "Revisão manual de {:?} {}: {} -> {} por {}",
            target,
            target_id,
            old_quantity,
            new_quantity,
            actor
        );
        Ok(report)
    }

    pub async fn list_revision_reports(&self) -> Result<Vec<InventoryRevisionReport>, AppError> {
        self.inventory_repo.list_revision_reports().await
    }

    fn warn_if_low(&self, ingredient: &Ingredient) {
        if ingredient.quantity <= ingredient.low_stock_threshold {
            tracing::warn!(
                "Estoque baixo de {}: {} {} (limite {})",
                ingredient.name,
                ingredient.quantity,
                ingredient.unit,
                ingredient.low_stock_threshold
            );
        }
    }
}
