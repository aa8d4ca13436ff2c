// src/db/orders_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::OrderStats,
    models::orders::{Order, OrderItem, OrderStatus},
};

#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
        order_date: NaiveDate,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (shop_id, order_date) VALUES ($1, $2) RETURNING *",
        )
        .bind(shop_id)
        .bind(order_date)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn add_order_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        product_id: Uuid,
        ordered_quantity: Decimal,
        unit_price: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, product_id, ordered_quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .bind(ordered_quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn get_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    /// Trava a linha do pedido durante a confirmação de entrega, para que
    /// duas confirmações concorrentes do mesmo pedido serializem.
    pub async fn get_order_for_update<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn set_delivered_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        delivered_quantity: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            "UPDATE order_items SET delivered_quantity = $2 WHERE id = $1 RETURNING *",
        )
        .bind(item_id)
        .bind(delivered_quantity)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn update_status_and_received<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
        received_amount: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2, received_amount = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(received_amount)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    /// Linhas (quantidade entregue, preço unitário) de todos os itens de
    /// pedidos entregues ou parcialmente entregues da loja. Base do recálculo
    /// completo da dívida.
    pub async fn delivered_lines_for_shop<'e, E>(
        &self,
        executor: E,
        shop_id: Uuid,
    ) -> Result<Vec<(Decimal, Decimal)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, (Decimal, Decimal)>(
            r#"
            SELECT i.delivered_quantity, i.unit_price
            FROM order_items i
            JOIN orders o ON i.order_id = o.id
            WHERE o.shop_id = $1
              AND o.status IN ('DELIVERED', 'PARTIALLY_DELIVERED')
            "#,
        )
        .bind(shop_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    // Contagens do dia para o painel.
    pub async fn today_stats(&self) -> Result<OrderStats, AppError> {
        let (today_orders, pending, partial, delivered) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'PENDING'),
                    COUNT(*) FILTER (WHERE status = 'PARTIALLY_DELIVERED'),
                    COUNT(*) FILTER (WHERE status = 'DELIVERED')
                FROM orders
                WHERE order_date = CURRENT_DATE
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(OrderStats {
            today_orders,
            pending,
            partial,
            delivered,
        })
    }
}
