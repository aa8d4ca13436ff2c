// src/services/orders_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::money::{quantize_money, quantize_qty},
    db::{InventoryRepository, OrdersRepository, ShopsRepository},
    models::orders::{Order, OrderDetail, OrderStatus},
    services::FinanceService,
};

#[derive(Clone)]
pub struct OrdersService {
    pool: PgPool,
    orders_repo: OrdersRepository,
    shops_repo: ShopsRepository,
    inventory_repo: InventoryRepository,
    finance: FinanceService,
}

impl OrdersService {
    pub fn new(
        pool: PgPool,
        orders_repo: OrdersRepository,
        shops_repo: ShopsRepository,
        inventory_repo: InventoryRepository,
        finance: FinanceService,
    ) -> Self {
        Self {
            pool,
            orders_repo,
            shops_repo,
            inventory_repo,
            finance,
        }
    }

    /// Cria o pedido com os itens, travando o preço unitário corrente de cada
    /// produto. Mudança de preço no catálogo depois disso não afeta pedidos
    /// já criados.
    pub async fn create_order(
        &self,
        shop_id: Uuid,
        order_date: NaiveDate,
        items: &[(Uuid, Decimal)],
    ) -> Result<OrderDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        self.shops_repo
            .get_shop_for_update(&mut *tx, shop_id)
            .await?
            .ok_or(AppError::ShopNotFound)?;

        let order = self
            .orders_repo
            .create_order(&mut *tx, shop_id, order_date)
            .await?;

        let mut created = Vec::with_capacity(items.len());
        for (product_id, quantity) in items {
            let product = self
                .inventory_repo
                .get_product(&mut *tx, *product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;

            let item = self
                .orders_repo
                .add_order_item(
                    &mut *tx,
                    order.id,
                    product.id,
                    quantize_qty(*quantity),
                    product.unit_price,
                )
                .await?;
            created.push(item);
        }

        tx.commit().await?;

        let order_total: Decimal = created.iter().map(|i| i.total_price()).sum();
        tracing::info!(
            "Pedido {} criado para a loja {}: {} itens, total {}",
            order.id,
            shop_id,
            created.len(),
            order_total
        );
        Ok(OrderDetail {
            header: order,
            items: created,
        })
    }

    pub async fn get_order_detail(&self, order_id: Uuid) -> Result<OrderDetail, AppError> {
        let order = self
            .orders_repo
            .get_order(&self.pool, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.orders_repo.list_items(&self.pool, order_id).await?;
        Ok(OrderDetail {
            header: order,
            items,
        })
    }

    /// Confirmação de entrega: atualiza as quantidades entregues, recomputa o
    /// status, grava o recebido acumulado, baixa o estoque de produto pelos
    /// deltas desta confirmação e dispara a reconciliação financeira. Tudo em
    /// uma transação: ou o pedido, o estoque, o pagamento, o caixa e a dívida
    /// mudam juntos, ou nada muda.
    pub async fn confirm_delivery<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        deliveries: &[(Uuid, Decimal)],
        received_amount: Decimal,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .apply_delivery(&mut tx, order_id, deliveries, received_amount)
            .await?;

        // Savepoint aninhado: o orquestrador financeiro roda dentro da mesma
        // transação da entrega.
        self.finance
            .process_order_payment(&mut *tx, order.id)
            .await?;

        let items = self.orders_repo.list_items(&mut *tx, order.id).await?;
        let order = self
            .orders_repo
            .get_order(&mut *tx, order.id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        tx.commit().await?;
        Ok(OrderDetail {
            header: order,
            items,
        })
    }

    /// Entrega total em um passo: todo item recebe entregue = pedido e o
    /// fluxo segue pelo mesmo caminho da confirmação parcial. O recebido
    /// acumulado não muda aqui.
    pub async fn mark_fully_delivered(&self, order_id: Uuid) -> Result<OrderDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .orders_repo
            .get_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;
        let items = self.orders_repo.list_items(&mut *tx, order_id).await?;

        let deliveries: Vec<(Uuid, Decimal)> = items
            .iter()
            // Itens já entregues além do pedido ficam como estão.
            .map(|i| (i.id, i.delivered_quantity.max(i.ordered_quantity)))
            .collect();

        let order = self
            .apply_delivery(&mut tx, order.id, &deliveries, order.received_amount)
            .await?;

        self.finance
            .process_order_payment(&mut *tx, order.id)
            .await?;

        let items = self.orders_repo.list_items(&mut *tx, order.id).await?;
        let order = self
            .orders_repo
            .get_order(&mut *tx, order.id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        tx.commit().await?;
        Ok(OrderDetail {
            header: order,
            items,
        })
    }

    /// Miolo da confirmação, compartilhado entre a parcial e a total.
    /// Pré-condição: roda dentro de uma transação aberta pelo chamador.
    async fn apply_delivery(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        order_id: Uuid,
        deliveries: &[(Uuid, Decimal)],
        received_amount: Decimal,
    ) -> Result<Order, AppError> {
        let order = self
            .orders_repo
            .get_order_for_update(&mut **tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let mut items = self.orders_repo.list_items(&mut **tx, order.id).await?;

        for (item_id, new_delivered) in deliveries {
            let item = items
                .iter_mut()
                .find(|i| i.id == *item_id)
                .ok_or(AppError::UnknownOrderItem)?;

            let new_delivered = quantize_qty(*new_delivered);
            if new_delivered < item.delivered_quantity {
                return Err(AppError::DeliveredQuantityDecreased(item.id));
            }

            let stock_delta = new_delivered - item.delivered_quantity;
            if stock_delta.is_zero() {
                continue;
            }

            self.orders_repo
                .set_delivered_quantity(&mut **tx, item.id, new_delivered)
                .await?;
            item.delivered_quantity = new_delivered;

            // O estoque de produto só responde pelo delta desta confirmação,
            // nunca pelo acumulado.
            let stock = self
                .inventory_repo
                .adjust_product_stock(&mut **tx, item.product_id, -stock_delta)
                .await?;
            if stock.quantity.is_sign_negative() {
                tracing::warn!(
                    "Estoque do produto {} ficou negativo ({}) após entrega do pedido {}",
                    item.product_id,
                    stock.quantity,
                    order.id
                );
            }
        }

        let pairs: Vec<(Decimal, Decimal)> = items
            .iter()
            .map(|i| (i.delivered_quantity, i.ordered_quantity))
            .collect();
        let status = OrderStatus::from_deliveries(&pairs);

        let order = self
            .orders_repo
            .update_status_and_received(&mut **tx, order.id, status, quantize_money(received_amount))
            .await?;

        tracing::info!(
            "Entrega do pedido {} confirmada: status {:?}, recebido {}",
            order.id,
            order.status,
            order.received_amount
        );
        Ok(order)
    }
}
