use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Loja não encontrada")]
    ShopNotFound,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Ingrediente não encontrado")]
    IngredientNotFound,

    #[error("Funcionário não encontrado")]
    EmployeeNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    #[error("Registro não encontrado")]
    RecordNotFound,

    // Quantidade entregue só pode crescer ao longo da vida do pedido.
    #[error("Quantidade entregue não pode diminuir (item {0})")]
    DeliveredQuantityDecreased(uuid::Uuid),

    #[error("Entrega informada para item que não pertence ao pedido")]
    UnknownOrderItem,

    // Produção diária confirmada vira imutável: sem edição, sem exclusão.
    #[error("Produção diária já confirmada, registro imutável")]
    ProductionConfirmed,

    #[error("Estoque insuficiente de {0}")]
    InsufficientStock(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ShopNotFound
            | AppError::OrderNotFound
            | AppError::ProductNotFound
            | AppError::IngredientNotFound
            | AppError::EmployeeNotFound
            | AppError::PaymentNotFound
            | AppError::RecordNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::DeliveredQuantityDecreased(_) | AppError::UnknownOrderItem => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            AppError::ProductionConfirmed | AppError::InsufficientStock(_) => {
                (StatusCode::CONFLICT, self.to_string())
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        assert_eq!(
            AppError::ProductNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ShopNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PaymentNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn consistency_violations_map_to_409() {
        assert_eq!(
            AppError::ProductionConfirmed.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InsufficientStock("farinha".into())
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn delivery_violations_map_to_400() {
        assert_eq!(
            AppError::DeliveredQuantityDecreased(uuid::Uuid::new_v4())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownOrderItem.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_errors_map_to_500() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
