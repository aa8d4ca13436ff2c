pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod orders;
pub mod salary;
pub mod shops;

use rust_decimal::Decimal;
use validator::ValidationError;

// Validação customizada compartilhada pelos payloads com campos Decimal.
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}
