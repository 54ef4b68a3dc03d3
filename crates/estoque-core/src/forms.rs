use crate::errors::ValidationError;
use crate::types::{NewCount, NewProduct};

/// Draft of the product registration form.
#[derive(Clone, Debug, Default)]
pub struct ProductForm {
    pub codigo: String,
    pub nome: String,
}

impl ProductForm {
    pub fn new(codigo: impl Into<String>, nome: impl Into<String>) -> Self {
        Self {
            codigo: codigo.into(),
            nome: nome.into(),
        }
    }

    /// Trim both fields and build the request body. Either field trimming
    /// to empty fails validation; no request may be built from it.
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let codigo = self.codigo.trim();
        let nome = self.nome.trim();
        if codigo.is_empty() || nome.is_empty() {
            return Err(ValidationError::MissingProductFields);
        }
        Ok(NewProduct {
            codigo: codigo.to_owned(),
            nome: nome.to_owned(),
        })
    }

    pub fn clear(&mut self) {
        self.codigo.clear();
        self.nome.clear();
    }
}

/// Draft of the count entry form. Fields hold raw operator input; parsing
/// happens at validation time.
#[derive(Clone, Debug, Default)]
pub struct CountForm {
    pub lote: String,
    pub validade_mes: String,
    pub validade_ano: String,
    pub quantidade: String,
}

impl CountForm {
    pub fn validate(&self, produto_codigo: &str) -> Result<NewCount, ValidationError> {
        let lote = self.lote.trim();
        let mes = required_number(&self.validade_mes);
        let ano = required_number(&self.validade_ano);
        let quantidade = required_number(&self.quantidade);

        match (lote.is_empty(), mes, ano, quantidade) {
            (false, Some(mes), Some(ano), Some(quantidade)) => Ok(NewCount {
                produto_codigo: produto_codigo.to_owned(),
                lote: lote.to_owned(),
                validade_mes: mes,
                validade_ano: ano,
                quantidade: i64::from(quantidade),
            }),
            _ => Err(ValidationError::MissingCountFields),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.lote.is_empty()
            && self.validade_mes.is_empty()
            && self.validade_ano.is_empty()
            && self.quantidade.is_empty()
    }

    /// Clear every field individually.
    pub fn clear(&mut self) {
        self.lote.clear();
        self.validade_mes.clear();
        self.validade_ano.clear();
        self.quantidade.clear();
    }
}

/// Required-field check for numeric inputs. A value of exactly 0 is
/// indistinguishable from an empty field and is rejected the same way.
fn required_number(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_form_trims_fields() {
        let form = ProductForm::new("  X1  ", "  Widget  ");
        let new = form.validate().unwrap();
        assert_eq!(new.codigo, "X1");
        assert_eq!(new.nome, "Widget");
    }

    #[test]
    fn product_form_rejects_blank_fields() {
        assert_eq!(
            ProductForm::new("   ", "Widget").validate(),
            Err(ValidationError::MissingProductFields)
        );
        assert_eq!(
            ProductForm::new("X1", "").validate(),
            Err(ValidationError::MissingProductFields)
        );
    }

    #[test]
    fn product_form_clear_empties_both_fields() {
        let mut form = ProductForm::new("X1", "Widget");
        form.clear();
        assert!(form.codigo.is_empty());
        assert!(form.nome.is_empty());
    }

    fn filled_form() -> CountForm {
        CountForm {
            lote: "B1".into(),
            validade_mes: "6".into(),
            validade_ano: "2025".into(),
            quantidade: "10".into(),
        }
    }

    #[test]
    fn count_form_builds_request_body() {
        let new = filled_form().validate("X1").unwrap();
        assert_eq!(new.produto_codigo, "X1");
        assert_eq!(new.lote, "B1");
        assert_eq!(new.validade_mes, 6);
        assert_eq!(new.validade_ano, 2025);
        assert_eq!(new.quantidade, 10);
    }

    #[test]
    fn count_form_rejects_blank_lote() {
        let mut form = filled_form();
        form.lote = "   ".into();
        assert_eq!(
            form.validate("X1"),
            Err(ValidationError::MissingCountFields)
        );
    }

    #[test]
    fn zero_is_treated_as_missing() {
        for field in ["validade_mes", "validade_ano", "quantidade"] {
            let mut form = filled_form();
            match field {
                "validade_mes" => form.validade_mes = "0".into(),
                "validade_ano" => form.validade_ano = "0".into(),
                _ => form.quantidade = "0".into(),
            }
            assert_eq!(
                form.validate("X1"),
                Err(ValidationError::MissingCountFields),
                "zero {field} must be rejected as missing"
            );
        }
    }

    #[test]
    fn non_numeric_input_is_missing() {
        let mut form = filled_form();
        form.quantidade = "ten".into();
        assert_eq!(
            form.validate("X1"),
            Err(ValidationError::MissingCountFields)
        );
    }

    #[test]
    fn negative_input_fails_parsing() {
        let mut form = filled_form();
        form.quantidade = "-5".into();
        assert_eq!(
            form.validate("X1"),
            Err(ValidationError::MissingCountFields)
        );
    }

    #[test]
    fn clear_empties_every_field() {
        let mut form = filled_form();
        form.clear();
        assert!(form.is_blank());
    }
}
