use serde::{Deserialize, Serialize};

/// A stock-keeping unit. `codigo` is the unique business key; lookups go
/// through it, never through the server-assigned `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub codigo: String,
    pub nome: String,
}

/// The product fields embedded in a count listing row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub codigo: String,
    pub nome: String,
}

/// Request body for product creation and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub codigo: String,
    pub nome: String,
}

/// A recorded physical count as returned by the count listing, with its
/// product embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub id: i64,
    pub lote: String,
    pub validade_mes: u32,
    pub validade_ano: u32,
    pub quantidade: i64,
    pub produto: ProductRef,
}

/// A count row without the embedded product, as returned by the
/// per-product listing and by count create/update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub id: i64,
    pub produto_id: i64,
    pub lote: String,
    pub validade_mes: u32,
    pub validade_ano: u32,
    pub quantidade: i64,
}

/// Request body for count submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCount {
    pub produto_codigo: String,
    pub lote: String,
    pub validade_mes: u32,
    pub validade_ano: u32,
    pub quantidade: i64,
}

/// Partial update for an existing count. Absent fields are left untouched
/// by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validade_mes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validade_ano: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantidade: Option<i64>,
}

/// Response to a count submission. `mensagem` is shown to the operator
/// verbatim — the store words it differently for a fresh row vs. a merge
/// into an existing lot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReceipt {
    pub mensagem: String,
    pub contagem: CountRow,
}

/// Delete acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub mensagem: String,
}

/// One aggregated summary row: total quantity across all counts of a
/// product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub codigo: String,
    pub nome: String,
    pub total_quantidade: i64,
}

/// Per-product totals plus the grand total. Derived by the store, never
/// cached beyond a single render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub produtos: Vec<SummaryRow>,
    pub total_geral: i64,
}

impl Summary {
    pub fn computed_total(&self) -> i64 {
        self.produtos.iter().map(|p| p.total_quantidade).sum()
    }

    /// The store's grand total must equal the sum of its own rows.
    pub fn is_consistent(&self) -> bool {
        self.total_geral == self.computed_total()
    }
}
