use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use estoque_core::errors::StoreError;
use estoque_core::types::{
    Ack, Count, CountPatch, CountReceipt, CountRow, NewCount, NewProduct, Product, ProductRef,
    Summary, SummaryRow,
};

use crate::client::StoreClient;

/// One entry per store route, used for call recording and failure
/// injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    ProductByCode,
    ListCounts,
    CountsForProduct,
    CreateCount,
    UpdateCount,
    DeleteCount,
    Summary,
    ReportPdf,
    ReportXlsx,
}

#[derive(Default)]
struct Inner {
    products: Vec<Product>,
    counts: Vec<CountRow>,
    next_product_id: i64,
    next_count_id: i64,
}

/// In-memory store with the backend's observable semantics: unique product
/// codes, per-(product, lot) merging on count creation, cascade delete, and
/// on-demand summary aggregation. Records every call and supports one-shot
/// failure injection per operation.
pub struct MockStore {
    inner: Mutex<Inner>,
    calls: Mutex<Vec<StoreOp>>,
    failures: Mutex<HashMap<StoreOp, StoreError>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_product_id: 1,
                next_count_id: 1,
                ..Inner::default()
            }),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a product directly, bypassing call recording.
    pub fn seed_product(&self, codigo: &str, nome: &str) -> Product {
        let mut inner = self.inner.lock();
        let product = Product {
            id: inner.next_product_id,
            codigo: codigo.to_owned(),
            nome: nome.to_owned(),
        };
        inner.next_product_id += 1;
        inner.products.push(product.clone());
        product
    }

    /// Insert a count directly, bypassing call recording and merging.
    pub fn seed_count(&self, produto_id: i64, lote: &str, mes: u32, ano: u32, quantidade: i64) -> CountRow {
        let mut inner = self.inner.lock();
        let row = CountRow {
            id: inner.next_count_id,
            produto_id,
            lote: lote.to_owned(),
            validade_mes: mes,
            validade_ano: ano,
            quantidade,
        };
        inner.next_count_id += 1;
        inner.counts.push(row.clone());
        row
    }

    /// Make the next call to `op` fail with `err`; later calls succeed.
    pub fn fail_once(&self, op: StoreOp, err: StoreError) {
        self.failures.lock().insert(op, err);
    }

    pub fn calls(&self) -> Vec<StoreOp> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, op: StoreOp) -> usize {
        self.calls.lock().iter().filter(|&&c| c == op).count()
    }

    pub fn request_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn begin(&self, op: StoreOp) -> Result<(), StoreError> {
        self.calls.lock().push(op);
        match self.failures.lock().remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn produto_nao_encontrado() -> StoreError {
    StoreError::Api {
        status: 404,
        message: "Produto não encontrado".to_owned(),
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.begin(StoreOp::ListProducts)?;
        Ok(self.inner.lock().products.clone())
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, StoreError> {
        self.begin(StoreOp::CreateProduct)?;
        let mut inner = self.inner.lock();
        let codigo = new.codigo.trim().to_owned();
        if inner.products.iter().any(|p| p.codigo == codigo) {
            return Err(StoreError::Api {
                status: 409,
                message: "Produto com este código já existe".to_owned(),
            });
        }
        let product = Product {
            id: inner.next_product_id,
            codigo,
            nome: new.nome.trim().to_owned(),
        };
        inner.next_product_id += 1;
        inner.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, update: &NewProduct) -> Result<Product, StoreError> {
        self.begin(StoreOp::UpdateProduct)?;
        let mut inner = self.inner.lock();
        let codigo = update.codigo.trim().to_owned();
        if inner.products.iter().any(|p| p.codigo == codigo && p.id != id) {
            return Err(StoreError::Api {
                status: 409,
                message: "Produto com este código já existe".to_owned(),
            });
        }
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::Http { status: 404 })?;
        product.codigo = codigo;
        product.nome = update.nome.trim().to_owned();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: i64) -> Result<Ack, StoreError> {
        self.begin(StoreOp::DeleteProduct)?;
        let mut inner = self.inner.lock();
        let pos = inner
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::Http { status: 404 })?;
        inner.products.remove(pos);
        // Cascade: a product's counts go with it.
        inner.counts.retain(|c| c.produto_id != id);
        Ok(Ack {
            mensagem: "Produto deletado com sucesso".to_owned(),
        })
    }

    async fn product_by_code(&self, codigo: &str) -> Result<Product, StoreError> {
        self.begin(StoreOp::ProductByCode)?;
        self.inner
            .lock()
            .products
            .iter()
            .find(|p| p.codigo == codigo)
            .cloned()
            .ok_or_else(produto_nao_encontrado)
    }

    async fn list_counts(&self) -> Result<Vec<Count>, StoreError> {
        self.begin(StoreOp::ListCounts)?;
        let inner = self.inner.lock();
        Ok(inner
            .counts
            .iter()
            .filter_map(|c| {
                let product = inner.products.iter().find(|p| p.id == c.produto_id)?;
                Some(Count {
                    id: c.id,
                    lote: c.lote.clone(),
                    validade_mes: c.validade_mes,
                    validade_ano: c.validade_ano,
                    quantidade: c.quantidade,
                    produto: ProductRef {
                        codigo: product.codigo.clone(),
                        nome: product.nome.clone(),
                    },
                })
            })
            .collect())
    }

    async fn counts_for_product(&self, codigo: &str) -> Result<Vec<CountRow>, StoreError> {
        self.begin(StoreOp::CountsForProduct)?;
        let inner = self.inner.lock();
        let product = inner
            .products
            .iter()
            .find(|p| p.codigo == codigo)
            .ok_or_else(produto_nao_encontrado)?;
        Ok(inner
            .counts
            .iter()
            .filter(|c| c.produto_id == product.id)
            .cloned()
            .collect())
    }

    async fn create_count(&self, new: &NewCount) -> Result<CountReceipt, StoreError> {
        self.begin(StoreOp::CreateCount)?;
        let mut inner = self.inner.lock();
        let produto_id = inner
            .products
            .iter()
            .find(|p| p.codigo == new.produto_codigo)
            .map(|p| p.id)
            .ok_or_else(produto_nao_encontrado)?;

        // An existing (product, lot) row absorbs the submission: quantity
        // is added, expiry replaced.
        if let Some(existing) = inner
            .counts
            .iter_mut()
            .find(|c| c.produto_id == produto_id && c.lote == new.lote)
        {
            existing.quantidade += new.quantidade;
            existing.validade_mes = new.validade_mes;
            existing.validade_ano = new.validade_ano;
            return Ok(CountReceipt {
                mensagem: "Quantidade adicionada ao lote existente".to_owned(),
                contagem: existing.clone(),
            });
        }

        let row = CountRow {
            id: inner.next_count_id,
            produto_id,
            lote: new.lote.trim().to_owned(),
            validade_mes: new.validade_mes,
            validade_ano: new.validade_ano,
            quantidade: new.quantidade,
        };
        inner.next_count_id += 1;
        inner.counts.push(row.clone());
        Ok(CountReceipt {
            mensagem: "Nova contagem registrada".to_owned(),
            contagem: row,
        })
    }

    async fn update_count(&self, id: i64, patch: &CountPatch) -> Result<CountRow, StoreError> {
        self.begin(StoreOp::UpdateCount)?;
        let mut inner = self.inner.lock();
        let (produto_id, current_lote) = inner
            .counts
            .iter()
            .find(|c| c.id == id)
            .map(|c| (c.produto_id, c.lote.clone()))
            .ok_or(StoreError::Http { status: 404 })?;

        if let Some(lote) = &patch.lote {
            let lote = lote.trim();
            if lote != current_lote
                && inner
                    .counts
                    .iter()
                    .any(|c| c.produto_id == produto_id && c.lote == lote)
            {
                return Err(StoreError::Api {
                    status: 409,
                    message: "Lote já existe para este produto".to_owned(),
                });
            }
        }

        let row = inner
            .counts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::Http { status: 404 })?;
        if let Some(lote) = &patch.lote {
            row.lote = lote.trim().to_owned();
        }
        if let Some(mes) = patch.validade_mes {
            row.validade_mes = mes;
        }
        if let Some(ano) = patch.validade_ano {
            row.validade_ano = ano;
        }
        if let Some(quantidade) = patch.quantidade {
            row.quantidade = quantidade;
        }
        Ok(row.clone())
    }

    async fn delete_count(&self, id: i64) -> Result<Ack, StoreError> {
        self.begin(StoreOp::DeleteCount)?;
        let mut inner = self.inner.lock();
        let pos = inner
            .counts
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::Http { status: 404 })?;
        inner.counts.remove(pos);
        Ok(Ack {
            mensagem: "Contagem deletada com sucesso".to_owned(),
        })
    }

    async fn summary(&self) -> Result<Summary, StoreError> {
        self.begin(StoreOp::Summary)?;
        let inner = self.inner.lock();
        let mut produtos: Vec<SummaryRow> = Vec::new();
        let mut ordered: Vec<&Product> = inner.products.iter().collect();
        ordered.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        for product in ordered {
            let total: i64 = inner
                .counts
                .iter()
                .filter(|c| c.produto_id == product.id)
                .map(|c| c.quantidade)
                .sum();
            // Products with no counts have no summary row.
            if inner.counts.iter().any(|c| c.produto_id == product.id) {
                produtos.push(SummaryRow {
                    codigo: product.codigo.clone(),
                    nome: product.nome.clone(),
                    total_quantidade: total,
                });
            }
        }
        let total_geral = produtos.iter().map(|p| p.total_quantidade).sum();
        Ok(Summary {
            produtos,
            total_geral,
        })
    }

    async fn report_pdf(&self) -> Result<Bytes, StoreError> {
        self.begin(StoreOp::ReportPdf)?;
        Ok(Bytes::from_static(b"%PDF-1.4\nmock report\n%%EOF"))
    }

    async fn report_xlsx(&self) -> Result<Bytes, StoreError> {
        self.begin(StoreOp::ReportXlsx)?;
        Ok(Bytes::from_static(b"PK\x03\x04mock-xlsx"))
    }
}
