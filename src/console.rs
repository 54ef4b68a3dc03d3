use std::io::{self, Write};

use estoque_app::{Modal, ModalKind, Shell, Workflow};
use estoque_core::forms::ProductForm;
use estoque_core::types::{Count, CountPatch, CountRow, Product, Summary};

/// Console rendition of the presentation seam: modals become tagged lines,
/// confirmations become y/N prompts.
pub struct ConsoleShell;

impl Shell for ConsoleShell {
    fn present(&self, modal: Modal) {
        let tag = match modal.kind {
            ModalKind::Success => "ok",
            ModalKind::Error => "error",
            ModalKind::Info => "info",
        };
        println!("[{tag}] {}", modal.message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }

    fn busy_changed(&self, busy: bool) {
        tracing::trace!(busy, "request activity");
    }
}

const HELP: &str = "\
commands:
  product list                       list registered products
  product add CODE NAME...           register a product
  product set ID CODE NAME...        update a product
  product rm ID                      delete a product and its counts
  lookup CODE                        resolve a product for count entry
  count add LOT MONTH YEAR QTY       record a count for the resolved product
  count list [CODE]                  list counts (optionally for one product)
  count set ID FIELD VALUE           update a count (lot|month|year|qty)
  count rm ID                        delete a count
  summary                            refresh and show per-product totals
  export pdf|excel                   save a report to the output directory
  template                           download the import template
  import                             import products from a spreadsheet
  quit                               leave";

pub async fn run(workflow: &Workflow) -> anyhow::Result<()> {
    workflow.start().await;
    println!("estoque console — type 'help' for commands");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !dispatch(workflow, line).await {
            break;
        }
    }
    Ok(())
}

/// One accepted line is one discrete user action. Returns false to leave
/// the loop.
async fn dispatch(workflow: &Workflow, line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["help"] => println!("{HELP}"),

        ["product", "list"] => {
            workflow.reload_products().await;
            print_products(&workflow.products());
        }
        ["product", "add", codigo, nome @ ..] if !nome.is_empty() => {
            let mut form = ProductForm::new(*codigo, nome.join(" "));
            workflow.register_product(&mut form).await;
        }
        ["product", "set", id, codigo, nome @ ..] if !nome.is_empty() => {
            let Some(id) = parse_id(id) else { return true };
            let form = ProductForm::new(*codigo, nome.join(" "));
            workflow.update_product(id, &form).await;
        }
        ["product", "rm", id] => {
            let Some(id) = parse_id(id) else { return true };
            workflow.delete_product(id).await;
        }

        ["lookup", codigo] => {
            workflow.resolve_product(codigo).await;
            match workflow.resolved_product() {
                Some(p) => println!("resolved: {} — {} (count entry open)", p.codigo, p.nome),
                None => println!("no product resolved (count entry hidden)"),
            }
        }

        ["count", "add", lote, mes, ano, qtd] => {
            workflow.stage_count(lote, mes, ano, qtd);
            workflow.submit_count().await;
        }
        ["count", "list"] => {
            workflow.reload_counts().await;
            print_counts(&workflow.counts());
        }
        ["count", "list", codigo] => {
            if let Some(rows) = workflow.counts_for_product(codigo).await {
                print_count_rows(&rows);
            }
        }
        ["count", "set", id, field, value] => {
            let Some(id) = parse_id(id) else { return true };
            let Some(patch) = parse_count_patch(field, value) else {
                println!("usage: count set ID lot|month|year|qty VALUE");
                return true;
            };
            workflow.update_count(id, &patch).await;
        }
        ["count", "rm", id] => {
            let Some(id) = parse_id(id) else { return true };
            workflow.delete_count(id).await;
        }

        ["summary"] => {
            workflow.reload_summary().await;
            match workflow.summary() {
                Some(summary) => print_summary(&summary),
                None => println!("summary unavailable"),
            }
        }

        ["export", "pdf"] => {
            workflow.export_pdf().await;
        }
        ["export", "excel"] => {
            workflow.export_xlsx().await;
        }

        ["template"] => workflow.download_template(),
        ["import"] => workflow.import_products(),

        ["quit"] | ["exit"] => return false,

        _ => println!("unknown command — type 'help'"),
    }
    true
}

fn parse_id(raw: &str) -> Option<i64> {
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            println!("'{raw}' is not a numeric id");
            None
        }
    }
}

fn parse_count_patch(field: &str, value: &str) -> Option<CountPatch> {
    let mut patch = CountPatch::default();
    match field {
        "lot" => patch.lote = Some(value.to_owned()),
        "month" => patch.validade_mes = Some(value.parse().ok()?),
        "year" => patch.validade_ano = Some(value.parse().ok()?),
        "qty" => patch.quantidade = Some(value.parse().ok()?),
        _ => return None,
    }
    Some(patch)
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("no products registered");
        return;
    }
    println!("{:<6} {:<14} nome", "id", "codigo");
    for p in products {
        println!("{:<6} {:<14} {}", p.id, p.codigo, p.nome);
    }
}

fn print_counts(counts: &[Count]) {
    if counts.is_empty() {
        println!("no counts recorded");
        return;
    }
    println!(
        "{:<6} {:<14} {:<20} {:<12} {:>10} validade",
        "id", "codigo", "nome", "lote", "quantidade"
    );
    for c in counts {
        println!(
            "{:<6} {:<14} {:<20} {:<12} {:>10} {}/{}",
            c.id, c.produto.codigo, c.produto.nome, c.lote, c.quantidade, c.validade_mes, c.validade_ano
        );
    }
}

fn print_count_rows(rows: &[CountRow]) {
    if rows.is_empty() {
        println!("no counts for this product");
        return;
    }
    println!("{:<6} {:<12} {:>10} validade", "id", "lote", "quantidade");
    for r in rows {
        println!(
            "{:<6} {:<12} {:>10} {}/{}",
            r.id, r.lote, r.quantidade, r.validade_mes, r.validade_ano
        );
    }
}

fn print_summary(summary: &Summary) {
    println!("{:<14} {:<20} total", "codigo", "nome");
    for row in &summary.produtos {
        println!("{:<14} {:<20} {}", row.codigo, row.nome, row.total_quantidade);
    }
    println!("total geral: {}", summary.total_geral);
}
