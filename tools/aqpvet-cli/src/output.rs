//! Output formatting for the CLI.

use aqpvet_commerce::cart::LineItem;
use console::{pad_str, style, truncate_str, Alignment};

/// Column widths of the cart table: id, product, qty, unit price, subtotal.
const CART_COLUMNS: [usize; 5] = [8, 28, 5, 20, 12];
const CART_HEADINGS: [&str; 5] = ["ID", "PRODUCT", "QTY", "UNIT", "SUBTOTAL"];

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print the cart lines as a table.
    pub fn line_items<'a>(&self, items: impl IntoIterator<Item = &'a LineItem>) {
        if self.json {
            return;
        }
        println!("  {}", style(cart_row(&CART_HEADINGS.map(String::from))).dim());
        for item in items {
            println!("  {}", cart_row(&line_item_cells(item)));
        }
    }

    /// Print a block of labelled amounts, the last one emphasized.
    pub fn totals(&self, rows: &[(&str, String)]) {
        if self.json {
            return;
        }
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (i, (label, value)) in rows.iter().enumerate() {
            let label = pad_str(label, width, Alignment::Left, None);
            if i + 1 == rows.len() {
                println!("  {}  {}", style(label).bold(), style(value).bold());
            } else {
                println!("  {}  {}", style(label).dim(), value);
            }
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Table cells for one cart line.
fn line_item_cells(item: &LineItem) -> [String; 5] {
    let unit = item.unit_price.display();
    let price = if item.is_discounted() {
        let list = item.list_price.display();
        format!("{} {}", unit, style(list).dim().strikethrough())
    } else {
        unit
    };
    [
        item.product_id.as_str().to_string(),
        item.name.clone(),
        item.quantity.to_string(),
        price,
        item.subtotal().display(),
    ]
}

/// Lay out cells at the cart column widths, truncating long values.
///
/// Widths are measured without ANSI escapes.
fn cart_row(cells: &[String; 5]) -> String {
    let mut row: Vec<String> = cells[..4]
        .iter()
        .zip(&CART_COLUMNS[..4])
        .map(|(cell, &width)| {
            let cell = truncate_str(cell, width, "…");
            pad_str(&cell, width, Alignment::Left, None).into_owned()
        })
        .collect();
    row.push(pad_str(&cells[4], CART_COLUMNS[4], Alignment::Right, None).into_owned());
    row.join("  ")
}
