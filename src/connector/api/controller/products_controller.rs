use anyhow::Result;

use crate::domain::Product;

use super::super::Container;

pub struct ProductsController<'a> {
    container: &'a Container,
}

impl<'a> ProductsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let products = self.container.products_use_case().list().await?;
        Ok(format_product_list(&products))
    }
}

fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products in the catalog.".to_string();
    }

    let mut output = format!("{} products:\n\n", products.len());
    for product in products {
        output.push_str(&format!("  {} ({})\n", product.name, product.id));
        output.push_str(&format!(
            "    Category: {}, Price: {:.2} {}, Stock: {}\n",
            product.category, product.price, product.currency, product.stock
        ));
        let details: Vec<String> = [
            product.brand.as_ref().map(|b| format!("Brand: {}", b)),
            product.color.as_ref().map(|c| format!("Color: {}", c)),
            product.discount.then(|| "On sale".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            output.push_str(&format!("    {}\n", details.join(", ")));
        }
        output.push('\n');
    }
    output
}
