//! 产品页面渲染
//!
//! 每个函数都是 (数据) -> HTML 的纯函数，由处理器包进 `Html` 返回。

use axum::http::StatusCode;
use std::fmt::Write;

use super::model::{Category, Product};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }
        .container { max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        h1 { color: #333; }
        label { display: block; margin-top: 12px; }
        .error { border-left: 4px solid #dc3545; padding: 10px 15px; background: #fff5f5; }
        a { color: #007bff; text-decoration: none; }
        a:hover { text-decoration: underline; }
"#;

/// 转义 HTML 特殊字符
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn category_options(selected: Option<&str>) -> String {
    let mut options = String::new();
    for category in Category::ALL {
        let value = category.as_str();
        let marker = if selected == Some(value) { " selected" } else { "" };
        let _ = writeln!(
            options,
            r#"            <option value="{value}"{marker}>{value}</option>"#
        );
    }
    options
}

fn product_form(action: &str, submit: &str, product: Option<&Product>) -> String {
    let name = product.map(|p| escape(&p.name)).unwrap_or_default();
    let price = product.map(|p| p.price.to_string()).unwrap_or_default();
    let category = product.map(|p| p.category.as_str());

    format!(
        r#"        <form action="{action}" method="POST">
            <label for="name">Product Name</label>
            <input type="text" name="name" id="name" value="{name}">
            <label for="price">Price (Unit)</label>
            <input type="number" name="price" id="price" min="0" step="0.01" value="{price}">
            <label for="category">Select Category</label>
            <select name="category" id="category">
{options}            </select>
            <button>{submit}</button>
        </form>
"#,
        options = category_options(category),
    )
}

/// 产品列表页
pub fn index(products: &[Product]) -> String {
    let mut body = String::from("        <h1>All Products</h1>\n");
    if products.is_empty() {
        body.push_str("        <p>No products yet.</p>\n");
    } else {
        body.push_str("        <ul>\n");
        for product in products {
            let _ = writeln!(
                body,
                r#"            <li><a href="/products/{}">{}</a></li>"#,
                product.id,
                escape(&product.name)
            );
        }
        body.push_str("        </ul>\n");
    }
    body.push_str("        <a href=\"/products/new\">New Product</a>\n");

    layout("All Products", &body)
}

/// 新建产品表单
pub fn new_form() -> String {
    let body = format!(
        "        <h1>Add A Product</h1>\n{}        <a href=\"/products\">Cancel</a>\n",
        product_form("/products", "Submit", None)
    );
    layout("New Product", &body)
}

/// 产品详情页
pub fn show(product: &Product) -> String {
    let body = format!(
        r#"        <h1>{name}</h1>
        <ul>
            <li>Price: ${price:.2}</li>
            <li>Category: {category}</li>
            <li>Added: {created}</li>
            <li>Last updated: {updated}</li>
        </ul>
        <a href="/products">All Products</a>
        <a href="/products/{id}/edit">Edit Product</a>
        <form action="/products/{id}?_method=DELETE" method="POST">
            <button>Delete</button>
        </form>
"#,
        name = escape(&product.name),
        price = product.price,
        category = escape(&product.category),
        created = product.created_at.to_rfc3339(),
        updated = product.updated_at.to_rfc3339(),
        id = product.id,
    );
    layout(&product.name, &body)
}

/// 编辑产品表单，已预填当前值
pub fn edit_form(product: &Product) -> String {
    let action = format!("/products/{}?_method=PUT", product.id);
    let body = format!(
        "        <h1>Edit Product</h1>\n{}        <a href=\"/products/{}\">Back To Product</a>\n",
        product_form(&action, "Update Product", Some(product)),
        product.id
    );
    layout("Edit Product", &body)
}

/// 错误页面
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"        <h1>{code} {reason}</h1>
        <p class="error">{message}</p>
        <a href="/products">All Products</a>
"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout(reason, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Ruby <Grapefruit>".to_string(),
            price: 1.99,
            category: "fruit".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_index_lists_every_product() {
        let products = vec![sample(), sample()];
        let html = index(&products);
        for product in &products {
            assert!(html.contains(&format!("/products/{}", product.id)));
        }
        assert!(html.contains("Ruby &lt;Grapefruit&gt;"));
        assert!(!html.contains("<Grapefruit>"));
        assert!(index(&[]).contains("No products yet."));
    }

    #[test]
    fn test_forms_offer_fixed_categories() {
        for html in [new_form(), edit_form(&sample())] {
            assert_eq!(html.matches("<option ").count(), 3);
            assert!(html.contains(r#"<option value="fruit""#));
            assert!(html.contains(r#"<option value="vegetable""#));
            assert!(html.contains(r#"<option value="dairy""#));
        }
    }

    #[test]
    fn test_edit_form_is_prefilled() {
        let product = sample();
        let html = edit_form(&product);
        assert!(html.contains(&format!("/products/{}?_method=PUT", product.id)));
        assert!(html.contains(r#"value="1.99""#));
        assert!(html.contains(r#"<option value="fruit" selected>"#));
    }

    #[test]
    fn test_show_has_delete_override() {
        let product = sample();
        let html = show(&product);
        assert!(html.contains(&format!("/products/{}?_method=DELETE", product.id)));
        assert!(html.contains("$1.99"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::NOT_FOUND, "no such product");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("no such product"));
    }
}
