//! Sample templates and contexts for tests

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// A template together with a context and the HTML it should render to.
#[derive(Clone, Debug)]
pub struct TemplateFixture {
    pub name: String,
    pub template: String,
    pub context: Value,
    pub expected: String,
}

impl TemplateFixture {
    /// A list page exercising loops, conditions and attribute interpolation
    pub fn product_list() -> Self {
        Self {
            name: "product_list".to_string(),
            template: r#"<template>
<h1>$$(title)</h1>
<p if="products.length > 0 && !hidden">$$(products.length) products</p>
<ul class="$$(theme)-list"><li loop="product in products" if="product.stock > 0" data-id="$$(product.id)">$$(product.name)</li></ul>
<p if="products.length == 0">Nothing here</p>
</template>"#
                .to_string(),
            context: json!({
                "title": "Shop",
                "theme": "dark",
                "products": [
                    { "id": 1, "name": "Tea", "stock": 3 },
                    { "id": 2, "name": "Milk", "stock": 0 },
                    { "id": 3, "name": "Bread", "stock": 12 }
                ]
            }),
            expected: "\n<h1>Shop</h1>\n<p>3 products</p>\n\
                       <ul class=\"dark-list\"><li data-id=\"1\">Tea</li><li data-id=\"3\">Bread</li></ul>\n\n"
                .to_string(),
        }
    }

    /// A nested table where the inner loop reads the outer loop variable
    pub fn nested_table() -> Self {
        Self {
            name: "nested_table".to_string(),
            template: r#"<table><tr loop="row in rows"><td loop="cell in row.cells">$$(row.label)$$(cell)</td></tr></table>"#
                .to_string(),
            context: json!({
                "rows": [
                    { "label": "a", "cells": [1, 2] },
                    { "label": "b", "cells": [3] }
                ]
            }),
            expected: "<table><tr><td>a1</td><td>a2</td></tr><tr><td>b3</td></tr></table>".to_string(),
        }
    }

    /// A template whose expression walks into a missing object
    pub fn broken_path() -> Self {
        Self {
            name: "broken_path".to_string(),
            template: "<p>$$(usr.name)</p>".to_string(),
            context: json!({ "user": { "name": "Ann" } }),
            expected: String::new(),
        }
    }

    /// Write `<name>.html` and `<name>.json` into `dir`, returning both paths
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let template_path = dir.join(format!("{}.html", self.name));
        let context_path = dir.join(format!("{}.json", self.name));

        fs::write(&template_path, &self.template)
            .with_context(|| format!("Failed to write template fixture: {}", self.name))?;
        fs::write(&context_path, serde_json::to_string_pretty(&self.context)?)
            .with_context(|| format!("Failed to write context fixture: {}", self.name))?;

        Ok((template_path, context_path))
    }
}
