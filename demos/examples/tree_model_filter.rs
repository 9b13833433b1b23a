// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtering a large tree and reading a virtualized window of rows.
//!
//! A substring query hides non-matching files; folders use `Recurse`, so they only
//! show when something inside them matches. The filter records match offsets, which
//! a renderer could use for highlighting.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_model_filter`

use understory_tree_model::{
    FilterError, FilterResult, Model, ModelOptions, TreeElement, TreeFilter, Visibility,
};

#[derive(Debug, Default)]
struct Query(String);

impl TreeFilter<String> for Query {
    type Data = usize;

    fn filter(
        &mut self,
        element: &String,
        _parent: Visibility,
    ) -> Result<FilterResult<usize>, FilterError> {
        if self.0.is_empty() {
            return Ok(FilterResult::visible());
        }
        if element.ends_with('/') {
            return Ok(FilterResult::recurse());
        }
        Ok(match element.find(&self.0) {
            Some(at) => FilterResult::with_data(Visibility::Visible, at),
            None => FilterResult::hidden(),
        })
    }
}

const WINDOW: usize = 8;

fn print_window(model: &Model<String, Query>, scroll: usize) {
    let end = (scroll + WINDOW).min(model.rendered_len());
    println!("rows {scroll}..{end} of {}", model.rendered_len());
    for i in scroll..end {
        let node = model.node_at(i).unwrap();
        let name = node.element().unwrap();
        match node.filter_data() {
            Some(at) => println!("  {:>4} {name} (match at {at})", i),
            None => println!("  {:>4} {name}", i),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let folders = (0..50).map(|f| {
        TreeElement::new(format!("dir{f:02}/")).with_children(
            (0..40)
                .map(|i| TreeElement::new(format!("dir{f:02}/file{i:02}.rs")))
                .collect::<Vec<_>>(),
        )
    });
    let mut model = Model::with_options(ModelOptions::new().with_filter(Query::default()));
    let root = model.root();
    model.set_children(root, folders).unwrap();
    print_window(&model, 0);
    print_window(&model, 500);

    model.filter_mut().0 = "file07".into();
    model.refilter().unwrap();
    print_window(&model, 0);

    // Jump to a specific match and scroll it into view.
    let target = model.location_of("dir31/file07.rs").unwrap();
    let row = model.list_index(target).unwrap().unwrap();
    print_window(&model, row.saturating_sub(WINDOW / 2));
}
