// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree model basics.
//!
//! Build a small tree, collapse and expand a folder, and print the rows each time.
//! Mutations are logged through `tracing`; set `RUST_LOG=debug` to see them.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_model_basics`

use understory_tree_model::{Model, TreeElement, TreeEvent};

fn print_rows(model: &Model<&'static str>) {
    for node in model.rendered() {
        let marker = match (node.collapsible(), node.collapsed()) {
            (false, _) => ' ',
            (true, false) => 'v',
            (true, true) => '>',
        };
        println!(
            "{:indent$}{marker} {}",
            "",
            node.element().unwrap(),
            indent = node.depth() * 2
        );
    }
    println!("({} rows)", model.rendered_len());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut model = Model::new();
    model.subscribe(|event| match event {
        TreeEvent::Splice(splice) => println!(
            "  splice at {}: -{} +{}",
            splice.start,
            splice.delete_count,
            splice.inserted.len()
        ),
        TreeEvent::CollapseStateChanged { deep, .. } => {
            println!("  collapse changed (deep={deep})");
        }
        TreeEvent::RenderNodeCountChanged { .. } => {}
    });

    let root = model.root();
    model
        .set_children(
            root,
            [
                TreeElement::new("src").with_children([
                    TreeElement::new("lib.rs"),
                    TreeElement::new("model").with_children([
                        TreeElement::new("mod.rs"),
                        TreeElement::new("node.rs"),
                    ]),
                ]),
                TreeElement::new("Cargo.toml"),
            ],
        )
        .unwrap();
    print_rows(&model);

    let folder = model.location_of(&"model").unwrap();
    println!("collapse `model`:");
    model.set_collapsed(folder, Some(true), false).unwrap();
    print_rows(&model);

    println!("collapse everything under `src`:");
    let src = model.location_of(&"src").unwrap();
    model.set_collapsed(src, Some(true), true).unwrap();
    print_rows(&model);

    println!("reveal `node.rs`:");
    let node = model.location_of(&"node.rs").unwrap();
    model.expand_to(node).unwrap();
    print_rows(&model);
    println!("`node.rs` is row {:?}", model.list_index(node).unwrap());
}
