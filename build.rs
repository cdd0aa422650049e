// Compiles data/catalog.ron into a postcard blob plus a phf name index.
//
// The generated `generated_catalog.rs` is included by `src/catalog/bundled.rs`.

use schema::{sprite_url, CreatureRecord, CreatureType, StatBlock};
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: u16,
    name: String,
    types: Vec<CreatureType>,
    stats: StatBlock,
    height: u16,
    weight: u16,
    abilities: Vec<String>,
}

fn main() {
    println!("cargo:rerun-if-changed=data/catalog.ron");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let source = fs::read_to_string("data/catalog.ron").expect("failed to read data/catalog.ron");
    let rows: Vec<CatalogRow> = ron::from_str(&source).expect("failed to parse data/catalog.ron");

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if usize::from(row.id) != index + 1 {
            panic!(
                "catalog.ron must list ids in order; found {} at position {}",
                row.id,
                index + 1
            );
        }
        if row.types.is_empty() || row.types.len() > 2 {
            panic!("{} must have one or two types", row.name);
        }
        if row.abilities.is_empty() {
            panic!("{} must have at least one ability", row.name);
        }
        records.push(CreatureRecord {
            id: row.id,
            image: sprite_url(row.id),
            name: row.name,
            types: row.types,
            stats: row.stats,
            height: row.height,
            weight: row.weight,
            abilities: row.abilities,
        });
    }

    let blob = postcard::to_allocvec(&records).expect("failed to encode catalog with postcard");
    let blob_path = Path::new(&out_dir).join("catalog.postcard");
    fs::write(&blob_path, blob).expect("failed to write catalog blob");

    let mut index = phf_codegen::Map::new();
    for (position, record) in records.iter().enumerate() {
        index.entry(record.name.as_str(), &position.to_string());
    }

    let generated_path = Path::new(&out_dir).join("generated_catalog.rs");
    let mut generated = fs::File::create(&generated_path).expect("failed to create generated_catalog.rs");
    writeln!(
        generated,
        "static CATALOG_BLOB: &[u8] = include_bytes!(concat!(env!(\"OUT_DIR\"), \"/catalog.postcard\"));"
    )
    .expect("write failed");
    writeln!(
        generated,
        "static CATALOG_NAME_INDEX: phf::Map<&'static str, usize> = {};",
        index.build()
    )
    .expect("write failed");
}
