use std::collections::BTreeMap;

use firesynth_core::{ColumnSpec, Entity};

fn main() {
    let contract: BTreeMap<&str, &[ColumnSpec]> = Entity::ALL
        .iter()
        .map(|entity| (entity.name(), entity.columns()))
        .collect();
    let json = serde_json::to_string_pretty(&contract).expect("serialize column contract");
    println!("{json}");
}
