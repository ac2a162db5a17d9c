use crate::support::print_json;
use covary_kernel::table::{render_store_table, render_upcast_table};
use covary_kernel::{ArrayKind, ElementKind, store_outcome, upcast_permitted};
use serde_json::{Map, Value, json};

pub fn run(json_output: bool) {
    if json_output {
        let mut upcast = Map::new();
        for actual in ElementKind::ALL {
            let row: Map<String, Value> = ElementKind::ALL
                .iter()
                .map(|declared| {
                    (
                        declared.to_string(),
                        Value::Bool(upcast_permitted(actual, *declared)),
                    )
                })
                .collect();
            upcast.insert(actual.to_string(), Value::Object(row));
        }

        let mut store = Map::new();
        for array in ArrayKind::ALL {
            let row: Map<String, Value> = ElementKind::ALL
                .iter()
                .map(|value| {
                    (
                        value.to_string(),
                        Value::String(store_outcome(array, *value).to_string()),
                    )
                })
                .collect();
            store.insert(array.to_string(), Value::Object(row));
        }

        print_json(&json!({
            "upcastPermitted": upcast,
            "storeOutcomes": store,
        }));
    } else {
        println!("covary tables");
        println!();
        println!("Upcast permitted (rows: actual, columns: declared)");
        println!("{}", render_upcast_table());
        println!();
        println!("Store outcome (rows: array, columns: value)");
        println!("{}", render_store_table());
    }
}
