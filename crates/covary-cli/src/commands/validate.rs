use crate::support::print_json;
use covary_kernel::validate_tables;
use serde_json::json;

pub fn run(json_output: bool) {
    let result = validate_tables();
    if json_output {
        print_json(&json!({
            "valid": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        }));
    } else {
        match &result {
            Ok(()) => println!("covary validate: tables valid"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    if result.is_err() {
        std::process::exit(1);
    }
}
