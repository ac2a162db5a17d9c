use crate::support::{parse_array_kind_or_exit, parse_kind_or_exit, print_json};
use covary_kernel::{CaseResult, StoreCase, Universe, run_store_case};
use serde_json::json;

pub struct Args {
    pub array: String,
    pub value: String,
    pub declared_array: Option<String>,
    pub declared_value: Option<String>,
    pub index: i64,
    pub length: usize,
    pub json: bool,
}

pub fn run(args: Args) {
    let case = StoreCase {
        array: parse_array_kind_or_exit(&args.array),
        value: parse_kind_or_exit(&args.value),
        declared_array: args.declared_array.as_deref().map(parse_kind_or_exit),
        declared_value: args.declared_value.as_deref().map(parse_kind_or_exit),
        length: args.length,
        index: args.index,
    };
    let result = run_store_case(&Universe::standard(), &case);

    if args.json {
        print_json(&json!({
            "case": {
                "array": case.array,
                "value": case.value,
                "declaredArray": case.declared_array(),
                "declaredValue": case.declared_value(),
                "length": case.length,
                "index": case.index,
            },
            "result": result,
        }));
        return;
    }

    println!(
        "covary store {} <- {} (declared {} <- {})",
        case.array,
        case.value,
        case.declared_array(),
        case.declared_value()
    );
    println!("  Slot: {} of {}", case.index, case.length);
    match &result {
        CaseResult::Stored => println!("  Result: stored"),
        CaseResult::NotApplicable { reason } => {
            println!("  Result: not applicable");
            println!("  Reason: {reason}");
        }
        CaseResult::Failed { class, message } => {
            println!("  Result: failed ({class})");
            println!("  Reason: {message}");
        }
    }
}
