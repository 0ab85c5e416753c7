use std::path::Path;

use aggrewrite_encoder::{AggregateInfo, AggregateRewritingContext};

use super::load_program;
use crate::{COLOR_RESET, COLOR_YELLOW};

pub fn run(path: &Path) -> Result<(), String> {
    let program = load_program(path)?;
    let context = AggregateRewritingContext::from_program(&program);

    if context.occurrences().is_empty() {
        println!(
            "{}No aggregates found in '{}'{}",
            COLOR_YELLOW,
            path.display(),
            COLOR_RESET
        );
        return Ok(());
    }

    println!(
        "Found {} aggregate(s) in '{}':",
        context.occurrences().len(),
        path.display()
    );
    for info in context.occurrences() {
        print_occurrence(info);
    }
    Ok(())
}

fn print_occurrence(info: &AggregateInfo) {
    println!("{}: {}", info.id(), info.literal());
    println!("  function: {}", info.function());
    println!("  operator: {}", info.operator());
    println!("  bound: {}", info.bound());
    println!("  arguments: {}", info.arguments());
    let dependencies = if info.dependencies().is_empty() {
        "none".to_string()
    } else {
        info.dependencies()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("  dependencies: {}", dependencies);
    println!("  elements: {}", info.elements().len());
}
