use std::fs;
use std::path::Path;

use aggrewrite_encoder::AggregateRewriter;

use super::load_program;

pub fn run(path: &Path, output: Option<&Path>, json: bool) -> Result<(), String> {
    let program = load_program(path)?;
    let rewritten = AggregateRewriter::default()
        .rewrite(&program)
        .map_err(|e| e.to_string())?;

    let text = if json {
        let mut text = serde_json::to_string_pretty(&rewritten)
            .map_err(|e| format!("failed to serialize rewritten program: {}", e))?;
        text.push('\n');
        text
    } else {
        rewritten.to_string()
    };
    match output {
        Some(target) => fs::write(target, text)
            .map_err(|e| format!("failed to write '{}': {}", target.display(), e)),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
