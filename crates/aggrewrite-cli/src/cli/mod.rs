pub mod aggregates;
pub mod rewrite;

use std::fs;
use std::path::Path;

use aggrewrite_ast::Program;
use aggrewrite_parser::{parse_program, ParseError, SrcId};
use ariadne::{Config, Label, Report, ReportKind};
use tracing::debug;

/// Read and parse a program file, rendering parse errors against the source
pub fn load_program(path: &Path) -> Result<Program, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;

    let src = SrcId::from_path(path);
    match parse_program(&content, src) {
        Ok(program) => {
            debug!(
                file = %path.display(),
                statements = program.statements.len(),
                "parsed program"
            );
            Ok(program)
        }
        Err(errors) => Err(format!(
            "Failed to parse '{}'\n{}",
            path.display(),
            render_errors(src, &content, &errors)
        )),
    }
}

fn render_errors(src: SrcId, content: &str, errors: &[ParseError]) -> String {
    let mut output = Vec::new();
    for error in errors {
        let span = error.span();
        let report = Report::build(ReportKind::Error, src, span.start())
            .with_config(Config::default().with_color(false))
            .with_message(error.message())
            .with_label(Label::new(span).with_message(error.message()))
            .finish();
        if report
            .write(ariadne::sources([(src, content.to_string())]), &mut output)
            .is_err()
        {
            let (line, column) = span.line_col(content);
            output.extend_from_slice(
                format!("{}:{}:{}: {}\n", src, line, column, error).as_bytes(),
            );
        }
    }
    String::from_utf8_lossy(&output).into_owned()
}
