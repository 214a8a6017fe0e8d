//! Handler for `docorder context`.

use std::path::Path;

use console::Style;
use docorder_analyzer::locate::LookupOrigin;
use docorder_core::config::AnalyzerConfig;
use docorder_ops::ops_context::{self, ContextEntry};
use miette::Result;

pub fn exec(
    repo: &Path,
    config: &AnalyzerConfig,
    graph: Option<&Path>,
    component: &str,
) -> Result<()> {
    let ctx = ops_context::context(repo, config, graph, component)?;
    let heading = Style::new().bold();

    println!("{}", heading.apply_to(format!("# {}", ctx.id)));
    if let Some(source) = &ctx.source {
        println!("{source}");
    }
    print_section(&heading, "Classes", &ctx.classes);
    print_section(&heading, "Functions", &ctx.functions);
    print_section(&heading, "Methods", &ctx.methods);

    if !ctx.missing.is_empty() {
        println!();
        println!("{}", heading.apply_to("## Not found"));
        for id in &ctx.missing {
            println!("{id}");
        }
    }
    if !ctx.called_by.is_empty() {
        println!();
        println!("{}", heading.apply_to("## Called by"));
        for id in &ctx.called_by {
            println!("{id}");
        }
    }
    Ok(())
}

fn print_section(heading: &Style, title: &str, entries: &[ContextEntry]) {
    if entries.is_empty() {
        return;
    }
    println!();
    println!("{}", heading.apply_to(format!("## {title}")));
    for entry in entries {
        let origin = match entry.origin {
            LookupOrigin::EnclosingClass => "enclosing class",
            LookupOrigin::SameFile => "same file",
            LookupOrigin::OtherFile => "other file",
        };
        println!("### {} ({}, {})", entry.id, entry.relative_path.display(), origin);
        println!("{}", entry.source);
    }
}
