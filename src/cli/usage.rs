use console::style;

use va::aliases::AliasRegistry;

const COLUMN_PADDING: usize = 2;
const ARROW: &str = "=>";

/**
    Renders all aliases as aligned `short => target (description)` rows.
*/
pub fn render_registry(registry: &AliasRegistry) -> String {
    let short_width = registry
        .iter()
        .map(|alias| alias.short().len())
        .max()
        .unwrap_or_default()
        + COLUMN_PADDING;
    let arrow_width = ARROW.len() + COLUMN_PADDING;

    let mut lines = Vec::with_capacity(registry.len());
    for alias in registry {
        let mut line = format!(
            "{:<short_width$}{ARROW:<arrow_width$}{}",
            alias.short(),
            alias.target()
        );
        if !alias.description().is_empty() {
            line.push_str(&format!(" ({})", alias.description()));
        }
        lines.push(line);
    }

    lines.join("\n")
}

pub fn print_missing_module(registry: &AliasRegistry) {
    eprintln!(
        "{} No supplied path.\n",
        style("ERROR:").for_stderr().red().bold()
    );
    eprintln!(
        "{}\n",
        style("Registered short paths:").for_stderr().bold()
    );
    eprintln!("{}\n", render_registry(registry));
}
