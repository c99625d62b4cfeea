use std::path::PathBuf;

use colored::Colorize;
use shapedoc_core::ApiRouter;
use shapedoc_openapi::OpenApiExtension;

use crate::error::CliError;

/// Export the OpenAPI document.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SchemaCommand {
    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SchemaCommand {
    /// Build the document for `app` and print it, or write it to `--output`.
    ///
    /// Output is JSON indented with two spaces and ends with a newline.
    pub fn run<S>(&self, extension: &OpenApiExtension, app: &ApiRouter<S>) -> Result<(), CliError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let rendered = render(extension, app)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                println!(
                    "{} Wrote OpenAPI document to {}",
                    "✓".green(),
                    path.display().to_string().bold()
                );
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}

/// The document for `app`, pretty-printed.
pub fn render<S>(extension: &OpenApiExtension, app: &ApiRouter<S>) -> Result<String, CliError>
where
    S: Clone + Send + Sync + 'static,
{
    let document = extension.build_document(app)?;
    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    Ok(rendered)
}
