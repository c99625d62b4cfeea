use colored::Colorize;
use shapedoc_core::{ApiRouter, RouteTable};

/// List registered routes.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RoutesCommand {
    /// Include routes hidden from the document
    #[arg(long)]
    pub all: bool,
}

/// One printable row of the route listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLine {
    pub methods: String,
    pub path: String,
    pub endpoint: String,
    pub hidden: bool,
    pub websocket: bool,
}

impl RoutesCommand {
    pub fn run<S>(&self, app: &ApiRouter<S>)
    where
        S: Clone + Send + Sync + 'static,
    {
        let lines = route_lines(app.table(), self.all);
        if lines.is_empty() {
            println!("{}", "No routes registered.".yellow());
            return;
        }

        let width = lines.iter().map(|l| l.methods.len()).max().unwrap_or(0);
        for line in &lines {
            let methods = format!("{:<width$}", line.methods);
            let mut row = format!("{}  {}  {}", methods.cyan(), line.path, line.endpoint.dimmed());
            if line.websocket {
                row.push_str(&format!(" {}", "[ws]".blue()));
            }
            if line.hidden {
                row.push_str(&format!(" {}", "[hidden]".yellow()));
            }
            println!("{row}");
        }
    }
}

/// Rows for every route in registration order.
///
/// Methods are the documented ones; websocket routes show `GET`. Hidden
/// routes are left out unless `all` is set.
pub fn route_lines(table: &RouteTable, all: bool) -> Vec<RouteLine> {
    table
        .rules()
        .iter()
        .filter_map(|rule| {
            let hidden = table
                .meta(rule.endpoint())
                .is_some_and(|meta| meta.is_hidden());
            if hidden && !all {
                return None;
            }
            let methods = if rule.is_websocket() {
                "GET".to_string()
            } else {
                rule.documented_methods()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            Some(RouteLine {
                methods,
                path: rule.openapi_path(),
                endpoint: rule.endpoint().to_string(),
                hidden,
                websocket: rule.is_websocket(),
            })
        })
        .collect()
}
