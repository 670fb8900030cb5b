use super::{CmdResult, ServerCommand};
use clusterctx::{ContextStore, Server};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ENDPOINT")]
    endpoint: String,
    #[tabled(rename = "PATH")]
    path: String,
    #[tabled(rename = "CONTEXT")]
    context: String,
    #[tabled(rename = "MANAGEMENT")]
    management: bool,
}

impl From<Server> for ServerRow {
    fn from(server: Server) -> Self {
        Self {
            name: server.name,
            endpoint: server.opts.endpoint,
            path: server.opts.path,
            context: server.opts.context,
            management: server.opts.is_management_cluster,
        }
    }
}

pub fn handle(store: &ContextStore, action: ServerCommand) -> CmdResult<()> {
    match action {
        ServerCommand::Current => {
            let server = store.get_current_server()?;
            println!("Current server: {}", server.name.green());
        }
        ServerCommand::List => {
            let servers = store.list_servers()?;
            if servers.is_empty() {
                println!("No servers found.");
                return Ok(());
            }

            let mut table = Table::new(servers.into_iter().map(ServerRow::from));
            table.with(Style::blank());
            println!("{table}");
        }
    }
    Ok(())
}
