use super::{AddArgs, CmdError, CmdResult, ContextCommand, OutputFormat, print_structured};
use clusterctx::{ClusterOptions, Context, ContextStore, ContextType, GlobalOptions};
use inquire::Confirm;
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ContextRow {
    #[tabled(rename = "CURRENT")]
    current: &'static str,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    context_type: ContextType,
    #[tabled(rename = "ENDPOINT")]
    endpoint: String,
}

pub fn handle(store: &ContextStore, action: ContextCommand) -> CmdResult<()> {
    match action {
        ContextCommand::List {
            context_type,
            format,
        } => list(store, context_type, format),
        ContextCommand::Get { name, format } => {
            let ctx = store.get_context(&name)?;
            match format {
                OutputFormat::Table => print_table(vec![row(&ctx, false)]),
                _ => print_structured(&ctx, format)?,
            }
            Ok(())
        }
        ContextCommand::Current { context_type } => current(store, context_type),
        ContextCommand::Use { name } => {
            store.set_current_context(&name)?;
            println!("Current context set to '{name}'.");
            Ok(())
        }
        ContextCommand::Unset { context_type } => {
            let name = store.remove_current_context(context_type)?;
            println!("Unset current {context_type} context '{name}'.");
            Ok(())
        }
        ContextCommand::Add(args) => add(store, args),
        ContextCommand::Delete { name, yes } => {
            if !yes {
                let confirmed = Confirm::new(&format!("Delete context '{name}'?"))
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            store.remove_context(&name)?;
            println!("Deleted context '{name}'.");
            Ok(())
        }
    }
}

fn list(
    store: &ContextStore,
    context_type: Option<ContextType>,
    format: OutputFormat,
) -> CmdResult<()> {
    let entries = store.list_contexts(context_type)?;

    match format {
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("No contexts found.");
            } else {
                print_table(entries.iter().map(|(ctx, current)| row(ctx, *current)));
            }
        }
        _ => {
            let contexts: Vec<_> = entries.into_iter().map(|(ctx, _)| ctx).collect();
            print_structured(&contexts, format)?;
        }
    }
    Ok(())
}

fn current(store: &ContextStore, context_type: Option<ContextType>) -> CmdResult<()> {
    if let Some(context_type) = context_type {
        let ctx = store.get_current_context(context_type)?;
        println!("{}", ctx.name.green());
        return Ok(());
    }

    let current = store.current_contexts()?;
    if current.is_empty() {
        println!("No current context set.");
    }
    for (context_type, ctx) in current {
        println!("{context_type}\t{}", ctx.name.green());
    }
    Ok(())
}

fn add(store: &ContextStore, args: AddArgs) -> CmdResult<()> {
    let ctx = match args.context_type {
        ContextType::K8s => Context::cluster(
            &args.name,
            ClusterOptions {
                endpoint: args.endpoint,
                path: args.path.unwrap_or_default(),
                context: args.kube_context.unwrap_or_default(),
                is_management_cluster: args.management,
            },
        ),
        ContextType::Tmc => {
            if args.path.is_some() || args.kube_context.is_some() || args.management {
                return Err(CmdError::Usage(
                    "--path, --kube-context and --management only apply to k8s contexts".into(),
                ));
            }
            Context::global(
                &args.name,
                GlobalOptions {
                    endpoint: args.endpoint,
                },
            )
        }
    };

    store.add_context(ctx, args.current)?;

    if args.current {
        println!("Context '{}' added and set as current.", args.name);
    } else {
        println!("Context '{}' added.", args.name);
    }
    Ok(())
}

fn row(ctx: &Context, current: bool) -> ContextRow {
    ContextRow {
        current: if current { "*" } else { "" },
        name: ctx.name.clone(),
        context_type: ctx.context_type(),
        endpoint: ctx.endpoint().to_string(),
    }
}

fn print_table(rows: impl IntoIterator<Item = ContextRow>) {
    let mut table = Table::new(rows);
    table.with(Style::blank());
    println!("{table}");
}
