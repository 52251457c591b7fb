mod builder;
mod field;
mod output;
mod schema;
mod session;
mod step;
mod suggest;
mod tui;

use std::io;

use clap::Parser;

use crate::schema::Schema;

#[derive(Parser, Debug)]
#[command(name = "cw")]
#[command(about = "Interactive wizard for schema-driven configuration")]
struct Args {
    /// Name of the schema to configure (e.g. "plotworld")
    #[arg(required = true)]
    schema: String,

    /// Print the parsed schema and exit
    #[arg(long)]
    debug: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let schema = match Schema::load(&args.schema) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if args.debug {
        eprintln!("=== Schema '{}' ({} fields) ===", schema.target, schema.fields.len());
        for spec in &schema.fields {
            eprintln!(
                "  {} [{}] default: {:?} - {}",
                spec.name,
                spec.kind.tag(),
                spec.default,
                spec.description
            );
        }
        return Ok(());
    }

    // An empty field list is fine: the wizard opens directly on the review
    match tui::run(&schema)? {
        Some((rendered, mode)) => {
            if let Err(e) = output::handle_output(&rendered, &schema.target, mode) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            // User quit without finishing
        }
    }

    Ok(())
}
