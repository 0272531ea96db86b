//! Script execution

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::Config;
use crate::output::OutputFormat;
use crate::session::Session;

#[derive(Args)]
pub struct RunArgs {
    /// File of REPL commands, one per line
    pub script: PathBuf,

    /// Stop at the first rejected command and exit with an error
    #[arg(long)]
    pub fail_fast: bool,
}

pub fn run(args: &RunArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    tracing::info!("Running script {:?}", args.script);

    let mut session = Session::new(config, format);
    for (lineno, line) in script.lines().enumerate() {
        let reply = session.execute(line);
        for out in &reply.lines {
            println!("{}", out);
        }
        if reply.failed && args.fail_fast {
            anyhow::bail!("{}:{}: command failed", args.script.display(), lineno + 1);
        }
        if reply.exit {
            break;
        }
    }

    Ok(())
}
