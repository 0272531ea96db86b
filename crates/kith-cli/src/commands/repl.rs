//! Interactive session

use std::io::{self, BufRead, IsTerminal, Write};

use crate::config::Config;
use crate::output::OutputFormat;
use crate::session::Session;

/// Read commands from stdin until `exit` or end of input
///
/// The prompt is only printed when stdin is a terminal, so piped input
/// produces clean output.
pub fn run(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    let mut session = Session::new(config, format);

    tracing::debug!("Starting REPL (interactive: {})", interactive);

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(stdout, "{}", config.prompt)?;
            stdout.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let reply = session.execute(&line?);
        for out in &reply.lines {
            writeln!(stdout, "{}", out)?;
        }
        if reply.exit {
            break;
        }
    }

    tracing::debug!("Session ended with {} users", session.registry().len());
    Ok(())
}
