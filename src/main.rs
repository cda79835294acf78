use anyhow::Context;
use rosetta::console::{self, Reply};
use rosetta::{init_logging, simulated_panel, Config, BUILD_DATE, VERSION};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("Rosetta {} (built {})", VERSION, BUILD_DATE);

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => Config::default_path()?,
    };
    let config = Config::load_or_default(&path)
        .with_context(|| format!("loading settings from {}", path.display()))?;

    let (mut panel, controller) =
        simulated_panel(&config).context("building panel from settings")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading console input")?;
        if line.trim().is_empty() {
            continue;
        }

        let action = match console::parse_action(&line) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!("{:#}", e);
                continue;
            }
        };

        let sent_before = controller.sent_commands().len();
        match console::execute(&mut panel, action) {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) => writeln!(stdout, "{}", text)?,
            Ok(Reply::Done) => {}
            Err(e) => tracing::error!("{}", e),
        }

        for command in controller.sent_commands().iter().skip(sent_before) {
            writeln!(stdout, "> {}", command)?;
        }
        stdout.flush()?;
    }

    Ok(())
}
