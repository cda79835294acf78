//! # Rosetta
//!
//! Control panel logic for a rose engine lathe driven through a
//! LinuxCNC-style MDI controller: five linear axes (U, V, X, Y, Z), a
//! rotary B axis and a geared pair of spindles.
//!
//! ## Architecture
//!
//! Rosetta is organized as a workspace with multiple crates:
//!
//! 1. **rosetta-core** - Axis identifiers, index modes, number formatting, errors
//! 2. **rosetta-communication** - Controller channels, MDI dispatcher, simulated controller
//! 3. **rosetta-panel** - Parameter store, command formatter, panel event handler
//! 4. **rosetta-settings** - Configuration file
//! 5. **rosetta** - Console driver binary that integrates all crates

pub mod console;

pub use rosetta_communication::{
    CommandChannel, Completion, DispatchConfig, DispatchState, MdiDispatcher, SimulatedBehavior,
    SimulatedController, StatusChannel, TaskMode,
};
pub use rosetta_core::{
    format_number, Axis, ControllerError, Direction, Error, IndexMode, IndexedAxis, LinearAxis,
    PanelError, Result, Sign, Spindle, Target,
};
pub use rosetta_panel::{
    CommandFormatter, HitCounter, PanelHandler, ParameterStore, SpinValue, ValueSource,
};
pub use rosetta_settings::{Config, HelpResource, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    // Stderr keeps stdout free for the console's own replies
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Build a panel bound to a simulated controller.
///
/// The controller handle is returned alongside so callers can inspect what
/// was sent.
pub fn simulated_panel(config: &Config) -> Result<(PanelHandler, SimulatedController)> {
    let controller = SimulatedController::new(TaskMode::Manual);
    let (command, status) = controller.channels();
    let dispatcher = MdiDispatcher::new(
        Box::new(command),
        Box::new(status),
        PanelHandler::dispatch_config(&config.dispatch),
    );
    let panel = PanelHandler::from_config(config, dispatcher)?;
    Ok((panel, controller))
}
