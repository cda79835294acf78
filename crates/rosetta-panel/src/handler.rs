//! Panel event handler
//!
//! One method per widget signal. Value changes land in the
//! [`ParameterStore`]; buttons format commands and hand them to the
//! [`MdiDispatcher`] as one batch. Index counters move only after the
//! controller has confirmed the whole batch, so a failed move is not counted.

use crate::commands::CommandFormatter;
use crate::hit_counter::HitCounter;
use crate::input::ValueSource;
use crate::params::ParameterStore;
use rosetta_communication::{DispatchConfig, MdiDispatcher};
use rosetta_core::{
    Axis, Direction, IndexMode, IndexedAxis, LinearAxis, Result, Sign, Spindle, Target,
};
use rosetta_settings::{Config, DispatchSettings, HelpLinks, HelpResource};

/// Entry points a host toolkit wires its widgets to
pub struct PanelHandler {
    store: ParameterStore,
    dispatcher: MdiDispatcher,
    hits: HitCounter,
    links: HelpLinks,
}

impl PanelHandler {
    /// Handler with built-in start-up values and default help links
    pub fn new(dispatcher: MdiDispatcher) -> Self {
        Self {
            store: ParameterStore::new(),
            dispatcher,
            hits: HitCounter::new(),
            links: HelpLinks::default(),
        }
    }

    /// Handler initialised from a loaded configuration
    pub fn from_config(config: &Config, dispatcher: MdiDispatcher) -> Result<Self> {
        let store = ParameterStore::from_defaults(&config.defaults, config.index.precision())?;
        Ok(Self {
            store,
            dispatcher,
            hits: HitCounter::new(),
            links: config.links.clone(),
        })
    }

    /// Dispatcher timeouts from the configured dispatch section
    pub fn dispatch_config(settings: &DispatchSettings) -> DispatchConfig {
        DispatchConfig {
            mode_timeout: settings.mode_timeout(),
            command_timeout: settings.command_timeout(),
        }
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &MdiDispatcher {
        &self.dispatcher
    }

    pub fn hits(&self) -> &HitCounter {
        &self.hits
    }

    pub fn formatter(&self) -> CommandFormatter<'_> {
        CommandFormatter::new(&self.store)
    }

    pub fn on_feed_rate_changed(&mut self, axis: Axis, source: &impl ValueSource) -> Result<()> {
        self.store.set_feed_rate(axis, source.value())?;
        Ok(())
    }

    pub fn on_index_distance_changed(
        &mut self,
        target: Target,
        source: &impl ValueSource,
    ) -> Result<()> {
        self.store.set_index_distance(target, source.value())?;
        Ok(())
    }

    pub fn on_move_distance_changed(
        &mut self,
        axis: Axis,
        source: &impl ValueSource,
    ) -> Result<()> {
        self.store.set_move_distance(axis, source.value())?;
        Ok(())
    }

    /// Store the primary speed and send both spindle speeds
    pub fn on_primary_speed_changed(&mut self, source: &impl ValueSource) -> Result<()> {
        self.store.set_primary_speed(source.value())?;
        let (primary, secondary) = self.formatter().spindle_speed_commands()?;
        self.dispatcher.dispatch_batch(&[primary, secondary])
    }

    /// Store the secondary percentage and resend the secondary speed only
    pub fn on_speed_percent_changed(&mut self, source: &impl ValueSource) -> Result<()> {
        self.store.set_speed_percent(source.value())?;
        let command = self.formatter().secondary_speed_command()?;
        self.dispatcher.dispatch(&command)
    }

    pub fn on_index_mode_toggled(&mut self, axis: IndexedAxis) -> Result<IndexMode> {
        Ok(self.store.toggle_index_mode(axis)?)
    }

    pub fn on_index_mode_selected(&mut self, axis: IndexedAxis, mode: IndexMode) -> Result<()> {
        self.store.set_index_mode(axis, mode)?;
        Ok(())
    }

    pub fn on_sync_toggled(&mut self, target: Target) -> bool {
        self.store.toggle_sync(target)
    }

    pub fn on_index_enabled_toggled(&mut self, spindle: Spindle) -> bool {
        self.store.toggle_index_enabled(spindle)
    }

    /// Jog a linear axis by its index distance
    pub fn move_linear(&mut self, axis: LinearAxis, sign: Sign) -> Result<()> {
        let command = self.formatter().linear_move(axis, sign)?;
        self.dispatcher.dispatch(&command)?;
        self.store.increment_index_count(Target::from(axis), direction_of(sign));
        Ok(())
    }

    /// Index the B axis by its resolved angle
    pub fn index_b(&mut self, direction: Direction) -> Result<()> {
        let command = self.formatter().rotary_b_move(direction.sign())?;
        self.dispatcher.dispatch(&command)?;
        self.store.increment_index_count(Target::Axis(Axis::B), direction);
        Ok(())
    }

    /// Set both spindle speeds and start them turning
    pub fn start_spindles(&mut self, direction: Direction) -> Result<()> {
        let formatter = self.formatter();
        let (primary, secondary) = formatter.spindle_speed_commands()?;
        let start = formatter.spindle_start(direction);
        self.dispatcher.dispatch_batch(&[primary, secondary, start])
    }

    pub fn stop_spindles(&mut self) -> Result<()> {
        let command = self.formatter().spindle_stop();
        self.dispatcher.dispatch(&command)
    }

    /// Orient both spindles by one index step.
    ///
    /// Sp0 turns by its resolved angle and Sp1 by its own distance read
    /// through the shared mode. Both counters move once the batch completes.
    pub fn index_spindles(&mut self, direction: Direction) -> Result<()> {
        let sp0_degrees = self.store.spindle_index_degrees(Spindle::Sp0)?;
        // `$1` gets Sp1's own angle, not Sp0's, and is indexed in both
        // directions even though the two spindles share one mode.
        let sp1_degrees = self.store.spindle_index_degrees(Spindle::Sp1)?;

        let formatter = self.formatter();
        let (primary, secondary) = formatter.spindle_speed_commands()?;
        let batch = [
            primary,
            secondary,
            formatter.spindle_index(Spindle::Sp0, sp0_degrees, direction)?,
            formatter.spindle_index(Spindle::Sp1, sp1_degrees, direction)?,
        ];
        self.dispatcher.dispatch_batch(&batch)?;

        for spindle in Spindle::ALL {
            self.store.increment_index_count(Target::Spindle(spindle), direction);
        }
        Ok(())
    }

    /// Generic button press, returns the new label
    pub fn on_button_press(&mut self) -> String {
        self.hits.press();
        self.hits.label()
    }

    /// URL for one of the panel's help buttons
    pub fn help_link(&self, resource: HelpResource) -> &str {
        self.links.url(resource)
    }
}

fn direction_of(sign: Sign) -> Direction {
    match sign {
        Sign::Plus => Direction::Forward,
        Sign::Minus => Direction::Reverse,
    }
}
