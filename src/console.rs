//! Line-oriented console for driving a panel without a GUI
//!
//! Each input line names one panel action:
//!
//! ```text
//! x+ / x-  (any of u v x y z)   jog a linear axis by its index distance
//! b+ / b-                       index the B axis
//! sp fwd | sp rev | sp stop     run or stop both spindles
//! sp idx+ | sp idx-             index both spindles
//! set <target>.<field> <value>  field is idx, feed or move; target b, sp0, sp1 or a letter
//!                               (sp0.feed is the spindle speed)
//! mode <b|sp0> [deg|div]        toggle or select an index mode
//! speed <value> | pct <value>   spindle speed and secondary percentage
//! sync <target> | enable <sp0|sp1>
//! help <gcode|library|manual>
//! show | hit | quit
//! ```

use anyhow::{anyhow, bail, Context};
use rosetta_core::{Axis, Direction, IndexMode, IndexedAxis, LinearAxis, Sign, Spindle, Target};
use rosetta_panel::PanelHandler;
use rosetta_settings::HelpResource;

/// Field addressed by `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    IndexDistance,
    FeedRate,
    MoveDistance,
}

/// One parsed console line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    MoveLinear(LinearAxis, Sign),
    IndexB(Direction),
    StartSpindles(Direction),
    StopSpindles,
    IndexSpindles(Direction),
    Set(Target, Field, f64),
    ToggleMode(IndexedAxis),
    SelectMode(IndexedAxis, IndexMode),
    Speed(f64),
    Percent(f64),
    Sync(Target),
    EnableIndex(Spindle),
    Help(HelpResource),
    Show,
    Hit,
    Quit,
}

/// What the console prints after an action
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Done,
    Text(String),
    Quit,
}

/// Parse one console line
pub fn parse_action(line: &str) -> anyhow::Result<Action> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let action = match words.as_slice() {
        ["quit"] | ["exit"] => Action::Quit,
        ["show"] => Action::Show,
        ["hit"] => Action::Hit,
        ["sp", "fwd"] => Action::StartSpindles(Direction::Forward),
        ["sp", "rev"] => Action::StartSpindles(Direction::Reverse),
        ["sp", "stop"] => Action::StopSpindles,
        ["sp", "idx+"] => Action::IndexSpindles(Direction::Forward),
        ["sp", "idx-"] => Action::IndexSpindles(Direction::Reverse),
        ["speed", value] => Action::Speed(parse_value(value)?),
        ["pct", value] => Action::Percent(parse_value(value)?),
        ["mode", axis] => Action::ToggleMode(parse_indexed(axis)?),
        ["mode", axis, mode] => Action::SelectMode(parse_indexed(axis)?, parse_mode(mode)?),
        ["sync", target] => Action::Sync(parse_target(target)?),
        ["enable", spindle] => match parse_target(spindle)? {
            Target::Spindle(spindle) => Action::EnableIndex(spindle),
            Target::Axis(axis) => bail!("{} is not a spindle", axis),
        },
        ["help", topic] => Action::Help(parse_help(topic)?),
        ["set", key, value] => {
            let (target, field) = key
                .split_once('.')
                .ok_or_else(|| anyhow!("expected <target>.<field>, got '{}'", key))?;
            Action::Set(parse_target(target)?, parse_field(field)?, parse_value(value)?)
        }
        [jog] => parse_jog(jog)?,
        _ => bail!("unknown command '{}'", line.trim()),
    };
    Ok(action)
}

/// Apply an action to the panel
pub fn execute(panel: &mut PanelHandler, action: Action) -> rosetta_core::Result<Reply> {
    match action {
        Action::MoveLinear(axis, sign) => panel.move_linear(axis, sign)?,
        Action::IndexB(direction) => panel.index_b(direction)?,
        Action::StartSpindles(direction) => panel.start_spindles(direction)?,
        Action::StopSpindles => panel.stop_spindles()?,
        Action::IndexSpindles(direction) => panel.index_spindles(direction)?,
        Action::Set(target, Field::IndexDistance, value) => {
            panel.on_index_distance_changed(target, &value)?
        }
        Action::Set(Target::Axis(axis), Field::FeedRate, value) => {
            panel.on_feed_rate_changed(axis, &value)?
        }
        Action::Set(Target::Axis(axis), Field::MoveDistance, value) => {
            panel.on_move_distance_changed(axis, &value)?
        }
        // A spindle's feed is its speed
        Action::Set(Target::Spindle(Spindle::Sp0), Field::FeedRate, value) => {
            panel.on_primary_speed_changed(&value)?
        }
        Action::Set(Target::Spindle(Spindle::Sp1), Field::FeedRate, _) => {
            return Ok(Reply::Text(
                "Sp1 speed follows Sp0, use 'pct <value>' to change it".to_string(),
            ));
        }
        Action::Set(Target::Spindle(spindle), Field::MoveDistance, _) => {
            return Ok(Reply::Text(format!("{} has no move distance", spindle)));
        }
        Action::ToggleMode(axis) => {
            let mode = panel.on_index_mode_toggled(axis)?;
            return Ok(Reply::Text(format!(
                "{} {}: {}",
                axis,
                mode,
                panel.store().index_degrees(axis)
            )));
        }
        Action::SelectMode(axis, mode) => panel.on_index_mode_selected(axis, mode)?,
        Action::Speed(value) => panel.on_primary_speed_changed(&value)?,
        Action::Percent(value) => panel.on_speed_percent_changed(&value)?,
        Action::Sync(target) => {
            let enabled = panel.on_sync_toggled(target);
            return Ok(Reply::Text(format!("{} sync {}", target, on_off(enabled))));
        }
        Action::EnableIndex(spindle) => {
            let enabled = panel.on_index_enabled_toggled(spindle);
            return Ok(Reply::Text(format!("{} index {}", spindle, on_off(enabled))));
        }
        Action::Help(resource) => return Ok(Reply::Text(panel.help_link(resource).to_string())),
        Action::Show => {
            let json = panel
                .store()
                .to_json()
                .map_err(|e| rosetta_core::Error::other(e.to_string()))?;
            return Ok(Reply::Text(json));
        }
        Action::Hit => return Ok(Reply::Text(panel.on_button_press())),
        Action::Quit => return Ok(Reply::Quit),
    }
    Ok(Reply::Done)
}

fn parse_jog(word: &str) -> anyhow::Result<Action> {
    let (letter, sign) = if let Some(letter) = word.strip_suffix('+') {
        (letter, Sign::Plus)
    } else if let Some(letter) = word.strip_suffix('-') {
        (letter, Sign::Minus)
    } else {
        bail!("unknown command '{}'", word);
    };

    let axis: Axis = letter.parse().map_err(|e: String| anyhow!(e))?;
    Ok(match axis.as_linear() {
        Some(linear) => Action::MoveLinear(linear, sign),
        None => Action::IndexB(match sign {
            Sign::Plus => Direction::Forward,
            Sign::Minus => Direction::Reverse,
        }),
    })
}

fn parse_value(text: &str) -> anyhow::Result<f64> {
    let value = text
        .parse::<f64>()
        .with_context(|| format!("'{}' is not a number", text))?;
    if !value.is_finite() {
        bail!("'{}' is not a finite number", text);
    }
    Ok(value)
}

fn parse_target(text: &str) -> anyhow::Result<Target> {
    text.parse().map_err(|e: String| anyhow!(e))
}

fn parse_indexed(text: &str) -> anyhow::Result<IndexedAxis> {
    match text.to_ascii_lowercase().as_str() {
        "b" => Ok(IndexedAxis::B),
        "sp" | "sp0" => Ok(IndexedAxis::Sp0),
        _ => bail!("{} has no index mode", text),
    }
}

fn parse_mode(text: &str) -> anyhow::Result<IndexMode> {
    match text.to_ascii_lowercase().as_str() {
        "deg" | "degrees" => Ok(IndexMode::Degrees),
        "div" | "divisions" => Ok(IndexMode::Divisions),
        _ => bail!("unknown index mode '{}'", text),
    }
}

fn parse_field(text: &str) -> anyhow::Result<Field> {
    match text {
        "idx" => Ok(Field::IndexDistance),
        "feed" => Ok(Field::FeedRate),
        "move" => Ok(Field::MoveDistance),
        _ => bail!("unknown field '{}'", text),
    }
}

fn parse_help(text: &str) -> anyhow::Result<HelpResource> {
    match text {
        "gcode" => Ok(HelpResource::GcodeLibrary),
        "library" => Ok(HelpResource::Library),
        "manual" => Ok(HelpResource::UserManual),
        _ => bail!("unknown help topic '{}'", text),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
