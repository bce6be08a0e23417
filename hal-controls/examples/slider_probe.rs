//! Probe a slider control on simulated hardware
//!
//! Loads the simulator from `HAL_SIMULATOR_CONFIG` if set, otherwise builds a
//! single example slider. Logging follows `HAL_LOG_MODE` / `HAL_LOG_LEVEL`.
//!
//! Run with: `HAL_LOG_MODE=development cargo run -p hal-audio-controls --example slider_probe`

use std::sync::Arc;

use hal_controls::{HalError, SliderControl, SliderSelector};
use hal_object::logging::{init_logging, init_logging_from_env, LoggingMode, MODE_ENV_VAR};
use hal_object::simulated::{SimulatedHardware, CONFIG_ENV_VAR};
use hal_object::{listener, AudioObject, AudioObjectId};

const DEFAULT_SLIDER: AudioObjectId = AudioObjectId(42);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var(MODE_ENV_VAR).is_ok() {
        init_logging_from_env()?;
    } else {
        init_logging(LoggingMode::Development)?;
    }

    let hardware = Arc::new(SimulatedHardware::from_env()?);
    if std::env::var(CONFIG_ENV_VAR).is_err() {
        hardware.add_slider(DEFAULT_SLIDER, 50, &[0, 25, 50, 75, 100]);
    }

    let slider = SliderControl::try_from_object(AudioObject::new(DEFAULT_SLIDER, hardware))?;
    println!("Probing {:?}", slider);

    for selector in SliderSelector::ALL {
        if slider.has_selector(selector) {
            println!(
                "  {:<6} present, settable: {}",
                selector,
                slider.is_selector_settable(selector)?
            );
        } else {
            println!("  {:<6} absent", selector);
        }
    }

    let range = slider.range()?;
    println!("Range: {:?}", range);

    slider.when_selector_changes(
        SliderSelector::Value,
        Some(listener(|id, changed| {
            println!("  change notification from {}: {} address(es)", id, changed.len());
        })),
    )?;

    for &position in range.iter().rev() {
        slider.set_value(position)?;
        println!("Set {} -> {:?}", position, slider);
    }

    let outside = range.iter().max().map_or(1, |max| max.saturating_add(1));
    match slider.set_value(outside) {
        Ok(()) => println!("Hardware accepted {} outside the range", outside),
        Err(e @ HalError::Io { .. }) => println!("Rejected {}: {}", outside, e),
        Err(e) => return Err(e.into()),
    }

    slider.when_selector_changes(SliderSelector::Value, None)?;
    println!("Final: {:?}", slider);
    Ok(())
}
