use gpio_cdev::Chip;
use gpio_cdev::Line;
use gpio_cdev::LineRequestFlags;
use libc::c_int;
use log::debug;
use std::path::Path;
use std::path::PathBuf;

use crate::channel_types::Pin;
use crate::error::GpioError;
use crate::facility::HardwareFacility;
use crate::facility::SENTINEL_FAILURE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdevConfig {
    /// Chip carrying the header pins (`gpiochip4` on a Raspberry Pi 5).
    pub chip: PathBuf,
    /// Tried when `chip` is missing or does not carry the line (older Pis).
    pub fallback_chip: PathBuf,
    /// Consumer label shown for requested lines, e.g. by `gpioinfo`.
    pub consumer: String,
}

impl Default for CdevConfig {
    fn default() -> Self {
        CdevConfig {
            chip: PathBuf::from("/dev/gpiochip4"),
            fallback_chip: PathBuf::from("/dev/gpiochip0"),
            consumer: String::from("channel-select"),
        }
    }
}

/// Pin access over the Linux GPIO character device.
///
/// Lines are looked up by name (`GPIO<n>`) and requested only for the
/// duration of a single read or write.
pub struct CdevFacility {
    config: CdevConfig,
    last_error: Option<String>,
}

impl CdevFacility {
    pub fn new(config: CdevConfig) -> CdevFacility {
        CdevFacility {
            config,
            last_error: None,
        }
    }

    fn read(&self, pin: Pin) -> Result<bool, GpioError> {
        self.with_line(pin, |line, consumer| {
            // No direction flags: the line keeps whatever direction it has.
            let handle = line.request(LineRequestFlags::empty(), 0, consumer)?;
            Ok(handle.get_value()? != 0)
        })
    }

    fn write(&self, pin: Pin, state: bool) -> Result<(), GpioError> {
        self.with_line(pin, |line, consumer| {
            let handle = line.request(LineRequestFlags::OUTPUT, u8::from(state), consumer)?;
            handle.set_value(u8::from(state))?;
            Ok(())
        })
    }

    fn with_line<T, O>(&self, pin: Pin, op: O) -> Result<T, GpioError>
    where
        O: Fn(&Line, &str) -> Result<T, GpioError>,
    {
        let primary =
            find_line(&self.config.chip, pin).and_then(|line| op(&line, &self.config.consumer));
        match primary {
            Ok(value) => Ok(value),
            Err(e) if self.config.fallback_chip != self.config.chip => {
                debug!(
                    "{} on '{}' failed ({}), trying '{}'",
                    pin,
                    self.config.chip.display(),
                    e,
                    self.config.fallback_chip.display()
                );
                let line = find_line(&self.config.fallback_chip, pin)?;
                op(&line, &self.config.consumer)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for CdevFacility {
    fn default() -> Self {
        CdevFacility::new(CdevConfig::default())
    }
}

impl HardwareFacility for CdevFacility {
    fn query_pin(&mut self, pin: Pin) -> c_int {
        match self.read(pin) {
            Ok(state) => c_int::from(state),
            Err(e) => {
                self.last_error = Some(format!("Error getting channel state: {}", e));
                SENTINEL_FAILURE
            }
        }
    }

    fn write_pin(&mut self, pin: Pin, state: bool) -> c_int {
        match self.write(pin, state) {
            Ok(()) => 0,
            Err(e) => {
                self.last_error = Some(format!("Error setting channel state: {}", e));
                SENTINEL_FAILURE
            }
        }
    }

    fn last_error_message(&self) -> Option<String> {
        self.last_error.clone()
    }
}

fn find_line(chip_path: &Path, pin: Pin) -> Result<Line, GpioError> {
    let chip = Chip::new(chip_path)?;
    let line_name = line_name(pin);
    for line in chip.lines() {
        if line.info()?.name() == Some(line_name.as_str()) {
            return Ok(line);
        }
    }
    Err(GpioError::LineNotFound {
        chip: chip_path.display().to_string(),
        line_name,
    })
}

fn line_name(pin: Pin) -> String {
    format!("GPIO{}", pin.number())
}
