// Copyright (c) 2024 The bonemux developers
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Interface for the GPIO lines routed to the expansion headers.
//!
//! GPIO lines are controlled through the `/sys/class/gpio` sysfs interface.
//! Before a line can be used, its header pin has to be muxed onto its GPIO
//! function, and the line has to be exported to user space. [`GpioPin`] takes
//! care of both, using a [`PinMux`] to change the pin's mux setting.
//!
//! A [`GpioPin`] moves through three states: it starts out [`Unexported`],
//! becomes [`Exported`] once the kernel line exists, and [`Configured`] once a
//! direction has been set. Lines are never unexported again.
//!
//! ## Example
//!
//! ```no_run
//! use bonemux::gpio::GpioPin;
//! use bonemux::pinmux::{Direction, Header, Pin, PinMux, Pull};
//!
//! # fn main() -> bonemux::gpio::Result<()> {
//! let mut pinmux = PinMux::new();
//! let mut pin = GpioPin::new(&pinmux, Pin::new(Header::P8, 15)?)?;
//!
//! pin.configure(&mut pinmux, Direction::Out, Pull::None)?;
//! pin.set(1)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Troubleshooting
//!
//! ### Permission denied
//!
//! Exported lines start off owned by `root`. On systems with the appropriate
//! udev rules, ownership changes to the `gpio` group shortly after. Non-root
//! users have to be a member of the `gpio` group. [`GpioPin`] waits for the
//! group change for up to [`Config::export_timeout`].
//!
//! [`GpioPin`]: struct.GpioPin.html
//! [`PinMux`]: ../pinmux/struct.PinMux.html
//! [`Unexported`]: enum.GpioState.html#variant.Unexported
//! [`Exported`]: enum.GpioState.html#variant.Exported
//! [`Configured`]: enum.GpioState.html#variant.Configured
//! [`Config::export_timeout`]: ../config/struct.Config.html#method.export_timeout

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;
use std::time::Duration;

use crate::pinmux::{self, Direction, Function, Pin, PinKind, PinMux, Pull};

#[cfg(feature = "hal")]
mod hal;
mod sysfs;

/// Errors that can occur when accessing a GPIO line.
#[derive(Debug)]
pub enum Error {
    /// The pin doesn't have a GPIO function.
    NotGpio(Pin),
    /// Changing the pin's mux setting failed.
    Mux(pinmux::Error),
    /// The operation isn't supported by the sysfs interface.
    NotImplemented(&'static str),
    /// I/O error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::NotGpio(pin) => write!(f, "Pin {} is not a GPIO pin", pin),
            Error::Mux(ref err) => write!(f, "Mux error: {}", err),
            Error::NotImplemented(operation) => write!(f, "{} is not implemented", operation),
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<pinmux::Error> for Error {
    fn from(err: pinmux::Error) -> Error {
        Error::Mux(err)
    }
}

/// Result type returned from methods that can have `gpio::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Lifecycle of a GPIO line.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GpioState {
    /// The line hasn't been exported by this `GpioPin` yet.
    Unexported,
    /// The line is exported, but its direction hasn't been set.
    Exported,
    /// The line is exported and its direction has been set.
    Configured { direction: Direction, pull: Pull },
}

/// A header pin used as a GPIO line.
#[derive(Debug)]
pub struct GpioPin {
    pin: Pin,
    line: u8,
    function: Function,
    root: PathBuf,
    timeout: Duration,
    state: GpioState,
}

impl GpioPin {
    /// Constructs a new `GpioPin` for `pin`, using the GPIO root and export
    /// timeout configured for `pinmux`.
    ///
    /// Returns [`Error::NotGpio`] if the pin doesn't have a GPIO function. The
    /// line isn't exported until [`export`] or [`configure`] is called.
    ///
    /// [`Error::NotGpio`]: enum.Error.html#variant.NotGpio
    /// [`export`]: #method.export
    /// [`configure`]: #method.configure
    pub fn new(pinmux: &PinMux, pin: Pin) -> Result<GpioPin> {
        match (pin.kind(), pin.gpio_function()) {
            (PinKind::Gpio { line }, Some(function)) => Ok(GpioPin {
                pin,
                line,
                function,
                root: pinmux.config().gpio_root().to_path_buf(),
                timeout: pinmux.config().export_timeout(),
                state: GpioState::Unexported,
            }),
            _ => {
                log::error!("Pin {} is not a GPIO pin", pin);
                Err(Error::NotGpio(pin))
            }
        }
    }

    /// Returns the header pin.
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Returns the kernel GPIO line number (bank * 32 + offset).
    pub fn line(&self) -> u8 {
        self.line
    }

    /// Returns the pin's GPIO function.
    pub fn function(&self) -> Function {
        self.function
    }

    pub fn state(&self) -> GpioState {
        self.state
    }

    /// Makes sure the pin carries its GPIO function, and the line is exported.
    ///
    /// If the pin carries a different function, for instance because another
    /// component remuxed it, it's remuxed as an input without pull resistor.
    /// The line is only exported once per `GpioPin`.
    pub fn export(&mut self, pinmux: &mut PinMux) -> Result<()> {
        if pinmux.current_function(self.pin) != Some(self.function) {
            pinmux.export_on_pin(self.pin, self.function, Direction::In, Pull::None)?;
        }

        if self.state == GpioState::Unexported {
            sysfs::export(&self.root, self.line, self.timeout)?;
            self.state = GpioState::Exported;
        }

        Ok(())
    }

    /// Configures the line's direction and pull resistor.
    ///
    /// The GPIO function is exported on the pin again to apply the pull
    /// resistor and input enable bits, the line is exported if necessary, and
    /// the direction is written to the line's `direction` file.
    ///
    /// A locked pin that already carries its GPIO function keeps its current
    /// mux setting, and only the line's direction is changed.
    pub fn configure(
        &mut self,
        pinmux: &mut PinMux,
        direction: Direction,
        pull: Pull,
    ) -> Result<()> {
        match pinmux.export_on_pin(self.pin, self.function, direction, pull) {
            Ok(()) => (),
            Err(pinmux::Error::Locked { .. })
                if pinmux.current_function(self.pin) == Some(self.function) =>
            {
                log::warn!(
                    "Pin {} is locked, keeping its current {} mux setting",
                    self.pin,
                    self.function
                );
            }
            Err(err) => return Err(Error::Mux(err)),
        }

        sysfs::export(&self.root, self.line, self.timeout)?;
        sysfs::set_direction(&self.root, self.line, direction)?;
        self.state = GpioState::Configured { direction, pull };

        Ok(())
    }

    /// Sets the line's output value to `value % 2`.
    pub fn set(&self, value: u8) -> Result<()> {
        sysfs::set_value(&self.root, self.line, value % 2).map_err(|e| {
            log::error!("Cannot set value of pin {}: {}", self.pin, e);
            Error::Io(e)
        })
    }

    /// Returns `true` if the line's value is high.
    pub fn get(&self) -> Result<bool> {
        sysfs::value(&self.root, self.line).map_err(|e| {
            log::error!("Cannot read value of pin {}: {}", self.pin, e);
            Error::Io(e)
        })
    }

    /// Reading back the direction isn't supported.
    pub fn get_direction(&self) -> Result<Direction> {
        log::error!("Reading the direction of pin {} is not implemented", self.pin);
        Err(Error::NotImplemented("get_direction"))
    }

    /// Reading back the pull resistor state isn't supported.
    pub fn get_pulls(&self) -> Result<Pull> {
        log::error!("Reading the pull resistors of pin {} is not implemented", self.pin);
        Err(Error::NotImplemented("get_pulls"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pinmux::Header;

    fn pinmux() -> PinMux {
        PinMux::with_config(Config::new().with_detect_mux(false))
    }

    #[test]
    fn gpio_pins_only() {
        let pinmux = pinmux();

        let pin = GpioPin::new(&pinmux, Pin::new(Header::P8, 15).unwrap()).unwrap();
        assert_eq!(pin.line(), 47);
        assert_eq!(pin.function(), Function::Gpio1_15);
        assert_eq!(pin.state(), GpioState::Unexported);

        assert!(matches!(
            GpioPin::new(&pinmux, Pin::new(Header::P8, 7).unwrap()),
            Err(Error::NotGpio(_))
        ));
        assert!(matches!(
            GpioPin::new(&pinmux, Pin::new(Header::P9, 1).unwrap()),
            Err(Error::NotGpio(_))
        ));
    }

    #[test]
    fn direction_and_pulls_are_write_only() {
        let pinmux = pinmux();
        let pin = GpioPin::new(&pinmux, Pin::new(Header::P9, 12).unwrap()).unwrap();

        assert!(matches!(
            pin.get_direction(),
            Err(Error::NotImplemented("get_direction"))
        ));
        assert!(matches!(
            pin.get_pulls(),
            Err(Error::NotImplemented("get_pulls"))
        ));
    }
}
