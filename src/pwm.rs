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

//! Interface for the PWM outputs on the expansion headers.
//!
//! The eHRPWM and eCAP modules are controlled through the legacy
//! `/sys/class/pwm/<device>` sysfs interface, where each output shows up as its
//! own device directory containing `request`, `run`, and a period and duty
//! file. Depending on the kernel driver, period and duty are expressed in
//! nanoseconds (`period_ns`, `duty_ns`), or as a frequency and a percentage
//! (`period_frequency`, `duty_percent`). Select the matching [`Units`] when
//! constructing a [`Pwm`].
//!
//! Only the following header pins are connected to a PWM output:
//!
//! | Pin   | Device       | Function              |
//! |-------|--------------|-----------------------|
//! | P8_13 | `ehrpwm.2:1` | `ehrpwm2B`            |
//! | P8_19 | `ehrpwm.2:0` | `ehrpwm2A`            |
//! | P9_14 | `ehrpwm.1:0` | `ehrpwm1A`            |
//! | P9_16 | `ehrpwm.1:1` | `ehrpwm1B`            |
//! | P9_31 | `ehrpwm.0:0` | `ehrpwm0A`            |
//! | P9_29 | `ehrpwm.0:1` | `ehrpwm0B`            |
//! | P9_42 | `ecap.0`     | `ecap0_in_pwm0_out`   |
//! | P9_28 | `ecap.2`     | `ecap2_in_pwm2_out`   |
//!
//! [`Pwm::attach`] routes the PWM function to the pin through a [`PinMux`],
//! claims the device, and starts it with a duty value of 0. Duty values are
//! written as-is, in whatever unit the driver uses. An attached
//! `Pwm` is stopped and released when it goes out of scope.
//!
//! ## Example
//!
//! ```no_run
//! use bonemux::pinmux::{Header, Pin, PinMux};
//! use bonemux::pwm::{Pwm, Units};
//!
//! # fn main() -> bonemux::pwm::Result<()> {
//! let mut pinmux = PinMux::new();
//! let mut pwm = Pwm::new(&pinmux, Pin::new(Header::P9, 14)?, Units::Nanoseconds)?;
//!
//! pwm.attach(&mut pinmux, 20_000_000)?;
//! pwm.write(1_500_000)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Units`]: enum.Units.html
//! [`Pwm`]: struct.Pwm.html
//! [`Pwm::attach`]: struct.Pwm.html#method.attach
//! [`PinMux`]: ../pinmux/struct.PinMux.html

use std::error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::result;

use crate::pinmux::{self, Direction, Function, Pin, PinMux, Pull};

mod sysfs;

/// Errors that can occur when accessing a PWM output.
#[derive(Debug)]
pub enum Error {
    /// The pin isn't connected to a PWM output.
    UnsupportedPin(Pin),
    /// The PWM device has already been requested. Contains the device's
    /// `request` status.
    Busy(String),
    /// The `Pwm` hasn't been attached.
    NotAttached,
    /// Changing the pin's mux setting failed.
    Mux(pinmux::Error),
    /// I/O error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::UnsupportedPin(pin) => write!(f, "Pin {} has no PWM output", pin),
            Error::Busy(ref status) => {
                write!(f, "PWM device not available (request status: {})", status)
            }
            Error::NotAttached => write!(f, "PWM not attached to a pin"),
            Error::Mux(ref err) => write!(f, "Mux error: {}", err),
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

/// Result type returned from methods that can have `pwm::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Units used by the PWM driver for period and duty values.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Units {
    /// `period_ns` and `duty_ns`.
    Nanoseconds,
    /// `period_frequency` (Hz) and `duty_percent`.
    Percent,
}

impl Units {
    fn period_file(self) -> &'static str {
        match self {
            Units::Nanoseconds => "period_ns",
            Units::Percent => "period_frequency",
        }
    }

    fn duty_file(self) -> &'static str {
        match self {
            Units::Nanoseconds => "duty_ns",
            Units::Percent => "duty_percent",
        }
    }
}

// Header pins wired to a PWM output
const CHANNELS: [(&str, &str, Function); 8] = [
    ("P8_13", "ehrpwm.2:1", Function::Ehrpwm2B),
    ("P8_19", "ehrpwm.2:0", Function::Ehrpwm2A),
    ("P9_14", "ehrpwm.1:0", Function::Ehrpwm1A),
    ("P9_16", "ehrpwm.1:1", Function::Ehrpwm1B),
    ("P9_31", "ehrpwm.0:0", Function::Ehrpwm0A),
    ("P9_29", "ehrpwm.0:1", Function::Ehrpwm0B),
    ("P9_42", "ecap.0", Function::Ecap0InPwm0Out),
    ("P9_28", "ecap.2", Function::Ecap2InPwm2Out),
];

/// A PWM output on one of the expansion header pins.
#[derive(Debug)]
pub struct Pwm {
    pin: Pin,
    function: Function,
    device: PathBuf,
    units: Units,
    attached: bool,
    duty: u32,
}

impl Pwm {
    /// Constructs a new `Pwm` for `pin`, using the PWM root configured for
    /// `pinmux`.
    ///
    /// Returns [`Error::UnsupportedPin`] if the pin isn't connected to a PWM
    /// output. The device isn't touched until [`attach`] is called.
    ///
    /// [`Error::UnsupportedPin`]: enum.Error.html#variant.UnsupportedPin
    /// [`attach`]: #method.attach
    pub fn new(pinmux: &PinMux, pin: Pin, units: Units) -> Result<Pwm> {
        let (_, device, function) = CHANNELS
            .iter()
            .find(|(name, _, _)| *name == pin.name())
            .ok_or_else(|| {
                log::error!("Pin {} has no PWM output", pin);
                Error::UnsupportedPin(pin)
            })?;

        Ok(Pwm {
            pin,
            function: *function,
            device: pinmux.config().pwm_root().join(device),
            units,
            attached: false,
            duty: 0,
        })
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Returns the path of the PWM device directory.
    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Routes the PWM function to the pin, claims the device and starts it.
    ///
    /// `period` is written to the period file as-is. The duty value starts out
    /// at 0. Fails with [`Error::Busy`] if the device's `request` file doesn't
    /// report it as free, in which case the pin's mux setting is left alone. Attaching an attached `Pwm` again only restarts it
    /// with the new period.
    ///
    /// [`Error::Busy`]: enum.Error.html#variant.Busy
    pub fn attach(&mut self, pinmux: &mut PinMux, period: u32) -> Result<()> {
        // The device has to be free before the pin is remuxed
        if !self.attached {
            let status = sysfs::request_status(&self.device)?;
            if !status.contains("free") {
                log::error!(
                    "PWM device {} not available. Request status: {}",
                    self.device.display(),
                    status
                );
                return Err(Error::Busy(status));
            }
        }

        pinmux.export_on_pin(self.pin, self.function, Direction::Out, Pull::None)?;

        if !self.attached {
            sysfs::set_request(&self.device, true)?;
            self.attached = true;
        }

        sysfs::set_run(&self.device, false)?;
        sysfs::set_attribute(&self.device, self.units.period_file(), period)?;
        sysfs::set_attribute(&self.device, self.units.duty_file(), 0)?;
        self.duty = 0;
        sysfs::set_run(&self.device, true)?;

        Ok(())
    }

    /// Writes `duty` to the duty file.
    pub fn write(&mut self, duty: u32) -> Result<()> {
        self.check_attached()?;

        sysfs::set_attribute(&self.device, self.units.duty_file(), duty)?;
        self.duty = duty;

        Ok(())
    }

    /// Returns the last duty value written.
    pub fn read(&self) -> u32 {
        self.duty
    }

    /// Stops the output, without releasing the device.
    pub fn stop(&mut self) -> Result<()> {
        self.check_attached()?;

        sysfs::set_run(&self.device, false)?;

        Ok(())
    }

    /// Stops the output and releases the device.
    pub fn detach(&mut self) -> Result<()> {
        self.check_attached()?;

        sysfs::set_run(&self.device, false)?;
        sysfs::set_request(&self.device, false)?;
        self.attached = false;

        Ok(())
    }

    fn check_attached(&self) -> Result<()> {
        if self.attached {
            Ok(())
        } else {
            log::error!("PWM on pin {} is not attached", self.pin);
            Err(Error::NotAttached)
        }
    }
}

impl Drop for Pwm {
    fn drop(&mut self) {
        if self.attached {
            let _ = sysfs::set_run(&self.device, false);
            let _ = sysfs::set_request(&self.device, false);
        }
    }
}
