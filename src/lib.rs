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

//! bonemux provides pin multiplexing, GPIO and PWM access for the BeagleBone's
//! P8 and P9 expansion headers, through the kernel's debugfs and sysfs
//! interfaces.
//!
//! ## Modules
//!
//! * [`pinmux`] keeps track of which function each header pin carries, routes
//!   functions to pins by writing their mux control words, and lets components
//!   lock pins against remuxing. Everything else is built on top of a
//!   [`PinMux`].
//! * [`gpio`] exports GPIO lines, configures their direction and pull
//!   resistors, and reads and writes their values.
//! * [`pwm`] drives the eHRPWM and eCAP outputs on the eight PWM-capable pins.
//! * [`config`] holds the locations of the kernel interfaces.
//!
//! ## Kernel interfaces
//!
//! Mux control words are written to the per-pin files in
//! `/sys/kernel/debug/omap_mux`, so debugfs has to be mounted, and writing to
//! it requires superuser privileges. Mux settings are read from the same files
//! on start-up.
//!
//! GPIO lines are accessed through `/sys/class/gpio`, and PWM outputs through the
//! legacy `/sys/class/pwm/<device>` tree. Non-root users need to be a member of
//! the `gpio` group, with udev rules that hand exported lines over to that
//! group.
//!
//! All locations can be overridden through [`Config`], or through the
//! `BONEMUX_MUX_ROOT`, `BONEMUX_GPIO_ROOT` and `BONEMUX_PWM_ROOT` environment
//! variables.
//!
//! ## Example
//!
//! ```no_run
//! use bonemux::gpio::GpioPin;
//! use bonemux::pinmux::{Direction, Header, Pin, PinMux, Pull};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pinmux = PinMux::new();
//!
//! let led = Pin::new(Header::P8, 15)?;
//! let key = pinmux.lock(led, "status-led")?;
//!
//! let mut gpio = GpioPin::new(&pinmux, led)?;
//! gpio.configure(&mut pinmux, Direction::Out, Pull::None)?;
//! gpio.set(1)?;
//!
//! pinmux.unlock(led, key)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional features
//!
//! The `hal` feature implements the `embedded-hal` v1.0 digital
//! `InputPin` and `OutputPin` traits for [`GpioPin`].
//!
//! ## Logging
//!
//! Rejected requests and failed kernel writes are reported through the `log`
//! facade. bonemux doesn't install a logger itself.
//!
//! [`pinmux`]: pinmux/index.html
//! [`PinMux`]: pinmux/struct.PinMux.html
//! [`gpio`]: gpio/index.html
//! [`GpioPin`]: gpio/struct.GpioPin.html
//! [`pwm`]: pwm/index.html
//! [`config`]: config/index.html
//! [`Config`]: config/struct.Config.html

#![doc(html_root_url = "https://docs.rs/bonemux/0.3.0")]

#[macro_use]
mod macros;

pub mod config;
pub mod gpio;
pub mod pinmux;
pub mod pwm;
