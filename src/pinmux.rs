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

//! Pin multiplexing for the P8 and P9 expansion headers.
//!
//! Most header pins can carry one of up to eight electrical functions (GPIO,
//! SPI, I2C, PWM, UART, ...), selected by a mode code between 0 and 7. The
//! selection is made by writing a control word to the pin's file in the kernel's
//! `omap_mux` debugfs directory. [`PinMux`] keeps track of which function each
//! pin currently carries, and which pin carries each function, so that no
//! function is ever routed to two pins at the same time.
//!
//! ## Pins and functions
//!
//! A [`Pin`] is identified by its header and its 1-based position on that
//! header, for instance `Pin::new(Header::P9, 20)`, or by its connector name,
//! `"P9_20".parse::<Pin>()`. A [`Function`] is identified by its kernel signal
//! name, `"i2c2_sda".parse::<Function>()`. Both catalogs are static.
//!
//! Functions can be exported onto a specific pin with [`PinMux::export_on_pin`],
//! or onto the first available pin that's able to carry them with
//! [`PinMux::export`].
//!
//! ## Locking
//!
//! Components sharing a [`PinMux`] can claim a pin with [`PinMux::lock`]. While
//! a pin is locked, any attempt to change its mux setting fails with
//! [`Error::Locked`], and a function it carries can't be moved elsewhere. Only
//! the [`LockKey`] returned by [`PinMux::lock`] unlocks the pin again. Locks
//! don't affect reading a pin's current function or GPIO value.
//!
//! Locks are purely logical. They don't protect the control files against
//! writes from other processes.
//!
//! ## Example
//!
//! ```no_run
//! use bonemux::pinmux::{Direction, Function, Header, Pin, PinMux, Pull};
//!
//! # fn main() -> bonemux::pinmux::Result<()> {
//! let mut pinmux = PinMux::new();
//! let pin = Pin::new(Header::P9, 20)?;
//!
//! let key = pinmux.lock(pin, "sensor")?;
//! pinmux.unlock(pin, key)?;
//!
//! pinmux.export_on_pin(pin, Function::I2c2Sda, Direction::Out, Pull::Up)?;
//! assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(pin));
//! # Ok(())
//! # }
//! ```
//!
//! [`Pin`]: struct.Pin.html
//! [`Function`]: enum.Function.html
//! [`PinMux`]: struct.PinMux.html
//! [`PinMux::export_on_pin`]: struct.PinMux.html#method.export_on_pin
//! [`PinMux::export`]: struct.PinMux.html#method.export
//! [`PinMux::lock`]: struct.PinMux.html#method.lock
//! [`LockKey`]: struct.LockKey.html
//! [`Error::Locked`]: enum.Error.html#variant.Locked

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;
use std::str::FromStr;

use crate::config::Config;

mod function;
mod header;
mod lock;
mod sysfs;

pub use self::function::Function;
pub use self::header::{Header, PinKind, PINS_PER_HEADER};
pub use self::lock::LockKey;

use self::header::PinDef;
use self::lock::LockState;

const PIN_COUNT: usize = 2 * PINS_PER_HEADER as usize;

/// Errors that can occur when changing or querying the pin multiplexer.
#[derive(Debug)]
pub enum Error {
    /// Unknown connector pin or function name.
    NotFound(String),
    /// The pin can't carry the function.
    Incompatible { pin: Pin, function: Function },
    /// The pin is locked, so its mux setting can't be changed.
    Locked { pin: Pin, function: Function },
    /// The pin has already been locked by `owner`.
    AlreadyLocked { pin: Pin, owner: String },
    /// The key doesn't unlock the pin.
    WrongKey(Pin),
    /// The function is currently carried by `pin`, which is locked.
    Conflict { function: Function, pin: Pin },
    /// Every pin that's able to carry the function is locked.
    AllPinsLocked {
        function: Function,
        candidates: Vec<Pin>,
    },
    /// The pin is a power, ground, reset or analog pin, and can't be locked
    /// or unlocked.
    FixedPin(Pin),
    /// I/O error while accessing a control file.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::NotFound(ref name) => write!(f, "{} not found", name),
            Error::Incompatible { pin, function } => {
                write!(f, "Pin {} cannot export {} function", pin, function)
            }
            Error::Locked { pin, function } => {
                write!(f, "Pin {} is locked exporting {} function", pin, function)
            }
            Error::AlreadyLocked { pin, ref owner } => {
                write!(f, "Pin {} is already locked by {}", pin, owner)
            }
            Error::WrongKey(pin) => write!(f, "Wrong key for unlocking pin {}", pin),
            Error::Conflict { function, pin } => write!(
                f,
                "{} function is currently exported by locked pin {}",
                function, pin
            ),
            Error::AllPinsLocked {
                function,
                ref candidates,
            } => {
                write!(f, "Cannot export {} function: all possible pins (", function)?;
                for (i, pin) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", pin)?;
                }
                write!(f, ") are locked")
            }
            Error::FixedPin(pin) => write!(f, "Pin {} is not muxed", pin),
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

/// Result type returned from methods that can have `pinmux::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Pin directions.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    In,
    Out,
}

impl Default for Direction {
    fn default() -> Direction {
        Direction::In
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::In => write!(f, "In"),
            Direction::Out => write!(f, "Out"),
        }
    }
}

/// Built-in pull-up/pull-down resistor states.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Pull {
    None,
    Up,
    Down,
}

impl Default for Pull {
    fn default() -> Pull {
        Pull::None
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Pull::None => write!(f, "None"),
            Pull::Up => write!(f, "PullUp"),
            Pull::Down => write!(f, "PullDown"),
        }
    }
}

/// A physical pin on one of the expansion headers.
///
/// `Pin` is a lightweight handle into the static board tables. Its current
/// function and lock state are tracked by [`PinMux`].
///
/// [`PinMux`]: struct.PinMux.html
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Returns the pin at position `number` (1-46) on `header`.
    pub fn new(header: Header, number: u8) -> Result<Pin> {
        if number < 1 || number > PINS_PER_HEADER {
            log::error!(
                "Invalid pin number {}[{}]. Must be in 1..{}",
                header,
                number,
                PINS_PER_HEADER
            );
            return Err(Error::NotFound(format!("{}_{}", header, number)));
        }

        let offset = match header {
            Header::P8 => 0,
            Header::P9 => PINS_PER_HEADER,
        };

        Ok(Pin(offset + number - 1))
    }

    /// Returns an iterator over all header pins, P8 first.
    pub fn all() -> impl Iterator<Item = Pin> {
        (0..PIN_COUNT as u8).map(Pin)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn def(self) -> &'static PinDef {
        let position = (self.0 % PINS_PER_HEADER) as usize;

        match self.header() {
            Header::P8 => &header::P8[position],
            Header::P9 => &header::P9[position],
        }
    }

    /// Returns the header the pin is located on.
    pub fn header(self) -> Header {
        if self.0 < PINS_PER_HEADER {
            Header::P8
        } else {
            Header::P9
        }
    }

    /// Returns the pin's 1-based position on its header.
    pub fn number(self) -> u8 {
        self.0 % PINS_PER_HEADER + 1
    }

    /// Returns the pin's connector name, for instance `"P8_13"`.
    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn kind(self) -> PinKind {
        self.def().kind
    }

    /// Returns the functions selected by mode codes 0 through 7.
    pub fn functions(self) -> [Option<Function>; 8] {
        self.def().modes
    }

    /// Returns the pin's dedicated GPIO function, if it has one.
    pub fn gpio_function(self) -> Option<Function> {
        match self.kind() {
            PinKind::Gpio { .. } => self.def().modes[7],
            _ => None,
        }
    }

    /// Returns the mode code that routes `function` to this pin.
    pub fn mode_of(self, function: Function) -> Option<u8> {
        self.def()
            .modes
            .iter()
            .position(|mode| *mode == Some(function))
            .map(|mode| mode as u8)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pin").field(&self.name()).finish()
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Pin> {
        Pin::all().find(|pin| pin.name() == s).ok_or_else(|| {
            log::error!("Unknown connector pin {}", s);
            Error::NotFound(s.to_owned())
        })
    }
}

/// A pin that's able to carry a function, and the mode code that selects it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Candidate {
    pub pin: Pin,
    pub mode: u8,
}

#[derive(Debug, Default)]
struct PinState {
    function: Option<Function>,
    lock: LockState,
}

/// Tracks and changes the mux settings of the expansion header pins.
///
/// `PinMux` owns the only mutable state in the crate: the function each pin
/// currently carries, and each pin's lock. Create one at start-up and pass it
/// to whichever components need to change pin assignments.
#[derive(Debug)]
pub struct PinMux {
    config: Config,
    pins: Vec<PinState>,
    // Pin currently carrying each function, indexed by Function::index()
    owners: Vec<Option<Pin>>,
    // Pins able to carry each function, in declaration order
    candidates: Vec<Vec<Candidate>>,
}

impl PinMux {
    /// Constructs a new `PinMux` using [`Config::from_env`].
    ///
    /// [`Config::from_env`]: ../config/struct.Config.html#method.from_env
    pub fn new() -> PinMux {
        PinMux::with_config(Config::from_env())
    }

    /// Constructs a new `PinMux` using the specified configuration.
    ///
    /// If mux detection is enabled, each pin's current function is read from its
    /// control file. Pins whose control file can't be read or parsed start out
    /// with the board's power-on default.
    pub fn with_config(config: Config) -> PinMux {
        let mut candidates = vec![Vec::new(); Function::ALL.len()];
        for pin in Pin::all() {
            for (mode, function) in pin.functions().iter().enumerate() {
                if let Some(function) = function {
                    candidates[function.index()].push(Candidate {
                        pin,
                        mode: mode as u8,
                    });
                }
            }
        }

        let mut pinmux = PinMux {
            pins: Pin::all().map(|_| PinState::default()).collect(),
            owners: vec![None; Function::ALL.len()],
            candidates,
            config,
        };

        for pin in Pin::all() {
            if let PinKind::Fixed { .. } = pin.kind() {
                continue;
            }

            let mode = pinmux.initial_mode(pin);
            if let Some(function) = pin.functions()[mode as usize] {
                if let Some(owner) = pinmux.owners[function.index()] {
                    log::warn!(
                        "{} function is reported on both pin {} and pin {}, leaving {} unassigned",
                        function,
                        owner,
                        pin,
                        pin
                    );
                    continue;
                }

                pinmux.pins[pin.index()].function = Some(function);
                pinmux.owners[function.index()] = Some(pin);
            }
        }

        pinmux
    }

    fn initial_mode(&self, pin: Pin) -> u8 {
        let def = pin.def();
        if !self.config.detect_mux() {
            return def.default_mode;
        }

        let path = self.control_path(pin);
        match sysfs::read_mode(&path) {
            Ok(Some(mode)) if def.modes[mode as usize].is_some() => mode,
            Ok(Some(mode)) => {
                log::warn!(
                    "Pin {} reports unsupported mode {}, assuming mode {}",
                    pin,
                    mode,
                    def.default_mode
                );
                def.default_mode
            }
            Ok(None) | Err(_) => {
                log::debug!(
                    "Cannot detect mux setting of pin {} from {}, assuming mode {}",
                    pin,
                    path.display(),
                    def.default_mode
                );
                def.default_mode
            }
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the pin at position `number` (1-46) on `header`.
    pub fn pin(&self, header: Header, number: u8) -> Result<Pin> {
        Pin::new(header, number)
    }

    /// Returns the pin with the specified connector name, for instance `"P9_20"`.
    pub fn pin_by_name(&self, name: &str) -> Result<Pin> {
        name.parse()
    }

    /// Returns the function with the specified kernel signal name.
    pub fn function(&self, name: &str) -> Result<Function> {
        name.parse()
    }

    /// Returns the path of the pin's mux control file.
    ///
    /// Fixed pins don't have a control file, and return the mux root itself.
    pub fn control_path(&self, pin: Pin) -> PathBuf {
        self.config.mux_root().join(pin.def().dev)
    }

    /// Returns the function currently carried by `pin`.
    ///
    /// Returns `None` for fixed pins, and for pins whose function couldn't be
    /// determined or was moved to another pin.
    pub fn current_function(&self, pin: Pin) -> Option<Function> {
        self.pins[pin.index()].function
    }

    /// Returns the pin currently carrying `function`.
    pub fn current_pin(&self, function: Function) -> Option<Pin> {
        self.owners[function.index()]
    }

    /// Returns the pins able to carry `function`, in declaration order.
    pub fn candidates(&self, function: Function) -> &[Candidate] {
        &self.candidates[function.index()]
    }

    /// Routes `function` to `pin`.
    ///
    /// `direction` and `pull` are encoded in the control word along with the
    /// function's mode code. Exporting a function the pin already carries
    /// rewrites the control word, which can be used to change the direction or
    /// pull resistor.
    ///
    /// If another, unlocked, pin currently carries `function`, that pin is
    /// released and left without a function. Its own control file isn't
    /// touched.
    ///
    /// The in-memory assignment is only updated after the control word has been
    /// written successfully.
    pub fn export_on_pin(
        &mut self,
        pin: Pin,
        function: Function,
        direction: Direction,
        pull: Pull,
    ) -> Result<()> {
        if let PinKind::Fixed { .. } = pin.kind() {
            log::error!(
                "Cannot export a different function on non-muxed pin {}",
                pin
            );
            return Err(Error::Incompatible { pin, function });
        }

        if self.pins[pin.index()].lock.is_locked() {
            log::error!("Pin {} is locked exporting {} function", pin, function);
            return Err(Error::Locked { pin, function });
        }

        let mode = match pin.mode_of(function) {
            Some(mode) => mode,
            None => {
                log::error!("Pin {} cannot export {} function", pin, function);
                return Err(Error::Incompatible { pin, function });
            }
        };

        let previous_owner = self.owners[function.index()].filter(|owner| *owner != pin);
        if let Some(owner) = previous_owner {
            if self.is_locked(owner) {
                log::error!(
                    "{} function is currently exported by locked pin {}",
                    function,
                    owner
                );
                return Err(Error::Conflict {
                    function,
                    pin: owner,
                });
            }
        }

        let path = self.control_path(pin);
        let code = sysfs::encode(mode, direction, pull);
        if let Err(err) = sysfs::write_mux(&path, code) {
            log::error!("Cannot open {} for writing: {}", path.display(), err);
            return Err(Error::Io(err));
        }

        if let Some(owner) = previous_owner {
            log::debug!("Releasing {} function from pin {}", function, owner);
            self.pins[owner.index()].function = None;
        }

        if let Some(current) = self.pins[pin.index()].function {
            if current != function {
                self.owners[current.index()] = None;
            }
        }

        self.pins[pin.index()].function = Some(function);
        self.owners[function.index()] = Some(pin);

        log::debug!(
            "Exported {} function on pin {} ({}, {})",
            function,
            pin,
            direction,
            pull
        );

        Ok(())
    }

    /// Routes `function` to a pin, unless it's already carried by one.
    ///
    /// If `function` is already assigned, its pin is returned without touching
    /// the control files. Otherwise, `function` is exported on the first unlocked
    /// pin able to carry it, in declaration order.
    pub fn export(&mut self, function: Function, direction: Direction, pull: Pull) -> Result<Pin> {
        if let Some(pin) = self.current_pin(function) {
            return Ok(pin);
        }

        let free = self
            .candidates(function)
            .iter()
            .map(|candidate| candidate.pin)
            .find(|pin| !self.is_locked(*pin));

        match free {
            Some(pin) => {
                self.export_on_pin(pin, function, direction, pull)?;
                Ok(pin)
            }
            None => {
                let mut candidates: Vec<Pin> = Vec::new();
                for candidate in self.candidates(function) {
                    if !candidates.contains(&candidate.pin) {
                        candidates.push(candidate.pin);
                    }
                }

                let err = Error::AllPinsLocked {
                    function,
                    candidates,
                };
                log::error!("{}", err);

                Err(err)
            }
        }
    }

    /// Locks `pin`, preventing any changes to its mux setting.
    ///
    /// `owner` identifies the locking component in diagnostics. Returns the key
    /// needed to unlock the pin. Locking a pin that's already locked fails with
    /// [`Error::AlreadyLocked`], whoever the owner is.
    ///
    /// [`Error::AlreadyLocked`]: enum.Error.html#variant.AlreadyLocked
    pub fn lock(&mut self, pin: Pin, owner: &str) -> Result<LockKey> {
        if let PinKind::Fixed { .. } = pin.kind() {
            log::error!("Cannot lock non-muxed pin {}", pin);
            return Err(Error::FixedPin(pin));
        }

        match self.pins[pin.index()].lock.lock(owner) {
            Ok(key) => {
                log::debug!("Pin {} locked by {}", pin, owner);
                Ok(key)
            }
            Err(current) => {
                log::error!("Cannot lock pin {}: Already locked by {}", pin, current);
                Err(Error::AlreadyLocked {
                    pin,
                    owner: current,
                })
            }
        }
    }

    /// Unlocks `pin`.
    ///
    /// The lock is left in place if `key` doesn't match the key returned by
    /// [`lock`].
    ///
    /// [`lock`]: #method.lock
    pub fn unlock(&mut self, pin: Pin, key: LockKey) -> Result<()> {
        if let PinKind::Fixed { .. } = pin.kind() {
            log::error!("Cannot unlock non-muxed pin {}", pin);
            return Err(Error::FixedPin(pin));
        }

        if !self.pins[pin.index()].lock.unlock(key) {
            log::error!("Wrong credentials for unlocking pin {}", pin);
            return Err(Error::WrongKey(pin));
        }

        log::debug!("Pin {} unlocked", pin);

        Ok(())
    }

    /// Returns `true` if `pin`'s mux setting can't currently be changed.
    ///
    /// Fixed pins are always reported as locked.
    pub fn is_locked(&self, pin: Pin) -> bool {
        match pin.kind() {
            PinKind::Fixed { .. } => true,
            _ => self.pins[pin.index()].lock.is_locked(),
        }
    }

    /// Returns the owner that locked `pin`, if it's locked.
    pub fn locked_by(&self, pin: Pin) -> Option<&str> {
        self.pins[pin.index()].lock.owner()
    }
}

impl Default for PinMux {
    fn default() -> PinMux {
        PinMux::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinmux() -> PinMux {
        PinMux::with_config(Config::new().with_detect_mux(false))
    }

    #[test]
    fn pin_lookup() {
        let pin = Pin::new(Header::P9, 20).unwrap();
        assert_eq!(pin.name(), "P9_20");
        assert_eq!(pin.header(), Header::P9);
        assert_eq!(pin.number(), 20);
        assert_eq!("P9_20".parse::<Pin>().unwrap(), pin);

        assert!(Pin::new(Header::P8, 0).is_err());
        assert!(Pin::new(Header::P8, 47).is_err());
        assert!("P10_1".parse::<Pin>().is_err());
    }

    #[test]
    fn pins_are_in_header_order() {
        let names: Vec<&str> = Pin::all().map(Pin::name).collect();
        assert_eq!(names.len(), PIN_COUNT);
        assert_eq!(names[0], "P8_1");
        assert_eq!(names[45], "P8_46");
        assert_eq!(names[46], "P9_1");
        assert_eq!(names[91], "P9_46");
    }

    #[test]
    fn mode_of_first_match() {
        let pin = Pin::new(Header::P9, 20).unwrap();
        assert_eq!(pin.mode_of(Function::I2c2Sda), Some(3));
        assert_eq!(pin.mode_of(Function::Gpio0_12), Some(7));
        assert_eq!(pin.mode_of(Function::Ehrpwm2B), None);
    }

    #[test]
    fn gpio_function_by_kind() {
        assert_eq!(
            Pin::new(Header::P8, 15).unwrap().gpio_function(),
            Some(Function::Gpio1_15)
        );
        assert_eq!(Pin::new(Header::P8, 7).unwrap().gpio_function(), None);
        assert_eq!(Pin::new(Header::P9, 1).unwrap().gpio_function(), None);
    }

    #[test]
    fn candidates_link_back_to_pins() {
        let pinmux = pinmux();

        for function in Function::ALL {
            let candidates = pinmux.candidates(*function);
            assert!(!candidates.is_empty(), "{} has no pin", function);
            assert!(candidates.len() <= 4);

            for candidate in candidates {
                assert_eq!(
                    candidate.pin.functions()[candidate.mode as usize],
                    Some(*function)
                );
            }
        }
    }

    #[test]
    fn default_modes_are_consistent() {
        let pinmux = pinmux();

        for pin in Pin::all() {
            match pinmux.current_function(pin) {
                Some(function) => assert_eq!(pinmux.current_pin(function), Some(pin)),
                None => assert!(matches!(pin.kind(), PinKind::Fixed { .. })),
            }
        }
    }

    #[test]
    fn error_messages() {
        let pin = Pin::new(Header::P9, 20).unwrap();
        let other = Pin::new(Header::P9, 22).unwrap();

        assert_eq!(
            Error::Locked {
                pin,
                function: Function::I2c2Sda
            }
            .to_string(),
            "Pin P9_20 is locked exporting i2c2_sda function"
        );
        assert_eq!(
            Error::AllPinsLocked {
                function: Function::I2c2Sda,
                candidates: vec![other, pin],
            }
            .to_string(),
            "Cannot export i2c2_sda function: all possible pins (P9_22, P9_20) are locked"
        );
    }
}
