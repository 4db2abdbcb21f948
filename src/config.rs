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

//! Kernel interface locations and start-up behavior.
//!
//! The defaults match a stock BeagleBone kernel with debugfs mounted. Every
//! root can be overridden, either programmatically through the `with_*`
//! setters, or through the environment when using [`Config::from_env`]:
//!
//! | Variable            | Default                      |
//! |---------------------|------------------------------|
//! | `BONEMUX_MUX_ROOT`  | `/sys/kernel/debug/omap_mux` |
//! | `BONEMUX_GPIO_ROOT` | `/sys/class/gpio`            |
//! | `BONEMUX_PWM_ROOT`  | `/sys/class/pwm`             |
//!
//! [`Config::from_env`]: struct.Config.html#method.from_env

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_MUX_ROOT: &str = "/sys/kernel/debug/omap_mux";
const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";
const DEFAULT_PWM_ROOT: &str = "/sys/class/pwm";

const ENV_MUX_ROOT: &str = "BONEMUX_MUX_ROOT";
const ENV_GPIO_ROOT: &str = "BONEMUX_GPIO_ROOT";
const ENV_PWM_ROOT: &str = "BONEMUX_PWM_ROOT";

/// Configuration shared by [`PinMux`] and the peripherals built on top of it.
///
/// [`PinMux`]: ../pinmux/struct.PinMux.html
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    mux_root: PathBuf,
    gpio_root: PathBuf,
    pwm_root: PathBuf,
    detect_mux: bool,
    export_timeout: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mux_root: PathBuf::from(DEFAULT_MUX_ROOT),
            gpio_root: PathBuf::from(DEFAULT_GPIO_ROOT),
            pwm_root: PathBuf::from(DEFAULT_PWM_ROOT),
            detect_mux: true,
            export_timeout: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Constructs a new `Config` with the default settings.
    pub fn new() -> Config {
        Config::default()
    }

    /// Constructs a new `Config` with the default settings, overriding the
    /// kernel roots with any `BONEMUX_*_ROOT` environment variables that are set.
    pub fn from_env() -> Config {
        let mut config = Config::default();

        if let Some(root) = env::var_os(ENV_MUX_ROOT) {
            config.mux_root = PathBuf::from(root);
        }

        if let Some(root) = env::var_os(ENV_GPIO_ROOT) {
            config.gpio_root = PathBuf::from(root);
        }

        if let Some(root) = env::var_os(ENV_PWM_ROOT) {
            config.pwm_root = PathBuf::from(root);
        }

        log::debug!("Using {:?}", config);

        config
    }

    /// Sets the directory containing the per-pin mux control files.
    pub fn with_mux_root<P: Into<PathBuf>>(mut self, root: P) -> Config {
        self.mux_root = root.into();
        self
    }

    /// Sets the root of the GPIO sysfs tree.
    pub fn with_gpio_root<P: Into<PathBuf>>(mut self, root: P) -> Config {
        self.gpio_root = root.into();
        self
    }

    /// Sets the root of the PWM sysfs tree.
    pub fn with_pwm_root<P: Into<PathBuf>>(mut self, root: P) -> Config {
        self.pwm_root = root.into();
        self
    }

    /// Enables or disables reading the pins' current mux settings on start-up.
    ///
    /// When disabled, or when a control file can't be read, pins start out with
    /// the board's power-on defaults.
    pub fn with_detect_mux(mut self, detect: bool) -> Config {
        self.detect_mux = detect;
        self
    }

    /// Sets how long to wait for the kernel to create a GPIO line's directory
    /// after exporting it.
    pub fn with_export_timeout(mut self, timeout: Duration) -> Config {
        self.export_timeout = timeout;
        self
    }

    pub fn mux_root(&self) -> &Path {
        &self.mux_root
    }

    pub fn gpio_root(&self) -> &Path {
        &self.gpio_root
    }

    pub fn pwm_root(&self) -> &Path {
        &self.pwm_root
    }

    pub fn detect_mux(&self) -> bool {
        self.detect_mux
    }

    pub fn export_timeout(&self) -> Duration {
        self.export_timeout
    }
}
