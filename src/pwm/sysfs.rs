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

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;
use std::result;

/// Result type returned from methods that can have `io::Error`s.
pub type Result<T> = result::Result<T, io::Error>;

// Returns the first line of the device's request file, for instance
// "ehrpwm.1:0 free" or "ehrpwm.1:0 requested by sysfs".
pub fn request_status(device: &Path) -> Result<String> {
    let contents = fs::read_to_string(device.join("request"))?;

    Ok(contents.lines().next().unwrap_or("").trim().to_owned())
}

pub fn set_attribute(device: &Path, attribute: &str, value: u32) -> Result<()> {
    let path = device.join(attribute);
    log::debug!("Writing {} to {}", value, path.display());
    File::create(path)?.write_fmt(format_args!("{}", value))?;

    Ok(())
}

pub fn set_request(device: &Path, request: bool) -> Result<()> {
    set_attribute(device, "request", request as u32)
}

pub fn set_run(device: &Path, run: bool) -> Result<()> {
    set_attribute(device, "run", run as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_status_first_line() {
        let device = tempfile::tempdir().unwrap();
        fs::write(device.path().join("request"), "ehrpwm.1:0 free\n").unwrap();

        assert_eq!(request_status(device.path()).unwrap(), "ehrpwm.1:0 free");
    }

    #[test]
    fn write_attributes() {
        let device = tempfile::tempdir().unwrap();

        set_run(device.path(), true).unwrap();
        set_attribute(device.path(), "period_ns", 20_000_000).unwrap();

        assert_eq!(fs::read_to_string(device.path().join("run")).unwrap(), "1");
        assert_eq!(
            fs::read_to_string(device.path().join("period_ns")).unwrap(),
            "20000000"
        );
    }

    #[test]
    fn missing_device() {
        let device = tempfile::tempdir().unwrap();
        let missing = device.path().join("ecap.2");

        assert!(request_status(&missing).is_err());
        assert!(set_run(&missing, false).is_err());
    }
}
