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

use std::ffi::CString;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::ptr;
use std::result;
use std::thread;
use std::time::{Duration, Instant};

use libc::{group, passwd};

use crate::pinmux::Direction;

/// Result type returned from methods that can have `io::Error`s.
pub type Result<T> = result::Result<T, io::Error>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

// Find user ID for specified user
pub fn user_to_uid(name: &str) -> Option<u32> {
    if let Ok(name_cstr) = CString::new(name) {
        let mut buf: [libc::c_char; 4096] = [0; 4096];
        let mut res: *mut passwd = ptr::null_mut();
        let mut pwd = passwd {
            pw_name: ptr::null_mut(),
            pw_passwd: ptr::null_mut(),
            pw_uid: 0,
            pw_gid: 0,
            pw_gecos: ptr::null_mut(),
            pw_dir: ptr::null_mut(),
            pw_shell: ptr::null_mut(),
        };

        unsafe {
            if libc::getpwnam_r(
                name_cstr.as_ptr(),
                &mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut res,
            ) == 0
                && !res.is_null()
            {
                return Some((*res).pw_uid);
            }
        }
    }

    None
}

// Find group ID for specified group
pub fn group_to_gid(name: &str) -> Option<u32> {
    if let Ok(name_cstr) = CString::new(name) {
        let mut buf: [libc::c_char; 4096] = [0; 4096];
        let mut res: *mut group = ptr::null_mut();
        let mut grp = group {
            gr_name: ptr::null_mut(),
            gr_passwd: ptr::null_mut(),
            gr_gid: 0,
            gr_mem: ptr::null_mut(),
        };

        unsafe {
            if libc::getgrnam_r(
                name_cstr.as_ptr(),
                &mut grp,
                buf.as_mut_ptr(),
                buf.len(),
                &mut res,
            ) == 0
                && !res.is_null()
            {
                return Some((*res).gr_gid);
            }
        }
    }

    None
}

fn is_root() -> bool {
    match user_to_uid("root") {
        Some(root_uid) => unsafe { libc::getuid() == root_uid || libc::geteuid() == root_uid },
        None => false,
    }
}

pub fn line_path(root: &Path, line: u8) -> PathBuf {
    root.join(format!("gpio{}", line))
}

pub fn export(root: &Path, line: u8, timeout: Duration) -> Result<()> {
    let path = line_path(root, line);

    // Only export if the line isn't already exported
    if path.exists() {
        return Ok(());
    }

    let export = root.join("export");
    log::debug!("Writing {} to {}", line, export.display());
    File::create(&export)?.write_fmt(format_args!("{}", line))?;

    // The line directory starts off owned by root:root. There's a short delay
    // before udev changes its group to gpio, so non-root users wait for both the
    // directory and the group change.
    let gid_gpio = if is_root() {
        None
    } else {
        Some(group_to_gid("gpio").unwrap_or(0))
    };

    let start = Instant::now();
    loop {
        if let Ok(metadata) = fs::metadata(&path) {
            if gid_gpio.map_or(true, |gid| metadata.gid() == gid) {
                break;
            }
        }

        if start.elapsed() >= timeout {
            log::warn!(
                "Timed out waiting for {} after exporting GPIO line {}",
                path.display(),
                line
            );
            break;
        }

        thread::sleep(POLL_INTERVAL);
    }

    Ok(())
}

pub fn set_direction(root: &Path, line: u8, direction: Direction) -> Result<()> {
    let b_direction: &[u8] = match direction {
        Direction::In => b"in",
        Direction::Out => b"out",
    };

    let path = line_path(root, line).join("direction");
    log::debug!("Writing {} to {}", direction, path.display());
    File::create(path)?.write_all(b_direction)?;

    Ok(())
}

pub fn set_value(root: &Path, line: u8, value: u8) -> Result<()> {
    let path = line_path(root, line).join("value");
    log::debug!("Writing {} to {}", value, path.display());
    File::create(path)?.write_fmt(format_args!("{}", value))?;

    Ok(())
}

pub fn value(root: &Path, line: u8) -> Result<bool> {
    let value = fs::read_to_string(line_path(root, line).join("value"))?;

    Ok(value.starts_with('1'))
}
