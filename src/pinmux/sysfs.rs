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

use super::{Direction, Pull};

/// Result type returned from methods that can have `io::Error`s.
pub type Result<T> = result::Result<T, io::Error>;

const MODE_MASK: u16 = 0x07;
const PULL_DISABLE: u8 = 0x08;
const PULL_UP: u8 = 0x10;
const INPUT_ENABLE: u8 = 0x20;

// Control word layout:
//
//          +-- 5 ---+--- 4 ---+---- 3 ---+- 2:0 --+
//   Bit==1 | Input  | Pull Up | Pull Dis |        |
//          +--------+---------+----------+  Mode  +
//   Bit==0 | Output | Pull Dn | Pull En  |        |
//          +--------+---------+----------+--------+
pub fn encode(mode: u8, direction: Direction, pull: Pull) -> u8 {
    let mut code = mode & MODE_MASK as u8;

    match pull {
        Pull::None => code |= PULL_DISABLE,
        Pull::Up => code |= PULL_UP,
        Pull::Down => (),
    }

    if direction == Direction::In {
        code |= INPUT_ENABLE;
    }

    code
}

pub fn write_mux(path: &Path, code: u8) -> Result<()> {
    log::debug!("Writing {:x} to {}", code, path.display());

    File::create(path)?.write_fmt(format_args!("{:x}\n", code))?;

    Ok(())
}

// The kernel reports the active control word on the first line of the control
// file, e.g. "name: gpmc_ad6.gpio1_6 (0x44e10818/0x818 = 0x0037), b NA, t NA".
fn parse_mux_word(contents: &str) -> Option<u16> {
    let line = contents.lines().next()?;
    let start = line.find("= 0x")? + "= 0x".len();
    let digits: String = line[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();

    u16::from_str_radix(&digits, 16).ok()
}

/// Reads the mode code currently active on the pin behind `path`.
///
/// Returns `Ok(None)` if the file doesn't contain a recognizable control word.
pub fn read_mode(path: &Path) -> Result<Option<u8>> {
    let contents = fs::read_to_string(path)?;

    Ok(parse_mux_word(&contents).map(|word| (word & MODE_MASK) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_pull_bits() {
        assert_eq!(encode(7, Direction::Out, Pull::None), 0x0f);
        assert_eq!(encode(7, Direction::Out, Pull::Up), 0x17);
        assert_eq!(encode(7, Direction::Out, Pull::Down), 0x07);
    }

    #[test]
    fn encode_input_enable() {
        assert_eq!(encode(3, Direction::In, Pull::None), 0x2b);
        assert_eq!(encode(0, Direction::In, Pull::Up), 0x30);
        assert_eq!(encode(2, Direction::In, Pull::Down), 0x22);
    }

    #[test]
    fn encode_masks_mode() {
        assert_eq!(encode(0x0f, Direction::Out, Pull::Down), 0x07);
    }

    #[test]
    fn parse_kernel_report() {
        let report = "name: gpmc_ad6.gpio1_6 (0x44e10818/0x818 = 0x0037), b NA, t NA\n\
                      mode: OMAP_PIN_INPUT_PULLUP | OMAP_MUX_MODE7\n\
                      signals: gpmc_ad6 | mmc1_dat6 | NA | NA | NA | NA | NA | gpio1_6\n";

        assert_eq!(parse_mux_word(report), Some(0x37));
    }

    #[test]
    fn parse_garbage() {
        assert_eq!(parse_mux_word(""), None);
        assert_eq!(parse_mux_word("2f\n"), None);
        assert_eq!(parse_mux_word("name: spi0_cs0 (= 0x), b NA"), None);
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpmc_ad9");

        write_mux(&path, 0x2f).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "2f\n");

        // A plain control word isn't a kernel report.
        assert_eq!(read_mode(&path).unwrap(), None);

        fs::write(&path, "name: gpmc_ad9.gpio0_23 (0x44e10824/0x824 = 0x0034), b NA, t NA\n").unwrap();
        assert_eq!(read_mode(&path).unwrap(), Some(4));
    }
}
