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

// Connector tables for the BeagleBone's P8 and P9 expansion headers.
//
// Each muxable pin lists the function selected by mode codes 0-7 (`_` where the
// kernel doesn't expose a signal), and the mode the board comes up in. Mode 7
// is the pin's GPIO function on every pin that has one.

use std::fmt;

use super::Function;

/// Number of pins on each expansion header.
pub const PINS_PER_HEADER: u8 = 46;

/// Expansion headers.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Header {
    P8,
    P9,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Header::P8 => write!(f, "P8"),
            Header::P9 => write!(f, "P9"),
        }
    }
}

/// Pin variants.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PinKind {
    /// Muxable pin without a GPIO function.
    Plain,
    /// Muxable pin with a GPIO function on kernel GPIO line `line`.
    Gpio { line: u8 },
    /// Power, ground, reset or analog pin that can't be remuxed.
    Fixed { signal: &'static str },
}

#[derive(Debug)]
pub(crate) struct PinDef {
    pub(crate) name: &'static str,
    // Control file name under the mux root
    pub(crate) dev: &'static str,
    pub(crate) kind: PinKind,
    pub(crate) modes: [Option<Function>; 8],
    pub(crate) default_mode: u8,
}

macro_rules! mode {
    (_) => {
        None
    };
    ($function:ident) => {
        Some(Function::$function)
    };
}

macro_rules! fixed_pin {
    ($name:literal, $signal:literal) => {
        PinDef {
            name: $name,
            dev: "",
            kind: PinKind::Fixed { signal: $signal },
            modes: [None; 8],
            default_mode: 0,
        }
    };
}

macro_rules! muxed_pin {
    ($name:literal, $dev:literal, [$($mode:tt),*], $default:literal) => {
        PinDef {
            name: $name,
            dev: $dev,
            kind: PinKind::Plain,
            modes: [$(mode!($mode)),*],
            default_mode: $default,
        }
    };
}

macro_rules! gpio_pin {
    ($name:literal, $dev:literal, $bank:literal, $offset:literal, [$($mode:tt),*], $default:literal) => {
        PinDef {
            name: $name,
            dev: $dev,
            kind: PinKind::Gpio { line: $bank * 32 + $offset },
            modes: [$(mode!($mode)),*],
            default_mode: $default,
        }
    };
}

pub(crate) static P8: [PinDef; PINS_PER_HEADER as usize] = [
    fixed_pin!("P8_1", "GND"),
    fixed_pin!("P8_2", "GND"),
    gpio_pin!("P8_3", "gpmc_ad6", 1, 6, [GpmcAd6, Mmc1Dat6, _, _, _, _, _, Gpio1_6], 7),
    gpio_pin!("P8_4", "gpmc_ad7", 1, 7, [GpmcAd7, Mmc1Dat7, _, _, _, _, _, Gpio1_7], 0),
    gpio_pin!("P8_5", "gpmc_ad2", 1, 2, [GpmcAd2, Mmc1Dat2, _, _, _, _, _, Gpio1_2], 0),
    gpio_pin!("P8_6", "gpmc_ad3", 1, 3, [GpmcAd3, Mmc1Dat3, _, _, _, _, _, Gpio1_3], 7),
    muxed_pin!("P8_7", "gpmc_advn_ale", [GpmcAdvnAle, _, _, _, _, _, _, _], 0),
    gpio_pin!("P8_8", "gpmc_oen_ren", 2, 3, [GpmcOenRen, _, _, _, _, _, _, Gpio2_3], 0),
    gpio_pin!("P8_9", "gpmc_ben0_cle", 2, 5, [GpmcBen0Cle, _, _, _, _, _, _, Gpio2_5], 0),
    gpio_pin!("P8_10", "gpmc_wen", 2, 4, [GpmcWen, _, _, _, _, _, _, Gpio2_4], 0),
    gpio_pin!("P8_11", "gpmc_ad13", 1, 13, [GpmcAd13, LcdData18, Mmc1Dat5, Mmc2Dat1, Eqep2BIn, _, _, Gpio1_13], 7),
    gpio_pin!("P8_12", "gpmc_ad12", 1, 12, [GpmcAd12, LcdData19, Mmc1Dat4, Mmc2Dat0, Eqep2aIn, _, _, Gpio1_12], 7),
    gpio_pin!("P8_13", "gpmc_ad9", 0, 23, [GpmcAd9, LcdData22, Mmc1Dat1, Mmc2Dat5, Ehrpwm2B, _, _, Gpio0_23], 7),
    gpio_pin!("P8_14", "gpmc_ad10", 0, 26, [GpmcAd10, LcdData21, Mmc1Dat2, Mmc2Dat6, Ehrpwm2TripzoneInput, _, _, Gpio0_26], 7),
    gpio_pin!("P8_15", "gpmc_ad15", 1, 15, [GpmcAd15, LcdData16, Mmc1Dat7, Mmc2Dat3, Eqep2Strobe, _, _, Gpio1_15], 7),
    gpio_pin!("P8_16", "gpmc_ad14", 1, 14, [GpmcAd14, LcdData17, Mmc1Dat6, Mmc2Dat2, Eqep2Index, _, _, Gpio1_14], 7),
    gpio_pin!("P8_17", "gpmc_ad11", 0, 27, [GpmcAd11, LcdData20, Mmc1Dat3, Mmc2Dat7, Ehrpwm0Synco, _, _, Gpio0_27], 7),
    gpio_pin!("P8_18", "gpmc_clk", 2, 1, [GpmcClk, LcdMemoryClkMux, _, Mmc2Clk, _, _, Mcasp0Fsr, Gpio2_1], 7),
    gpio_pin!("P8_19", "gpmc_ad8", 0, 22, [GpmcAd8, LcdData23, Mmc1Dat0, Mmc2Dat4, Ehrpwm2A, _, _, Gpio0_22], 7),
    gpio_pin!("P8_20", "gpmc_csn2", 1, 31, [GpmcCsn2, GpmcBe1n, Mmc1Cmd, _, _, _, _, Gpio1_31], 7),
    gpio_pin!("P8_21", "gpmc_csn1", 1, 30, [GpmcCsn1, GpmcClk, Mmc1Clk, _, _, _, _, Gpio1_30], 7),
    gpio_pin!("P8_22", "gpmc_ad5", 1, 5, [GpmcAd5, Mmc1Dat5, _, _, _, _, _, Gpio1_5], 0),
    gpio_pin!("P8_23", "gpmc_ad4", 1, 4, [GpmcAd4, Mmc1Dat4, _, _, _, _, _, Gpio1_4], 0),
    gpio_pin!("P8_24", "gpmc_ad1", 1, 1, [GpmcAd1, Mmc1Dat1, _, _, _, _, _, Gpio1_1], 0),
    gpio_pin!("P8_25", "gpmc_ad0", 1, 0, [GpmcAd0, Mmc1Dat0, _, _, _, _, _, Gpio1_0], 0),
    gpio_pin!("P8_26", "gpmc_csn0", 1, 29, [GpmcCsn0, _, _, _, _, _, _, Gpio1_29], 0),
    gpio_pin!("P8_27", "lcd_vsync", 2, 22, [LcdVsync, GpmcA8, _, _, _, _, _, Gpio2_22], 7),
    gpio_pin!("P8_28", "lcd_pclk", 2, 24, [LcdPclk, GpmcA10, _, _, _, _, _, Gpio2_24], 7),
    gpio_pin!("P8_29", "lcd_hsync", 2, 23, [LcdHsync, GpmcA9, _, _, _, _, _, Gpio2_23], 7),
    gpio_pin!("P8_30", "lcd_ac_bias_en", 2, 25, [LcdAcBiasEn, GpmcA11, _, _, _, _, _, Gpio2_25], 7),
    gpio_pin!("P8_31", "lcd_data14", 0, 10, [LcdData14, GpmcA18, _, Mcasp0Axr1, _, _, _, Gpio0_10], 0),
    gpio_pin!("P8_32", "lcd_data15", 0, 11, [LcdData15, GpmcA19, _, Mcasp0Ahclkx, Mcasp0Axr3, _, _, Gpio0_11], 0),
    gpio_pin!("P8_33", "lcd_data13", 0, 9, [LcdData13, GpmcA17, _, Mcasp0Fsr, Mcasp0Axr3, _, _, Gpio0_9], 0),
    gpio_pin!("P8_34", "lcd_data11", 2, 17, [LcdData11, GpmcA15, _, Mcasp0Ahclkr, Mcasp0Axr2, _, _, Gpio2_17], 0),
    gpio_pin!("P8_35", "lcd_data12", 0, 8, [LcdData12, GpmcA16, _, Mcasp0Aclkr, Mcasp0Axr2, _, _, Gpio0_8], 0),
    gpio_pin!("P8_36", "lcd_data10", 2, 16, [LcdData10, GpmcA14, Ehrpwm1A, Mcasp0Axr0, Mcasp0Axr0, _, Uart3Ctsn, Gpio2_16], 0),
    gpio_pin!("P8_37", "lcd_data8", 2, 14, [LcdData8, GpmcA12, _, Mcasp0Aclkx, _, _, Uart2Ctsn, Gpio2_14], 0),
    gpio_pin!("P8_38", "lcd_data9", 2, 15, [LcdData9, GpmcA13, _, Mcasp0Fsx, _, _, Uart2Rtsn, Gpio2_15], 0),
    gpio_pin!("P8_39", "lcd_data6", 2, 12, [LcdData6, GpmcA6, _, Eqep2Index, _, _, _, Gpio2_12], 0),
    gpio_pin!("P8_40", "lcd_data7", 2, 13, [LcdData7, GpmcA7, _, Eqep2Strobe, _, _, _, Gpio2_13], 0),
    gpio_pin!("P8_41", "lcd_data4", 2, 10, [LcdData4, GpmcA4, _, EQEP2AIn, _, _, _, Gpio2_10], 0),
    gpio_pin!("P8_42", "lcd_data5", 2, 11, [LcdData5, GpmcA5, _, Eqep2bIn, _, _, _, Gpio2_11], 0),
    gpio_pin!("P8_43", "lcd_data2", 2, 8, [LcdData2, GpmcA2, _, Ehrpwm2TripzoneInput, _, _, _, Gpio2_8], 0),
    gpio_pin!("P8_44", "lcd_data3", 2, 9, [LcdData3, GpmcA3, _, Ehrpwm0Synco, _, _, _, Gpio2_9], 0),
    gpio_pin!("P8_45", "lcd_data0", 2, 6, [LcdData0, GpmcA0, _, Ehrpwm2A, _, _, _, Gpio2_6], 0),
    gpio_pin!("P8_46", "lcd_data1", 2, 7, [LcdData1, GpmcA1, _, Ehrpwm2B, _, _, _, Gpio2_7], 0),
];

pub(crate) static P9: [PinDef; PINS_PER_HEADER as usize] = [
    fixed_pin!("P9_1", "GND"),
    fixed_pin!("P9_2", "GND"),
    fixed_pin!("P9_3", "VDD_3V3EXP"),
    fixed_pin!("P9_4", "VDD_3V3EXP"),
    fixed_pin!("P9_5", "VDD_5V"),
    fixed_pin!("P9_6", "VDD_5V"),
    fixed_pin!("P9_7", "SYS_5V"),
    fixed_pin!("P9_8", "SYS_5V"),
    fixed_pin!("P9_9", "PWR_BUT"),
    fixed_pin!("P9_10", "SYS_RESETn"),
    gpio_pin!("P9_11", "gpmc_wait0", 0, 30, [GpmcWait0, Mii2Crs, _, Rmii2CrsDv, Mmc1Sdcd, _, _, Gpio0_30], 0),
    gpio_pin!("P9_12", "gpmc_ben1", 1, 28, [GpmcBen1, Mii2Col, _, Mmc2Dat3, _, _, Mcasp0Aclkr, Gpio1_28], 7),
    gpio_pin!("P9_13", "gpmc_wpn", 0, 31, [GpmcWpn, Mii2Rxerr, _, Rmii2Rxerr, Mmc2Sdcd, _, _, Gpio0_31], 7),
    gpio_pin!("P9_14", "gpmc_a2", 1, 18, [GpmcA2, Gmii2Txd3, Rgmii2Td3, Mmc2Dat1, GpmcA18, _, Ehrpwm1A, Gpio1_18], 7),
    gpio_pin!("P9_15", "gpmc_a0", 1, 16, [GpmcA0, Gmii2Txen, Rgmii2Tctl, Rmii2Txen, GpmcA16, _, Ehrpwm1TripzoneInput, Gpio1_16], 7),
    gpio_pin!("P9_16", "gpmc_a3", 1, 19, [GpmcA3, Gmii2Txd2, Rgmii2Td2, Mmc2Dat2, GpmcA19, _, Ehrpwm1B, Gpio1_19], 7),
    gpio_pin!("P9_17", "spi0_cs0", 0, 5, [Spi0Cs0, Mmc2Sdwp, I2c1Scl, _, _, _, _, Gpio0_5], 2),
    gpio_pin!("P9_18", "spi0_d1", 0, 4, [Spi0D1, Mmc1Sdwp, I2c1Sda, _, _, _, _, Gpio0_4], 2),
    gpio_pin!("P9_19", "uart1_rtsn", 0, 13, [Uart1Rtsn, _, DCan0Rx, I2c2Scl, Spi1Cs1, _, _, Gpio0_13], 3),
    gpio_pin!("P9_20", "uart1_ctsn", 0, 12, [Uart1Ctsn, _, DCan0Tx, I2c2Sda, Spi1Cs0, _, _, Gpio0_12], 3),
    gpio_pin!("P9_21", "spi0_d0", 0, 3, [Spi0D0, Uart2Txd, I2c2Scl, _, _, _, _, Gpio0_3], 7),
    gpio_pin!("P9_22", "spi0_sclk", 0, 2, [Spi0Sclk, Uart2Rxd, I2c2Sda, _, _, _, _, Gpio0_2], 7),
    gpio_pin!("P9_23", "gpmc_a1", 1, 17, [GpmcA1, Gmii2Rxdv, Rgmii2Rctl, Mmc2Dat0, GpmcA17, _, Ehrpwm0Synco, Gpio1_17], 7),
    gpio_pin!("P9_24", "uart1_txd", 0, 15, [Uart1Txd, Mmc2Sdwp, DCan1Rx, I2c1Scl, _, _, _, Gpio0_15], 7),
    gpio_pin!("P9_25", "mcasp0_ahclkx", 3, 21, [Mcasp0Ahclkx, _, Mcasp0Axr3, Mcasp1Axr1, _, _, _, Gpio3_21], 7),
    gpio_pin!("P9_26", "uart1_rxd", 0, 14, [Uart1Rxd, Mmc1Sdwp, DCan1Tx, I2c1Sda, _, _, _, Gpio0_14], 7),
    gpio_pin!("P9_27", "mcasp0_fsr", 3, 19, [Mcasp0Fsr, _, Mcasp0Axr3, Mcasp1Fsx, _, _, _, Gpio3_19], 7),
    gpio_pin!("P9_28", "mcasp0_ahclkr", 3, 17, [Mcasp0Ahclkr, _, Mcasp0Axr2, Spi1Cs0, Ecap2InPwm2Out, _, _, Gpio3_17], 3),
    gpio_pin!("P9_29", "mcasp0_fsx", 3, 15, [Mcasp0Fsx, Ehrpwm0B, _, Spi1D0, Mmc1Sdcd, _, _, Gpio3_15], 3),
    gpio_pin!("P9_30", "mcasp0_axr0", 3, 16, [Mcasp0Axr0, _, _, Spi1D1, Mmc2Sdcd, _, _, Gpio3_16], 3),
    gpio_pin!("P9_31", "mcasp0_aclkx", 3, 14, [Mcasp0Aclkx, Ehrpwm0A, _, Spi1Sclk, Mmc0Sdcd, _, _, Gpio3_14], 3),
    fixed_pin!("P9_32", "VADC"),
    fixed_pin!("P9_33", "AIN4"),
    fixed_pin!("P9_34", "AGND"),
    fixed_pin!("P9_35", "AIN6"),
    fixed_pin!("P9_36", "AIN5"),
    fixed_pin!("P9_37", "AIN2"),
    fixed_pin!("P9_38", "AIN3"),
    fixed_pin!("P9_39", "AIN0"),
    fixed_pin!("P9_40", "AIN1"),
    gpio_pin!("P9_41", "xdma_event_intr1", 0, 20, [XdmaEventIntr1, _, _, Clkout2, _, _, _, Gpio0_20], 3),
    gpio_pin!("P9_42", "ecap0_in_pwm0_out", 0, 7, [Ecap0InPwm0Out, Uart3Txd, Spi1Cs1, _, Spi1Sclk, Mmc0Sdwp, XdmaEventIntr2, Gpio0_7], 7),
    fixed_pin!("P9_43", "GND"),
    fixed_pin!("P9_44", "GND"),
    fixed_pin!("P9_45", "GND"),
    fixed_pin!("P9_46", "GND"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_pins() -> impl Iterator<Item = &'static PinDef> {
        P8.iter().chain(P9.iter())
    }

    #[test]
    fn names_follow_position() {
        for (i, pin) in P8.iter().enumerate() {
            assert_eq!(pin.name, format!("P8_{}", i + 1));
        }

        for (i, pin) in P9.iter().enumerate() {
            assert_eq!(pin.name, format!("P9_{}", i + 1));
        }
    }

    #[test]
    fn default_mode_selects_a_function() {
        for pin in all_pins() {
            if let PinKind::Fixed { .. } = pin.kind {
                assert!(pin.modes.iter().all(Option::is_none));
                continue;
            }

            assert!(pin.default_mode < 8, "{}", pin.name);
            assert!(pin.modes[pin.default_mode as usize].is_some(), "{}", pin.name);
            assert!(!pin.dev.is_empty(), "{}", pin.name);
        }
    }

    #[test]
    fn gpio_function_is_mode_seven() {
        for pin in all_pins() {
            if let PinKind::Gpio { line } = pin.kind {
                let gpio = pin.modes[7].expect("GPIO pin without mode 7");
                let expected = format!("gpio{}_{}", line / 32, line % 32);
                assert_eq!(gpio.name(), expected, "{}", pin.name);
            }
        }
    }

    #[test]
    fn gpio_lines() {
        assert_eq!(P8[14].kind, PinKind::Gpio { line: 47 });
        assert_eq!(P9[19].kind, PinKind::Gpio { line: 12 });
        assert_eq!(P9[0].kind, PinKind::Fixed { signal: "GND" });
        assert_eq!(P8[6].kind, PinKind::Plain);
    }
}
