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

use std::fmt;
use std::str::FromStr;

use super::Error;

function_table! {
    /// Electrical functions the AM335x can route onto the P8/P9 expansion headers.
    ///
    /// Each variant corresponds to one signal in the kernel's pin multiplexer,
    /// and can be carried by up to four different header pins. Use
    /// [`PinMux::candidates`] to list them, and [`PinMux::current_pin`] to find the pin
    /// that currently carries the function.
    ///
    /// [`PinMux::candidates`]: struct.PinMux.html#method.candidates
    /// [`PinMux::current_pin`]: struct.PinMux.html#method.current_pin
    pub enum Function {
        Clkout2 => "clkout2",
        DCan0Rx => "d_can0_rx",
        DCan0Tx => "d_can0_tx",
        DCan1Rx => "d_can1_rx",
        DCan1Tx => "d_can1_tx",
        EQEP2AIn => "eQEP2A_in",
        Ecap0InPwm0Out => "ecap0_in_pwm0_out",
        Ecap2InPwm2Out => "ecap2_in_pwm2_out",
        Ehrpwm0A => "ehrpwm0A",
        Ehrpwm0B => "ehrpwm0B",
        Ehrpwm0Synco => "ehrpwm0_synco",
        Ehrpwm1A => "ehrpwm1A",
        Ehrpwm1B => "ehrpwm1B",
        Ehrpwm1TripzoneInput => "ehrpwm1_tripzone_input",
        Ehrpwm2A => "ehrpwm2A",
        Ehrpwm2B => "ehrpwm2B",
        Ehrpwm2TripzoneInput => "ehrpwm2_tripzone_input",
        Eqep2BIn => "eqep2B_in",
        Eqep2Index => "eqep2_index",
        Eqep2Strobe => "eqep2_strobe",
        Eqep2aIn => "eqep2a_in",
        Eqep2bIn => "eqep2b_in",
        Gmii2Rxdv => "gmii2_rxdv",
        Gmii2Txd2 => "gmii2_txd2",
        Gmii2Txd3 => "gmii2_txd3",
        Gmii2Txen => "gmii2_txen",
        Gpio0_10 => "gpio0_10",
        Gpio0_11 => "gpio0_11",
        Gpio0_12 => "gpio0_12",
        Gpio0_13 => "gpio0_13",
        Gpio0_14 => "gpio0_14",
        Gpio0_15 => "gpio0_15",
        Gpio0_2 => "gpio0_2",
        Gpio0_20 => "gpio0_20",
        Gpio0_22 => "gpio0_22",
        Gpio0_23 => "gpio0_23",
        Gpio0_26 => "gpio0_26",
        Gpio0_27 => "gpio0_27",
        Gpio0_3 => "gpio0_3",
        Gpio0_30 => "gpio0_30",
        Gpio0_31 => "gpio0_31",
        Gpio0_4 => "gpio0_4",
        Gpio0_5 => "gpio0_5",
        Gpio0_7 => "gpio0_7",
        Gpio0_8 => "gpio0_8",
        Gpio0_9 => "gpio0_9",
        Gpio1_0 => "gpio1_0",
        Gpio1_1 => "gpio1_1",
        Gpio1_12 => "gpio1_12",
        Gpio1_13 => "gpio1_13",
        Gpio1_14 => "gpio1_14",
        Gpio1_15 => "gpio1_15",
        Gpio1_16 => "gpio1_16",
        Gpio1_17 => "gpio1_17",
        Gpio1_18 => "gpio1_18",
        Gpio1_19 => "gpio1_19",
        Gpio1_2 => "gpio1_2",
        Gpio1_28 => "gpio1_28",
        Gpio1_29 => "gpio1_29",
        Gpio1_3 => "gpio1_3",
        Gpio1_30 => "gpio1_30",
        Gpio1_31 => "gpio1_31",
        Gpio1_4 => "gpio1_4",
        Gpio1_5 => "gpio1_5",
        Gpio1_6 => "gpio1_6",
        Gpio1_7 => "gpio1_7",
        Gpio2_1 => "gpio2_1",
        Gpio2_10 => "gpio2_10",
        Gpio2_11 => "gpio2_11",
        Gpio2_12 => "gpio2_12",
        Gpio2_13 => "gpio2_13",
        Gpio2_14 => "gpio2_14",
        Gpio2_15 => "gpio2_15",
        Gpio2_16 => "gpio2_16",
        Gpio2_17 => "gpio2_17",
        Gpio2_22 => "gpio2_22",
        Gpio2_23 => "gpio2_23",
        Gpio2_24 => "gpio2_24",
        Gpio2_25 => "gpio2_25",
        Gpio2_3 => "gpio2_3",
        Gpio2_4 => "gpio2_4",
        Gpio2_5 => "gpio2_5",
        Gpio2_6 => "gpio2_6",
        Gpio2_7 => "gpio2_7",
        Gpio2_8 => "gpio2_8",
        Gpio2_9 => "gpio2_9",
        Gpio3_14 => "gpio3_14",
        Gpio3_15 => "gpio3_15",
        Gpio3_16 => "gpio3_16",
        Gpio3_17 => "gpio3_17",
        Gpio3_19 => "gpio3_19",
        Gpio3_21 => "gpio3_21",
        GpmcA0 => "gpmc_a0",
        GpmcA1 => "gpmc_a1",
        GpmcA10 => "gpmc_a10",
        GpmcA11 => "gpmc_a11",
        GpmcA12 => "gpmc_a12",
        GpmcA13 => "gpmc_a13",
        GpmcA14 => "gpmc_a14",
        GpmcA15 => "gpmc_a15",
        GpmcA16 => "gpmc_a16",
        GpmcA17 => "gpmc_a17",
        GpmcA18 => "gpmc_a18",
        GpmcA19 => "gpmc_a19",
        GpmcA2 => "gpmc_a2",
        GpmcA3 => "gpmc_a3",
        GpmcA4 => "gpmc_a4",
        GpmcA5 => "gpmc_a5",
        GpmcA6 => "gpmc_a6",
        GpmcA7 => "gpmc_a7",
        GpmcA8 => "gpmc_a8",
        GpmcA9 => "gpmc_a9",
        GpmcAd0 => "gpmc_ad0",
        GpmcAd1 => "gpmc_ad1",
        GpmcAd10 => "gpmc_ad10",
        GpmcAd11 => "gpmc_ad11",
        GpmcAd12 => "gpmc_ad12",
        GpmcAd13 => "gpmc_ad13",
        GpmcAd14 => "gpmc_ad14",
        GpmcAd15 => "gpmc_ad15",
        GpmcAd2 => "gpmc_ad2",
        GpmcAd3 => "gpmc_ad3",
        GpmcAd4 => "gpmc_ad4",
        GpmcAd5 => "gpmc_ad5",
        GpmcAd6 => "gpmc_ad6",
        GpmcAd7 => "gpmc_ad7",
        GpmcAd8 => "gpmc_ad8",
        GpmcAd9 => "gpmc_ad9",
        GpmcAdvnAle => "gpmc_advn_ale",
        GpmcBe1n => "gpmc_be1n",
        GpmcBen0Cle => "gpmc_ben0_cle",
        GpmcBen1 => "gpmc_ben1",
        GpmcClk => "gpmc_clk",
        GpmcCsn0 => "gpmc_csn0",
        GpmcCsn1 => "gpmc_csn1",
        GpmcCsn2 => "gpmc_csn2",
        GpmcOenRen => "gpmc_oen_ren",
        GpmcWait0 => "gpmc_wait0",
        GpmcWen => "gpmc_wen",
        GpmcWpn => "gpmc_wpn",
        I2c1Scl => "i2c1_scl",
        I2c1Sda => "i2c1_sda",
        I2c2Scl => "i2c2_scl",
        I2c2Sda => "i2c2_sda",
        LcdAcBiasEn => "lcd_ac_bias_en",
        LcdData0 => "lcd_data0",
        LcdData1 => "lcd_data1",
        LcdData10 => "lcd_data10",
        LcdData11 => "lcd_data11",
        LcdData12 => "lcd_data12",
        LcdData13 => "lcd_data13",
        LcdData14 => "lcd_data14",
        LcdData15 => "lcd_data15",
        LcdData16 => "lcd_data16",
        LcdData17 => "lcd_data17",
        LcdData18 => "lcd_data18",
        LcdData19 => "lcd_data19",
        LcdData2 => "lcd_data2",
        LcdData20 => "lcd_data20",
        LcdData21 => "lcd_data21",
        LcdData22 => "lcd_data22",
        LcdData23 => "lcd_data23",
        LcdData3 => "lcd_data3",
        LcdData4 => "lcd_data4",
        LcdData5 => "lcd_data5",
        LcdData6 => "lcd_data6",
        LcdData7 => "lcd_data7",
        LcdData8 => "lcd_data8",
        LcdData9 => "lcd_data9",
        LcdHsync => "lcd_hsync",
        LcdMemoryClkMux => "lcd_memory_clk_mux",
        LcdPclk => "lcd_pclk",
        LcdVsync => "lcd_vsync",
        Mcasp0Aclkr => "mcasp0_aclkr",
        Mcasp0Aclkx => "mcasp0_aclkx",
        Mcasp0Ahclkr => "mcasp0_ahclkr",
        Mcasp0Ahclkx => "mcasp0_ahclkx",
        Mcasp0Axr0 => "mcasp0_axr0",
        Mcasp0Axr1 => "mcasp0_axr1",
        Mcasp0Axr2 => "mcasp0_axr2",
        Mcasp0Axr3 => "mcasp0_axr3",
        Mcasp0Fsr => "mcasp0_fsr",
        Mcasp0Fsx => "mcasp0_fsx",
        Mcasp1Axr1 => "mcasp1_axr1",
        Mcasp1Fsx => "mcasp1_fsx",
        Mii2Col => "mii2_col",
        Mii2Crs => "mii2_crs",
        Mii2Rxerr => "mii2_rxerr",
        Mmc0Sdcd => "mmc0_sdcd",
        Mmc0Sdwp => "mmc0_sdwp",
        Mmc1Clk => "mmc1_clk",
        Mmc1Cmd => "mmc1_cmd",
        Mmc1Dat0 => "mmc1_dat0",
        Mmc1Dat1 => "mmc1_dat1",
        Mmc1Dat2 => "mmc1_dat2",
        Mmc1Dat3 => "mmc1_dat3",
        Mmc1Dat4 => "mmc1_dat4",
        Mmc1Dat5 => "mmc1_dat5",
        Mmc1Dat6 => "mmc1_dat6",
        Mmc1Dat7 => "mmc1_dat7",
        Mmc1Sdcd => "mmc1_sdcd",
        Mmc1Sdwp => "mmc1_sdwp",
        Mmc2Clk => "mmc2_clk",
        Mmc2Dat0 => "mmc2_dat0",
        Mmc2Dat1 => "mmc2_dat1",
        Mmc2Dat2 => "mmc2_dat2",
        Mmc2Dat3 => "mmc2_dat3",
        Mmc2Dat4 => "mmc2_dat4",
        Mmc2Dat5 => "mmc2_dat5",
        Mmc2Dat6 => "mmc2_dat6",
        Mmc2Dat7 => "mmc2_dat7",
        Mmc2Sdcd => "mmc2_sdcd",
        Mmc2Sdwp => "mmc2_sdwp",
        Rgmii2Rctl => "rgmii2_rctl",
        Rgmii2Tctl => "rgmii2_tctl",
        Rgmii2Td2 => "rgmii2_td2",
        Rgmii2Td3 => "rgmii2_td3",
        Rmii2CrsDv => "rmii2_crs_dv",
        Rmii2Rxerr => "rmii2_rxerr",
        Rmii2Txen => "rmii2_txen",
        Spi0Cs0 => "spi0_cs0",
        Spi0D0 => "spi0_d0",
        Spi0D1 => "spi0_d1",
        Spi0Sclk => "spi0_sclk",
        Spi1Cs0 => "spi1_cs0",
        Spi1Cs1 => "spi1_cs1",
        Spi1D0 => "spi1_d0",
        Spi1D1 => "spi1_d1",
        Spi1Sclk => "spi1_sclk",
        Uart1Ctsn => "uart1_ctsn",
        Uart1Rtsn => "uart1_rtsn",
        Uart1Rxd => "uart1_rxd",
        Uart1Txd => "uart1_txd",
        Uart2Ctsn => "uart2_ctsn",
        Uart2Rtsn => "uart2_rtsn",
        Uart2Rxd => "uart2_rxd",
        Uart2Txd => "uart2_txd",
        Uart3Ctsn => "uart3_ctsn",
        Uart3Txd => "uart3_txd",
        XdmaEventIntr1 => "xdma_event_intr1",
        XdmaEventIntr2 => "xdma_event_intr2",
    }
}

impl Function {
    /// Looks up a function by its kernel signal name.
    ///
    /// Names are matched exactly, so `"eqep2a_in"` and `"eQEP2A_in"` refer to
    /// two different signals.
    pub fn from_name(name: &str) -> Option<Function> {
        Function::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Returns `true` if this is one of the dedicated GPIO bank functions.
    pub fn is_gpio(self) -> bool {
        self.name().starts_with("gpio")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = Error;

    fn from_str(s: &str) -> Result<Function, Error> {
        Function::from_name(s).ok_or_else(|| {
            log::error!("Unknown pin function {}", s);
            Error::NotFound(s.to_owned())
        })
    }
}
