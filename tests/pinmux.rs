use std::fs;
use std::path::Path;

use bonemux::config::Config;
use bonemux::pinmux::{Direction, Error, Function, Header, Pin, PinKind, PinMux, Pull};
use tempfile::TempDir;

fn setup() -> (TempDir, PinMux) {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new()
        .with_mux_root(root.path())
        .with_detect_mux(false);

    (root, PinMux::with_config(config))
}

fn pin(name: &str) -> Pin {
    name.parse().unwrap()
}

fn control_word(root: &Path, dev: &str) -> Option<String> {
    fs::read_to_string(root.join(dev)).ok()
}

fn assert_consistent(pinmux: &PinMux) {
    for pin in Pin::all() {
        if let Some(function) = pinmux.current_function(pin) {
            assert_eq!(pinmux.current_pin(function), Some(pin), "{}", pin);
            assert!(pin.mode_of(function).is_some());
        }
    }

    for function in Function::ALL {
        if let Some(pin) = pinmux.current_pin(*function) {
            assert_eq!(pinmux.current_function(pin), Some(*function), "{}", function);
        }
    }
}

#[test]
fn lookups() {
    let (_root, pinmux) = setup();

    assert_eq!(pinmux.pin(Header::P9, 20).unwrap(), pin("P9_20"));
    assert_eq!(pinmux.pin_by_name("P8_13").unwrap().number(), 13);
    assert_eq!(pinmux.function("i2c2_sda").unwrap(), Function::I2c2Sda);

    assert!(matches!(pinmux.pin(Header::P8, 47), Err(Error::NotFound(_))));
    assert!(matches!(pinmux.pin_by_name("P8_0"), Err(Error::NotFound(_))));
    assert!(matches!(pinmux.function("i2c9_sda"), Err(Error::NotFound(_))));
}

#[test]
fn gpio_export_is_idempotent() {
    let (_root, mut pinmux) = setup();

    for pin in Pin::all() {
        let gpio = match pin.gpio_function() {
            Some(gpio) => gpio,
            None => continue,
        };

        pinmux
            .export_on_pin(pin, gpio, Direction::In, Pull::None)
            .unwrap();
        pinmux
            .export_on_pin(pin, gpio, Direction::In, Pull::None)
            .unwrap();

        assert_eq!(pinmux.current_function(pin), Some(gpio));
        assert_eq!(pinmux.current_pin(gpio), Some(pin));
        assert_eq!(fs::read_to_string(pinmux.control_path(pin)).unwrap(), "2f\n");
    }

    assert_consistent(&pinmux);
}

#[test]
fn control_word_encoding() {
    let (root, mut pinmux) = setup();

    pinmux
        .export_on_pin(pin("P8_15"), Function::Gpio1_15, Direction::Out, Pull::Up)
        .unwrap();
    assert_eq!(control_word(root.path(), "gpmc_ad15"), Some("17\n".to_owned()));

    pinmux
        .export_on_pin(pin("P8_15"), Function::Gpio1_15, Direction::In, Pull::Down)
        .unwrap();
    assert_eq!(control_word(root.path(), "gpmc_ad15"), Some("27\n".to_owned()));

    pinmux
        .export_on_pin(pin("P9_20"), Function::I2c2Sda, Direction::Out, Pull::None)
        .unwrap();
    assert_eq!(control_word(root.path(), "uart1_ctsn"), Some("b\n".to_owned()));
}

#[test]
fn locked_pin_rejects_export_until_unlocked() {
    let (root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");

    let key = pinmux.lock(p9_20, "owner-A").unwrap();
    assert!(pinmux.is_locked(p9_20));
    assert_eq!(pinmux.locked_by(p9_20), Some("owner-A"));

    assert!(matches!(
        pinmux.export_on_pin(p9_20, Function::I2c2Sda, Direction::Out, Pull::Up),
        Err(Error::Locked { pin, function: Function::I2c2Sda }) if pin == p9_20
    ));
    assert_eq!(control_word(root.path(), "uart1_ctsn"), None);

    pinmux.unlock(p9_20, key).unwrap();
    assert!(!pinmux.is_locked(p9_20));
    assert_eq!(pinmux.locked_by(p9_20), None);

    pinmux
        .export_on_pin(p9_20, Function::I2c2Sda, Direction::Out, Pull::Up)
        .unwrap();
    assert_eq!(control_word(root.path(), "uart1_ctsn"), Some("13\n".to_owned()));
    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(p9_20));
}

#[test]
fn second_lock_fails() {
    let (_root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");

    let _key = pinmux.lock(p9_20, "owner-A").unwrap();

    match pinmux.lock(p9_20, "owner-B") {
        Err(Error::AlreadyLocked { pin, owner }) => {
            assert_eq!(pin, p9_20);
            assert_eq!(owner, "owner-A");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(
        pinmux.lock(p9_20, "owner-A"),
        Err(Error::AlreadyLocked { .. })
    ));
    assert_eq!(pinmux.locked_by(p9_20), Some("owner-A"));
}

#[test]
fn wrong_key_keeps_lock() {
    let (_root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    let key = pinmux.lock(p9_20, "owner-A").unwrap();
    let other = pinmux.lock(p9_22, "owner-B").unwrap();
    if other == key {
        return;
    }

    assert!(matches!(pinmux.unlock(p9_20, other), Err(Error::WrongKey(pin)) if pin == p9_20));
    assert!(pinmux.is_locked(p9_20));
    assert_eq!(pinmux.locked_by(p9_20), Some("owner-A"));

    pinmux.unlock(p9_20, key).unwrap();
    assert!(!pinmux.is_locked(p9_20));
}

#[test]
fn export_moves_function_from_unlocked_pin() {
    let (root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    // P9_20 comes up carrying i2c2_sda
    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(p9_20));

    pinmux
        .export_on_pin(p9_22, Function::I2c2Sda, Direction::Out, Pull::Up)
        .unwrap();

    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(p9_22));
    assert_eq!(pinmux.current_function(p9_22), Some(Function::I2c2Sda));
    assert_eq!(pinmux.current_function(p9_20), None);
    assert_eq!(pinmux.current_pin(Function::Gpio0_2), None);

    // The released pin isn't remuxed
    assert_eq!(control_word(root.path(), "uart1_ctsn"), None);
    assert_eq!(control_word(root.path(), "spi0_sclk"), Some("12\n".to_owned()));

    assert_consistent(&pinmux);
}

#[test]
fn export_conflicts_with_locked_owner() {
    let (root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    let _key = pinmux.lock(p9_20, "owner-A").unwrap();

    assert!(matches!(
        pinmux.export_on_pin(p9_22, Function::I2c2Sda, Direction::Out, Pull::Up),
        Err(Error::Conflict { function: Function::I2c2Sda, pin }) if pin == p9_20
    ));

    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(p9_20));
    assert_eq!(pinmux.current_function(p9_22), Some(Function::Gpio0_2));
    assert_eq!(control_word(root.path(), "spi0_sclk"), None);
}

#[test]
fn export_by_function() {
    let (root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    // Already assigned, so nothing is written
    assert_eq!(
        pinmux
            .export(Function::I2c2Sda, Direction::Out, Pull::Up)
            .unwrap(),
        p9_20
    );
    assert_eq!(control_word(root.path(), "uart1_ctsn"), None);

    pinmux
        .export_on_pin(p9_20, Function::Gpio0_12, Direction::In, Pull::None)
        .unwrap();
    assert_eq!(pinmux.current_pin(Function::I2c2Sda), None);

    let _key = pinmux.lock(p9_20, "owner-A").unwrap();
    assert_eq!(
        pinmux
            .export(Function::I2c2Sda, Direction::Out, Pull::Up)
            .unwrap(),
        p9_22
    );
    assert_eq!(pinmux.current_function(p9_22), Some(Function::I2c2Sda));

    assert_consistent(&pinmux);
}

#[test]
fn export_fails_when_all_candidates_are_locked() {
    let (_root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    pinmux
        .export_on_pin(p9_20, Function::Gpio0_12, Direction::In, Pull::None)
        .unwrap();

    let _a = pinmux.lock(p9_20, "owner-A").unwrap();
    let _b = pinmux.lock(p9_22, "owner-B").unwrap();

    match pinmux.export(Function::I2c2Sda, Direction::Out, Pull::Up) {
        Err(Error::AllPinsLocked {
            function,
            candidates,
        }) => {
            assert_eq!(function, Function::I2c2Sda);
            assert_eq!(candidates, vec![p9_20, p9_22]);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(pinmux.current_function(p9_20), Some(Function::Gpio0_12));
    assert_eq!(pinmux.current_function(p9_22), Some(Function::Gpio0_2));
    assert_eq!(pinmux.current_pin(Function::I2c2Sda), None);
}

#[test]
fn all_locked_lists_each_pin_once() {
    let (_root, mut pinmux) = setup();
    let p8_36 = pin("P8_36");
    let p9_30 = pin("P9_30");

    // P8_36 carries mcasp0_axr0 at both mode 3 and mode 4
    let modes: Vec<(Pin, u8)> = pinmux
        .candidates(Function::Mcasp0Axr0)
        .iter()
        .map(|candidate| (candidate.pin, candidate.mode))
        .collect();
    assert_eq!(modes, vec![(p8_36, 3), (p8_36, 4), (p9_30, 0)]);

    let _a = pinmux.lock(p8_36, "owner-A").unwrap();
    let _b = pinmux.lock(p9_30, "owner-B").unwrap();

    let err = pinmux
        .export(Function::Mcasp0Axr0, Direction::Out, Pull::None)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot export mcasp0_axr0 function: all possible pins (P8_36, P9_30) are locked"
    );
    match err {
        Error::AllPinsLocked { candidates, .. } => assert_eq!(candidates, vec![p8_36, p9_30]),
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(pinmux.current_function(p8_36), Some(Function::LcdData10));
    assert_eq!(pinmux.current_function(p9_30), Some(Function::Spi1D1));
}

#[test]
fn incompatible_function() {
    let (root, mut pinmux) = setup();
    let p9_20 = pin("P9_20");

    assert!(matches!(
        pinmux.export_on_pin(p9_20, Function::Ehrpwm2B, Direction::Out, Pull::None),
        Err(Error::Incompatible { .. })
    ));
    assert_eq!(pinmux.current_function(p9_20), Some(Function::I2c2Sda));
    assert_eq!(control_word(root.path(), "uart1_ctsn"), None);
}

#[test]
fn fixed_pins() {
    let (_root, mut pinmux) = setup();
    let gnd = pin("P9_1");

    assert_eq!(gnd.kind(), PinKind::Fixed { signal: "GND" });
    assert!(pinmux.is_locked(gnd));
    assert_eq!(pinmux.current_function(gnd), None);
    assert!(matches!(pinmux.lock(gnd, "owner-A"), Err(Error::FixedPin(_))));
    assert!(matches!(
        pinmux.export_on_pin(gnd, Function::I2c2Sda, Direction::Out, Pull::None),
        Err(Error::Incompatible { .. })
    ));
}

#[test]
fn failed_write_leaves_state_unchanged() {
    let root = tempfile::tempdir().unwrap();
    let config = Config::new()
        .with_mux_root(root.path().join("missing"))
        .with_detect_mux(false);
    let mut pinmux = PinMux::with_config(config);
    let p9_20 = pin("P9_20");
    let p9_22 = pin("P9_22");

    assert!(matches!(
        pinmux.export_on_pin(p9_22, Function::I2c2Sda, Direction::Out, Pull::Up),
        Err(Error::Io(_))
    ));

    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(p9_20));
    assert_eq!(pinmux.current_function(p9_22), Some(Function::Gpio0_2));
}

#[test]
fn detect_mux_from_kernel_reports() {
    let root = tempfile::tempdir().unwrap();
    // P9_20 reports mode 7 (gpio0_12), P9_22 reports mode 2 (i2c2_sda)
    fs::write(
        root.path().join("uart1_ctsn"),
        "name: uart1_ctsn.gpio0_12 (0x44e10978/0x978 = 0x0037), b NA, t NA\n",
    )
    .unwrap();
    fs::write(
        root.path().join("spi0_sclk"),
        "name: spi0_sclk.i2c2_sda (0x44e10950/0x950 = 0x0032), b NA, t NA\n",
    )
    .unwrap();
    // P8_13 report can't be parsed, so its default applies
    fs::write(root.path().join("gpmc_ad9"), "garbage\n").unwrap();

    let pinmux = PinMux::with_config(Config::new().with_mux_root(root.path()));

    assert_eq!(pinmux.current_function(pin("P9_20")), Some(Function::Gpio0_12));
    assert_eq!(pinmux.current_function(pin("P9_22")), Some(Function::I2c2Sda));
    assert_eq!(pinmux.current_function(pin("P8_13")), Some(Function::Gpio0_23));
    assert_consistent(&pinmux);
}

#[test]
fn detect_mux_drops_duplicate_function() {
    let root = tempfile::tempdir().unwrap();
    // P9_20 keeps its default i2c2_sda, and P9_22 reports i2c2_sda as well
    fs::write(
        root.path().join("spi0_sclk"),
        "name: spi0_sclk.i2c2_sda (0x44e10950/0x950 = 0x0032), b NA, t NA\n",
    )
    .unwrap();

    let pinmux = PinMux::with_config(Config::new().with_mux_root(root.path()));

    assert_eq!(pinmux.current_pin(Function::I2c2Sda), Some(pin("P9_20")));
    assert_eq!(pinmux.current_function(pin("P9_22")), None);
    assert_consistent(&pinmux);
}
