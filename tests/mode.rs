mod common;

use e220::{Config, Device, Error, NoAux, OperatingMode, ResponseStatus};

const ALL_MODES: [OperatingMode; 4] = [
    OperatingMode::Normal,
    OperatingMode::WorTransmitter,
    OperatingMode::WorReceiver,
    OperatingMode::Configuration,
];

#[test]
fn each_mode_drives_each_line_once() {
    for mode in ALL_MODES {
        let (mut device, module) = common::device();
        assert_eq!(device.mode(), OperatingMode::Uninitialized);

        device.set_mode(mode).unwrap();

        let module = module.borrow();
        assert_eq!(device.mode(), mode);
        assert_eq!(module.m0_writes, 1);
        assert_eq!(module.m1_writes, 1);

        let expected = match mode {
            OperatingMode::Normal => (false, false),
            OperatingMode::WorTransmitter => (true, false),
            OperatingMode::WorReceiver => (false, true),
            _ => (true, true),
        };
        assert_eq!((module.m0, module.m1), expected);
    }
}

#[test]
fn repeated_mode_is_applied_again() {
    let (mut device, module) = common::device();
    device.set_mode(OperatingMode::Configuration).unwrap();
    device.set_mode(OperatingMode::Configuration).unwrap();

    assert_eq!(module.borrow().m0_writes, 2);
    assert_eq!(module.borrow().m1_writes, 2);
    assert_eq!(device.mode(), OperatingMode::Configuration);
}

#[test]
fn init_selects_normal_mode() {
    let (mut device, module) = common::device();
    device.init().unwrap();

    assert_eq!(device.mode(), OperatingMode::Normal);
    assert!(!module.borrow().m0 && !module.borrow().m1);
}

#[test]
fn uninitialized_is_not_a_target() {
    let (mut device, module) = common::device();
    assert_eq!(
        device.set_mode(OperatingMode::Uninitialized),
        Err(Error::InvalidParameter)
    );
    assert_eq!(module.borrow().m0_writes, 0);
}

#[test]
fn stuck_aux_times_out_within_bound() {
    let config = Config::default();
    let (mut device, module) = common::device_with(config);
    module.borrow_mut().aux_stuck_low = true;

    let result = device.set_mode(OperatingMode::Configuration);
    assert_eq!(result, Err(Error::Timeout));
    assert_eq!(result.unwrap_err().status(), ResponseStatus::Timeout);
    assert_eq!(device.mode(), OperatingMode::Uninitialized);

    let bound = u64::from(2 * config.mode_switch_delay_ms + config.aux_timeout_ms);
    let elapsed = module.borrow().elapsed_ms();
    assert!(elapsed >= u64::from(config.aux_timeout_ms));
    assert!(elapsed <= bound, "waited {elapsed}ms, bound {bound}ms");
}

#[test]
fn shorter_aux_timeout_is_honored() {
    let (mut device, module) = common::device_with(Config::default().with_aux_timeout_ms(50));
    module.borrow_mut().aux_stuck_low = true;

    assert_eq!(device.set_mode(OperatingMode::Normal), Err(Error::Timeout));
    assert!(module.borrow().elapsed_ms() <= 50 + 2 * 40);
}

#[test]
fn in_mode_restores_previous_mode() {
    let (mut device, module) = common::device();
    device.init().unwrap();

    let seen = device
        .in_mode(OperatingMode::Configuration, |device| Ok(device.mode()))
        .unwrap();

    assert_eq!(seen, OperatingMode::Configuration);
    assert_eq!(device.mode(), OperatingMode::Normal);
    assert!(!module.borrow().m0 && !module.borrow().m1);
}

#[test]
fn in_mode_restores_after_failure() {
    let (mut device, _module) = common::device();
    device.set_mode(OperatingMode::WorReceiver).unwrap();

    let result: Result<(), Error> =
        device.in_mode(OperatingMode::Configuration, |_| Err(Error::WrongFormat));

    assert_eq!(result, Err(Error::WrongFormat));
    assert_eq!(device.mode(), OperatingMode::WorReceiver);
}

#[test]
fn in_mode_from_uninitialized_stays_in_target() {
    let (mut device, _module) = common::device();
    device
        .in_mode(OperatingMode::Configuration, |_| Ok(()))
        .unwrap();
    assert_eq!(device.mode(), OperatingMode::Configuration);
}

#[test]
fn without_aux_waits_fixed_delay() {
    let (device, module) = common::device();
    let (uart, m0, m1, _aux, delay) = device.release();
    let config = Config::default();
    let mut device = Device::new(uart, m0, m1, None::<NoAux>, delay, config);
    assert_eq!(device.config(), &config);

    module.borrow_mut().aux_stuck_low = true;
    device.set_mode(OperatingMode::Configuration).unwrap();

    let expected = u64::from(
        2 * config.mode_switch_delay_ms + config.no_aux_wait_ms + config.aux_settle_ms,
    );
    assert_eq!(module.borrow().elapsed_ms(), expected);
    assert_eq!(device.mode(), OperatingMode::Configuration);
}
