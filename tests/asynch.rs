#![cfg(feature = "async")]

mod common;

use common::*;
use embassy_futures::block_on;
use embedded_hal::i2c::ErrorKind;
use mma7660fc::{asynch::MMA7660FC, BackFront, Config, Error, Event, Mode, Orientation};

#[test]
fn lifecycle() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x00),
        trans_read(register::MODE, 0x41),
        trans_write(register::MODE, 0x40),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        assert_eq!(accel.read().await, Err(Error::NotInitialized));

        accel.init().await.unwrap();
        assert_eq!(accel.cached_mode(), Some(Mode::Standby));

        accel.deinit().await.unwrap();
        assert!(!accel.is_initialized());
    });

    i2c.done();
}

#[test]
fn configure_and_sample() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x00),
        trans_write(register::MODE, 0x58),
        trans_write(register::SPCNT, 127),
        trans_write(register::INTSU, 0xEF),
        trans_write(register::SR, 0xE0),
        trans_write(register::PDET, 0x02),
        trans_write(register::PD, 37),
        trans_write(register::MODE, 0x59),
        I2cTrans::write_read(ADDRESS, vec![register::XOUT], vec![0x15, 0x3F, 0x01]),
        trans_read(register::TILT, 0b0010_0001),
        trans_read(register::SRST, 0x00),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        accel.apply_config(&Config::motion()).await.unwrap();

        let sample = accel.read().await.unwrap();
        assert_eq!(sample.raw, [21, -1, 1]);

        assert_eq!(accel.irq_handler().await.unwrap(), Event::FRONT | Event::TAP);
    });

    i2c.done();
}

#[test]
fn rejects_invalid_parameters_without_bus_traffic() {
    let mut i2c = I2cMock::new(&[trans_probe(0x01)]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        assert_eq!(
            accel.set_tap_detection_threshold(32).await,
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            accel.set_tap_pulse_debounce_ms(70.0).await,
            Err(Error::InvalidParameter)
        );
    });

    i2c.done();
}

#[test]
fn bus_error_is_propagated() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x01),
        trans_read(register::INTSU, 0).with_error(ErrorKind::Other),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        assert_eq!(
            accel.interrupts().await,
            Err(Error::Bus(ErrorKind::Other))
        );
    });

    i2c.done();
}

#[test]
fn deinit_forces_standby_after_failed_read() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x01),
        trans_read(register::MODE, 0).with_error(ErrorKind::Other),
        trans_write(register::MODE, 0x00),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        assert_eq!(accel.deinit().await, Err(Error::Bus(ErrorKind::Other)));
        assert!(!accel.is_initialized());
        assert_eq!(accel.cached_mode(), None);
    });

    i2c.done();
}

#[test]
fn raw_register_access() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x00),
        I2cTrans::write(ADDRESS, vec![register::SR, 0x2C, 0xE0]),
        I2cTrans::write_read(ADDRESS, vec![register::SR], vec![0x2C, 0xE0]),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        accel.raw().write(register::SR, &[0x2C, 0xE0]).await.unwrap();

        let mut buf = [0; 2];
        accel.raw().read(register::SR, &mut buf).await.unwrap();
        assert_eq!(buf, [0x2C, 0xE0]);

        assert_eq!(
            accel.raw().write(register::XOUT, &[0; register::COUNT + 1]).await,
            Err(Error::InvalidParameter)
        );
    });

    i2c.done();
}

#[test]
fn config_and_tilt_status() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x00),
        I2cTrans::write_read(
            ADDRESS,
            vec![register::SPCNT],
            vec![127, 0xEF, 0x59, 0xE0, 0x02, 37],
        ),
        trans_read(register::TILT, 0b0001_0110),
        trans_read(register::TILT, 0b1010_0011),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();

        assert_eq!(accel.config().await.unwrap(), Config::motion());
        assert_eq!(accel.cached_mode(), Some(Mode::Active));

        let tilt = accel.tilt_status().await.unwrap();
        assert_eq!(tilt.back_front, BackFront::Back);
        assert_eq!(tilt.orientation, Orientation::Down);

        assert_eq!(
            accel.tilt_status().await,
            Err(Error::UnsupportedState {
                register: register::TILT,
                value: 0b1010_0011
            })
        );
    });

    i2c.done();
}

#[test]
fn irq_handler_keeps_gestures_with_reserved_orientation() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x01),
        trans_read(register::TILT, 0b1010_0011),
        trans_read(register::SRST, 0b01),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        assert_eq!(
            accel.irq_handler().await.unwrap(),
            Event::TAP | Event::SHAKE | Event::AUTO_SLEEP
        );
    });

    i2c.done();
}

#[test]
fn apply_config_keeps_mode_when_standby_write_fails() {
    let mut i2c = I2cMock::new(&[
        trans_probe(0x01),
        trans_write(register::MODE, 0x58).with_error(ErrorKind::Other),
    ]);
    let mut accel = MMA7660FC::new(i2c.clone());

    block_on(async {
        accel.init().await.unwrap();
        assert_eq!(
            accel.apply_config(&Config::motion()).await,
            Err(Error::Bus(ErrorKind::Other))
        );
        assert_eq!(accel.cached_mode(), Some(Mode::Active));
    });

    i2c.done();
}
