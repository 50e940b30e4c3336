//! Integration tests for the async AS5600 driver using a mocked I2C bus.

use as5600::asynch::As5600;
use as5600::{Error, MagnetStatus};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

const ADDR: u8 = 0x36;

fn read_byte(register: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write_read(ADDR, vec![register], vec![value])
}

fn read_word(register: u8, value: u16) -> I2cTransaction {
    I2cTransaction::write_read(ADDR, vec![register], value.to_be_bytes().to_vec())
}

fn write_word(register: u8, value: u16) -> I2cTransaction {
    let [msb, lsb] = value.to_be_bytes();
    I2cTransaction::write(ADDR, vec![register, msb, lsb])
}

fn done(sensor: As5600<I2cMock, NoopDelay>) {
    let (mut i2c, _delay) = sensor.release();
    i2c.done();
}

#[tokio::test]
async fn reads_raw_angle() {
    let expectations = [read_word(0x0C, 0x0ABC)];

    let mut sensor = As5600::new(I2cMock::new(&expectations), NoopDelay::new());

    let angle = sensor.raw_angle().await.unwrap();
    assert_eq!(angle, 0x0ABC);

    done(sensor);
}

#[tokio::test]
async fn decodes_magnet_status() {
    let expectations = [read_byte(0x0B, 0x30)];

    let mut sensor = As5600::new(I2cMock::new(&expectations), NoopDelay::new());

    assert_eq!(sensor.magnet_status().await.unwrap(), MagnetStatus::TooWeak);

    done(sensor);
}

#[tokio::test]
async fn sets_zero_position_from_current_raw_angle() {
    let expectations = [
        read_word(0x0C, 0x0321),
        write_word(0x01, 0x0321),
        read_word(0x01, 0x0321),
    ];

    let mut sensor = As5600::new(I2cMock::new(&expectations), NoopDelay::new());

    let readback = sensor.set_zero_position(None).await.unwrap();
    assert_eq!(readback, 0x0321);

    done(sensor);
}

#[tokio::test]
async fn burn_angle_requires_magnet_first() {
    // MD clear fails before the burn count or positions are considered
    let expectations = [
        read_word(0x01, 0x0000),
        read_word(0x03, 0x0000),
        read_byte(0x0B, 0x00),
    ];

    let mut sensor = As5600::new(I2cMock::new(&expectations), NoopDelay::new());

    let result = sensor.burn_angle().await;
    assert!(matches!(result, Err(Error::MagnetNotDetected)));

    done(sensor);
}

#[tokio::test]
async fn burn_angle_passes_preconditions_without_burning() {
    let expectations = [
        read_word(0x01, 0x0010),
        read_word(0x03, 0x0020),
        read_byte(0x0B, 0x20),
        read_byte(0x00, 0),
    ];

    let mut sensor = As5600::new(I2cMock::new(&expectations), NoopDelay::new());

    sensor.burn_angle().await.unwrap();

    done(sensor);
}
