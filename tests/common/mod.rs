#![allow(dead_code)]

use embedded_hal_mock as hal;
pub use hal::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

pub use mma7660fc::{register, ADDRESS};

/// MODE read performed by `init`, reporting the given register value.
pub fn trans_probe(mode: u8) -> I2cTrans {
    I2cTrans::write_read(ADDRESS, vec![register::MODE], vec![mode])
}

pub fn trans_read(register: u8, value: u8) -> I2cTrans {
    I2cTrans::write_read(ADDRESS, vec![register], vec![value])
}

pub fn trans_write(register: u8, value: u8) -> I2cTrans {
    I2cTrans::write(ADDRESS, vec![register, value])
}
