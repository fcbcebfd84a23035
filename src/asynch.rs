//! Async driver with the same operations as [`crate::MMA7660FC`].

use embedded_hal_async::i2c::I2c;

use crate::{
    register::{self, field, Field},
    tap_pulse_debounce_to_ms, tap_pulse_debounce_to_register,
    tilt::{sample_rate_status_events, Tilt},
    Acceleration, AutoWakeRate, Axes, Config, Error, Event, InterruptEnable, InterruptPinDrain,
    InterruptPinLevel, Mode, SampleRate, SleepCounterPrescaler, TiltDebounceFilter, ADDRESS,
    TAP_THRESHOLD_MAX,
};

pub struct MMA7660FC<I2C> {
    i2c: I2C,
    initialized: bool,
    mode: Option<Mode>,
}

impl<I2C: I2c<Error = E>, E> MMA7660FC<I2C> {
    /// Create an uninitialized driver. No bus traffic happens until [`init`](Self::init).
    pub fn new(i2c: I2C) -> Self {
        MMA7660FC {
            i2c,
            initialized: false,
            mode: None,
        }
    }

    /// Returns the bus, consuming the driver. Call [`deinit`](Self::deinit)
    /// first to leave the device powered down.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Mode last read from or written to the device.
    pub fn cached_mode(&self) -> Option<Mode> {
        self.mode
    }

    // Lifecycle

    /// Probe the device by reading its MODE register.
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        let mode = self.read_mode().await?;

        self.mode = Some(mode);
        self.initialized = true;
        info!("mma7660fc: initialized, mode {=u8}", mode as u8);

        Ok(())
    }

    /// Put the device in standby and mark the driver uninitialized.
    ///
    /// The standby write is attempted even when reading MODE fails, in which
    /// case the whole register is cleared and the read error is returned.
    pub async fn deinit(&mut self) -> Result<(), Error<E>> {
        self.ensure_initialized()?;

        let result = match self.read_u8(register::MODE).await {
            Ok(value) => {
                let value = field::MODE_SELECT.insert(value, Mode::Standby as u8);
                self.write(&[register::MODE, value]).await
            }
            Err(error) => {
                warn!("mma7660fc: forcing standby after failed MODE read");
                let _ = self.write(&[register::MODE, Mode::Standby as u8]).await;
                Err(error)
            }
        };

        self.initialized = false;
        self.mode = None;
        info!("mma7660fc: deinitialized");

        result
    }

    // Telemetry

    /// Read all three axes. Fails with [`Error::Alert`] if the device was
    /// updating a sample during the read.
    pub async fn read(&mut self) -> Result<Acceleration, Error<E>> {
        self.ensure_initialized()?;

        let mut buf = [0; 3];
        self.read_registers(register::XOUT, &mut buf).await?;

        Acceleration::from_registers(buf).ok_or_else(|| {
            debug!("mma7660fc: sample alert {=[u8]:#x}", &buf[..]);
            Error::Alert
        })
    }

    /// Point-in-time snapshot of the TILT register.
    pub async fn tilt_status(&mut self) -> Result<Tilt, Error<E>> {
        self.ensure_initialized()?;
        self.read_tilt().await
    }

    /// Decode every pending interrupt source. Reading TILT acknowledges the
    /// tap and shake sources on the device. Call once per INT assertion.
    ///
    /// A reserved orientation code in TILT yields no orientation event; the
    /// other sources are still reported.
    pub async fn irq_handler(&mut self) -> Result<Event, Error<E>> {
        self.ensure_initialized()?;

        // This read acknowledges tap and shake. Keep them even when the
        // orientation code is reserved.
        let value = self.read_u8(register::TILT).await?;
        if Tilt::from_register(value).is_none() {
            warn!("mma7660fc: reserved orientation in TILT {=u8:#x}", value);
        }
        let tilt = Tilt::from_register_lenient(value);

        let srst = self.read_u8(register::SRST).await?;
        let events = tilt.events() | sample_rate_status_events(srst);

        debug!("mma7660fc: interrupt events {}", events);
        Ok(events)
    }

    // Mode control

    pub async fn mode(&mut self) -> Result<Mode, Error<E>> {
        self.ensure_initialized()?;
        let mode = self.read_mode().await?;
        self.mode = Some(mode);
        Ok(mode)
    }

    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
        self.write_field(field::MODE_SELECT, mode as u8).await?;
        self.mode = Some(mode);
        Ok(())
    }

    pub async fn auto_wake_up(&mut self) -> Result<bool, Error<E>> {
        self.read_flag(field::MODE_AUTO_WAKE).await
    }

    pub async fn set_auto_wake_up(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_flag(field::MODE_AUTO_WAKE, enable).await
    }

    pub async fn auto_sleep(&mut self) -> Result<bool, Error<E>> {
        self.read_flag(field::MODE_AUTO_SLEEP).await
    }

    pub async fn set_auto_sleep(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_flag(field::MODE_AUTO_SLEEP, enable).await
    }

    /// Whether the device is currently sampling at the active rate
    /// (SRST AMSRS).
    pub async fn auto_sleep_status(&mut self) -> Result<bool, Error<E>> {
        self.read_flag(field::SRST_AUTO_SLEEP).await
    }

    /// Whether the device is currently sampling at the auto-wake rate
    /// (SRST AWSRS).
    pub async fn auto_wake_up_status(&mut self) -> Result<bool, Error<E>> {
        self.read_flag(field::SRST_AUTO_WAKE).await
    }

    pub async fn auto_wake_rate(&mut self) -> Result<AutoWakeRate, Error<E>> {
        let bits = self.read_field(field::SR_AUTO_WAKE_RATE).await?;
        Ok(AutoWakeRate::from_bits(bits))
    }

    pub async fn set_auto_wake_rate(&mut self, rate: AutoWakeRate) -> Result<(), Error<E>> {
        self.write_field(field::SR_AUTO_WAKE_RATE, rate as u8).await
    }

    pub async fn sleep_count(&mut self) -> Result<u8, Error<E>> {
        self.ensure_initialized()?;
        self.read_u8(register::SPCNT).await
    }

    pub async fn set_sleep_count(&mut self, count: u8) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write(&[register::SPCNT, count]).await
    }

    pub async fn sleep_counter_prescaler(&mut self) -> Result<SleepCounterPrescaler, Error<E>> {
        let bits = self.read_field(field::MODE_PRESCALER).await?;
        Ok(SleepCounterPrescaler::from_bits(bits))
    }

    pub async fn set_sleep_counter_prescaler(
        &mut self,
        prescaler: SleepCounterPrescaler,
    ) -> Result<(), Error<E>> {
        self.write_field(field::MODE_PRESCALER, prescaler as u8).await
    }

    // Interrupts

    pub async fn interrupts(&mut self) -> Result<InterruptEnable, Error<E>> {
        self.ensure_initialized()?;
        let value = self.read_u8(register::INTSU).await?;
        Ok(InterruptEnable::from_bits_truncate(value))
    }

    /// Replace the whole set of enabled interrupt sources.
    pub async fn set_interrupts(&mut self, interrupts: InterruptEnable) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write(&[register::INTSU, interrupts.bits()]).await
    }

    /// Enable `interrupts`, leaving the other sources as they are.
    pub async fn enable_interrupts(
        &mut self,
        interrupts: InterruptEnable,
    ) -> Result<(), Error<E>> {
        let current = self.interrupts().await?;
        self.write(&[register::INTSU, current.union(interrupts).bits()])
            .await
    }

    /// Disable `interrupts`, leaving the other sources as they are.
    pub async fn disable_interrupts(
        &mut self,
        interrupts: InterruptEnable,
    ) -> Result<(), Error<E>> {
        let current = self.interrupts().await?;
        self.write(&[register::INTSU, current.difference(interrupts).bits()])
            .await
    }

    pub async fn interrupt_pin_level(&mut self) -> Result<InterruptPinLevel, Error<E>> {
        let bits = self.read_field(field::MODE_ACTIVE_HIGH).await?;
        Ok(InterruptPinLevel::from_bits(bits))
    }

    pub async fn set_interrupt_pin_level(
        &mut self,
        level: InterruptPinLevel,
    ) -> Result<(), Error<E>> {
        self.write_field(field::MODE_ACTIVE_HIGH, level as u8).await
    }

    pub async fn interrupt_pin_drain(&mut self) -> Result<InterruptPinDrain, Error<E>> {
        let bits = self.read_field(field::MODE_PUSH_PULL).await?;
        Ok(InterruptPinDrain::from_bits(bits))
    }

    pub async fn set_interrupt_pin_drain(
        &mut self,
        drain: InterruptPinDrain,
    ) -> Result<(), Error<E>> {
        self.write_field(field::MODE_PUSH_PULL, drain as u8).await
    }

    // Gesture detection tuning

    pub async fn tap_detection_rate(&mut self) -> Result<SampleRate, Error<E>> {
        let bits = self.read_field(field::SR_ACTIVE_RATE).await?;
        Ok(SampleRate::from_bits(bits))
    }

    pub async fn set_tap_detection_rate(&mut self, rate: SampleRate) -> Result<(), Error<E>> {
        self.write_field(field::SR_ACTIVE_RATE, rate as u8).await
    }

    pub async fn tilt_debounce_filter(&mut self) -> Result<TiltDebounceFilter, Error<E>> {
        let bits = self.read_field(field::SR_FILTER).await?;
        Ok(TiltDebounceFilter::from_bits(bits))
    }

    pub async fn set_tilt_debounce_filter(
        &mut self,
        filter: TiltDebounceFilter,
    ) -> Result<(), Error<E>> {
        self.write_field(field::SR_FILTER, filter as u8).await
    }

    pub async fn tap_detection_threshold(&mut self) -> Result<u8, Error<E>> {
        self.read_field(field::PDET_THRESHOLD).await
    }

    /// Threshold in counts, 0..=31.
    pub async fn set_tap_detection_threshold(&mut self, threshold: u8) -> Result<(), Error<E>> {
        if threshold > TAP_THRESHOLD_MAX {
            warn!("mma7660fc: tap threshold {=u8} > 31", threshold);
            return Err(Error::InvalidParameter);
        }
        self.write_field(field::PDET_THRESHOLD, threshold).await
    }

    /// Axes with tap detection enabled.
    pub async fn tap_axes(&mut self) -> Result<Axes, Error<E>> {
        let bits = self.read_field(field::PDET_AXIS_DISABLE).await?;
        Ok(crate::disable_bits_to_axes(bits))
    }

    pub async fn set_tap_axes(&mut self, axes: Axes) -> Result<(), Error<E>> {
        self.write_field(field::PDET_AXIS_DISABLE, crate::axes_to_disable_bits(axes))
            .await
    }

    pub async fn tap_pulse_debounce_count(&mut self) -> Result<u8, Error<E>> {
        self.ensure_initialized()?;
        self.read_u8(register::PD).await
    }

    pub async fn set_tap_pulse_debounce_count(&mut self, count: u8) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        self.write(&[register::PD, count]).await
    }

    pub async fn tap_pulse_debounce_ms(&mut self) -> Result<f32, Error<E>> {
        let count = self.tap_pulse_debounce_count().await?;
        Ok(tap_pulse_debounce_to_ms(count))
    }

    /// Debounce time in ms, 0.52..=66.56 in 0.26ms steps.
    pub async fn set_tap_pulse_debounce_ms(&mut self, ms: f32) -> Result<(), Error<E>> {
        let count = tap_pulse_debounce_to_register(ms).ok_or_else(|| {
            warn!("mma7660fc: tap pulse debounce {=f32}ms out of range", ms);
            Error::InvalidParameter
        })?;
        self.set_tap_pulse_debounce_count(count).await
    }

    // Configuration

    /// Write a complete configuration. The device is put in standby while the
    /// registers are written and then switched to `config.mode`.
    pub async fn apply_config(&mut self, config: &Config) -> Result<(), Error<E>> {
        if !config.is_valid() {
            warn!("mma7660fc: rejected invalid configuration");
            return Err(Error::InvalidParameter);
        }
        self.ensure_initialized()?;

        let [standby, settings @ .., final_mode] = config.writes();

        self.write(&standby).await?;
        self.mode = Some(Mode::Standby);
        for write in settings {
            self.write(&write).await?;
        }
        self.write(&final_mode).await?;
        self.mode = Some(config.mode);

        Ok(())
    }

    /// Read back the configuration from SPCNT through PD.
    pub async fn config(&mut self) -> Result<Config, Error<E>> {
        self.ensure_initialized()?;

        let mut buf = [0; 6];
        self.read_registers(register::SPCNT, &mut buf).await?;

        let config = Config::from_registers(buf).map_err(|value| Error::UnsupportedState {
            register: register::MODE,
            value,
        })?;
        self.mode = Some(config.mode);

        Ok(config)
    }

    /// Direct register access, bypassing every typed accessor's validation.
    /// For advanced use only.
    pub fn raw(&mut self) -> RawRegisters<'_, I2C> {
        RawRegisters { driver: self }
    }

    // Register r/w utilities

    fn ensure_initialized(&self) -> Result<(), Error<E>> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    async fn read_mode(&mut self) -> Result<Mode, Error<E>> {
        let value = self.read_u8(register::MODE).await?;
        Mode::from_bits(field::MODE_SELECT.extract(value)).ok_or(Error::UnsupportedState {
            register: register::MODE,
            value,
        })
    }

    async fn read_tilt(&mut self) -> Result<Tilt, Error<E>> {
        let value = self.read_u8(register::TILT).await?;
        Tilt::from_register(value).ok_or(Error::UnsupportedState {
            register: register::TILT,
            value,
        })
    }

    async fn read_field(&mut self, field: Field) -> Result<u8, Error<E>> {
        self.ensure_initialized()?;
        let value = self.read_u8(field.register).await?;
        Ok(field.extract(value))
    }

    async fn write_field(&mut self, field: Field, bits: u8) -> Result<(), Error<E>> {
        self.ensure_initialized()?;
        let value = self.read_u8(field.register).await?;
        self.write(&[field.register, field.insert(value, bits)]).await
    }

    async fn read_flag(&mut self, field: Field) -> Result<bool, Error<E>> {
        Ok(self.read_field(field).await? == 1)
    }

    async fn write_flag(&mut self, field: Field, enable: bool) -> Result<(), Error<E>> {
        self.write_field(field, u8::from(enable)).await
    }

    async fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c
            .write_read(ADDRESS, &[register], buf)
            .await
            .map_err(|e| {
                warn!("mma7660fc: read of register {=u8:#x} failed", register);
                Error::Bus(e)
            })
    }

    async fn read_u8(&mut self, register: u8) -> Result<u8, Error<E>> {
        let mut data: [u8; 1] = [0; 1];
        self.read_registers(register, &mut data).await?;
        Ok(data[0])
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Error<E>> {
        self.i2c.write(ADDRESS, data).await.map_err(|e| {
            warn!("mma7660fc: write of register {=u8:#x} failed", data[0]);
            Error::Bus(e)
        })
    }
}

/// Unchecked register access, see [`MMA7660FC::raw`].
pub struct RawRegisters<'a, I2C> {
    driver: &'a mut MMA7660FC<I2C>,
}

impl<I2C: I2c<Error = E>, E> RawRegisters<'_, I2C> {
    /// Read `buf.len()` consecutive registers starting at `register`.
    pub async fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.driver.ensure_initialized()?;
        self.driver.read_registers(register, buf).await
    }

    /// Write `data` to consecutive registers starting at `register`, at most
    /// [`register::COUNT`] bytes.
    pub async fn write(&mut self, register: u8, data: &[u8]) -> Result<(), Error<E>> {
        if data.len() > register::COUNT {
            return Err(Error::InvalidParameter);
        }
        self.driver.ensure_initialized()?;

        let mut buf = [0; register::COUNT + 1];
        buf[0] = register;
        buf[1..=data.len()].copy_from_slice(data);
        self.driver.write(&buf[..=data.len()]).await
    }
}
