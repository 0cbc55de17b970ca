//! Blade sensor interrupt binding.
//!
//! Configures the sensor pin as an input with a falling-edge interrupt and
//! routes it to `BLADE_RING`. The handler takes no context, so there is one
//! sensor per process.

use core::ffi::c_void;
use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicBool, Ordering};

use esp_idf_svc::sys::{self as esp_idf_sys, esp, EspError};

use crate::blade::BLADE_RING;
use crate::clock::MicrosClock;
use crate::config::TachometerConfig;
use crate::hal::EspTimerClock;
use crate::log_globals::TACH_LOG_STREAM;
use crate::tachometer::Tachometer;

/// Set once a sensor pin is bound to the handler.
static ATTACHED: AtomicBool = AtomicBool::new(false);

/// Blade sensor setup errors.
#[derive(Debug)]
pub enum SensorError {
    /// A blade sensor is already bound in this process.
    AlreadyAttached,
    /// Pin number outside the chip's GPIO range.
    InvalidPin(i32),
    /// ESP-IDF GPIO driver error.
    Gpio(EspError),
}

impl From<EspError> for SensorError {
    fn from(e: EspError) -> Self {
        SensorError::Gpio(e)
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached => write!(f, "blade sensor already attached"),
            Self::InvalidPin(pin) => write!(f, "invalid blade sensor pin {}", pin),
            Self::Gpio(e) => write!(f, "GPIO error: {}", e),
        }
    }
}

/// Falling-edge handler: one blade crossing.
///
/// Runs in interrupt context. No logging, no allocation, no blocking.
unsafe extern "C" fn blade_crossing_isr(_arg: *mut c_void) {
    BLADE_RING.on_blade_crossing(EspTimerClock.now_us());
}

/// Bind the blade crossing handler to the falling edge of `pin`.
pub fn attach_blade_sensor(pin: i32) -> Result<(), SensorError> {
    if pin < 0 || pin >= esp_idf_sys::gpio_num_t_GPIO_NUM_MAX {
        return Err(SensorError::InvalidPin(pin));
    }

    if ATTACHED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(SensorError::AlreadyAttached);
    }

    bind_isr(pin).map_err(|e| {
        ATTACHED.store(false, Ordering::Release);
        SensorError::Gpio(e)
    })
}

fn bind_isr(pin: i32) -> Result<(), EspError> {
    let io_conf = esp_idf_sys::gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };

    // SAFETY: Plain driver calls with a valid config and a 'static handler
    // that ignores its argument.
    unsafe {
        esp!(esp_idf_sys::gpio_config(&io_conf))?;

        // Another driver may already have installed the shared ISR service
        let installed = esp_idf_sys::gpio_install_isr_service(0);
        if installed != esp_idf_sys::ESP_ERR_INVALID_STATE as esp_idf_sys::esp_err_t {
            esp!(installed)?;
        }

        esp!(esp_idf_sys::gpio_isr_handler_add(
            pin,
            Some(blade_crossing_isr),
            ptr::null_mut(),
        ))?;
    }

    Ok(())
}

impl Tachometer<'static, EspTimerClock> {
    /// Bind the blade sensor and build a tachometer over `BLADE_RING`.
    pub fn attach(config: TachometerConfig) -> Result<Self, SensorError> {
        attach_blade_sensor(config.blade_sensor_pin)?;

        let tach = Tachometer::new(&BLADE_RING, EspTimerClock, config);
        crate::log_info!(
            TACH_LOG_STREAM,
            EspTimerClock.now_us(),
            "tachometer on GPIO{}: {} blades, window {}, stop after {} us",
            config.blade_sensor_pin,
            config.num_prop_blades,
            BLADE_RING.capacity(),
            config.max_blade_time_us
        );

        Ok(tach)
    }
}
