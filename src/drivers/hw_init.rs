//! One-shot hardware peripheral initialization.
//!
//! Configures the LEDC timers/channels for the buzzer and servo and
//! installs the host-link UART driver using raw ESP-IDF sys calls.
//! [`bring_up`] is called once from `main()` before the poll loop starts.
//!
//! The register-level helpers below (`set_*`, `host_uart_*`) are the only
//! functions drivers and adapters call; on the host they are inert.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::SystemConfig;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
    UartConfigFailed(i32),
    UartInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LedcTimerFailed(rc)   => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
            Self::UartConfigFailed(rc)  => write!(f, "UART config failed (rc={})", rc),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

// ── Bring-up ──────────────────────────────────────────────────

/// Validate `config`, then configure every peripheral it names.
///
/// Nothing is touched when the configuration is rejected.
pub fn bring_up(config: &SystemConfig) -> crate::error::Result<()> {
    config.validate()?;
    init_peripherals(config.uart_baud)?;
    Ok(())
}

// ── Channel map ───────────────────────────────────────────────

pub const LEDC_TIMER_BUZZER: u32 = 0;
pub const LEDC_TIMER_SERVO: u32 = 1;
pub const LEDC_CH_BUZZER: u32 = 0;
pub const LEDC_CH_SERVO: u32 = 1;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(uart_baud: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the poll loop; single-threaded.
    unsafe {
        init_ledc()?;
        init_uart(uart_baud)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_uart_baud: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: buzzer. Frequency is retuned per tone.
    let buzzer_timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: LEDC_TIMER_BUZZER,
        duty_resolution: pins::BUZZER_PWM_RESOLUTION_BITS,
        freq_hz: pins::BUZZER_IDLE_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&buzzer_timer) };
    if ret != ESP_OK { return Err(HwInitError::LedcTimerFailed(ret)); }

    // Timer 1: servo (50 Hz, 14-bit)
    let servo_timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: LEDC_TIMER_SERVO,
        duty_resolution: pins::SERVO_PWM_RESOLUTION_BITS,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&servo_timer) };
    if ret != ESP_OK { return Err(HwInitError::LedcTimerFailed(ret)); }

    let channels = [
        (LEDC_CH_BUZZER, LEDC_TIMER_BUZZER, pins::BUZZER_GPIO),
        (LEDC_CH_SERVO, LEDC_TIMER_SERVO, pins::SERVO_GPIO),
    ];
    for (channel, timer, gpio) in channels {
        let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel: timer,
            gpio_num: gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        }) };
        if ret != ESP_OK { return Err(HwInitError::LedcChannelFailed(ret)); }
    }

    info!("hw_init: LEDC configured (buzzer=CH0/T0, servo=CH1/T1)");
    Ok(())
}

/// Write a raw duty value to a configured channel.
#[cfg(target_os = "espidf")]
pub fn set_channel_duty(channel: u32, duty: u32) -> Result<(), i32> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    let ret = unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        if ret == ESP_OK {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel)
        } else {
            ret
        }
    };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn set_channel_duty(_channel: u32, _duty: u32) -> Result<(), i32> {
    Ok(())
}

/// Retune a timer's output frequency.
#[cfg(target_os = "espidf")]
pub fn set_timer_freq(timer: u32, freq_hz: u32) -> Result<(), i32> {
    // SAFETY: timer configured in init_ledc(); main-loop only.
    let ret = unsafe { ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, timer, freq_hz) };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn set_timer_freq(_timer: u32, _freq_hz: u32) -> Result<(), i32> {
    Ok(())
}

// ── Host-link UART ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart(baud: u32) -> Result<(), HwInitError> {
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { uart_param_config(pins::HOST_UART_PORT, &cfg) };
    if ret != ESP_OK { return Err(HwInitError::UartConfigFailed(ret)); }

    let ret = unsafe {
        uart_set_pin(
            pins::HOST_UART_PORT,
            pins::UART_TX_GPIO,
            pins::UART_RX_GPIO,
            UART_PIN_NO_CHANGE,
            UART_PIN_NO_CHANGE,
        )
    };
    if ret != ESP_OK { return Err(HwInitError::UartConfigFailed(ret)); }

    // TX buffer 0: writes block until the frame is in the FIFO.
    let ret = unsafe {
        uart_driver_install(
            pins::HOST_UART_PORT,
            pins::UART_RX_BUFFER,
            0,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK { return Err(HwInitError::UartInstallFailed(ret)); }

    info!("hw_init: UART{} at {} baud (tx={}, rx={})",
        pins::HOST_UART_PORT, baud, pins::UART_TX_GPIO, pins::UART_RX_GPIO);
    Ok(())
}

/// Non-blocking read of whatever the RX ring holds. Negative return codes
/// from the driver surface as `Err`.
#[cfg(target_os = "espidf")]
pub fn host_uart_read(buf: &mut [u8]) -> Result<usize, i32> {
    // SAFETY: driver installed in init_uart(); zero tick timeout never blocks.
    let n = unsafe {
        uart_read_bytes(
            pins::HOST_UART_PORT,
            buf.as_mut_ptr().cast(),
            buf.len() as u32,
            0,
        )
    };
    if n < 0 { Err(n) } else { Ok(n as usize) }
}

#[cfg(not(target_os = "espidf"))]
pub fn host_uart_read(_buf: &mut [u8]) -> Result<usize, i32> {
    Ok(0)
}

#[cfg(target_os = "espidf")]
pub fn host_uart_write(data: &[u8]) -> Result<usize, i32> {
    // SAFETY: driver installed in init_uart(); `data` outlives the call.
    let n = unsafe { uart_write_bytes(pins::HOST_UART_PORT, data.as_ptr().cast(), data.len()) };
    if n < 0 { Err(n) } else { Ok(n as usize) }
}

#[cfg(not(target_os = "espidf"))]
pub fn host_uart_write(data: &[u8]) -> Result<usize, i32> {
    Ok(data.len())
}

/// Wait for the TX FIFO to drain (bounded to 100 ticks).
#[cfg(target_os = "espidf")]
pub fn host_uart_flush() -> Result<(), i32> {
    // SAFETY: driver installed in init_uart().
    let ret = unsafe { uart_wait_tx_done(pins::HOST_UART_PORT, 100) };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn host_uart_flush() -> Result<(), i32> {
    Ok(())
}
