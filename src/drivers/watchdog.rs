//! Poll-loop watchdog.
//!
//! `AppService::tick` never blocks: a tone, a melody or a dispense is a
//! saved deadline, so one loop iteration takes well under a millisecond
//! plus `loop_yield_ms`. If an iteration ever stalls past
//! `watchdog_timeout_ms` (a wedged UART driver, a runaway handler), the
//! ESP-IDF task watchdog panics and the device reboots with the servo
//! gate re-homed to closed by `AppService::start`.
//!
//! `main` arms the watchdog after bring-up succeeds and feeds it once per
//! tick. On the host the watchdog is never armed and feeding is a no-op.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{ESP_OK, esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset};

use log::{info, warn};

pub struct Watchdog {
    timeout_ms: u32,
    armed: bool,
}

impl Watchdog {
    /// Configure the task watchdog for `timeout_ms` and subscribe the
    /// poll-loop task to it.
    ///
    /// A failed subscription is logged and leaves the loop unguarded
    /// rather than stopping the firmware.
    pub fn new(timeout_ms: u32) -> Self {
        let armed = match arm(timeout_ms) {
            Ok(()) => {
                info!("Watchdog: poll loop guarded ({} ms, panic on stall)", timeout_ms);
                true
            }
            Err(rc) => {
                warn!("Watchdog: poll loop unguarded (rc={})", rc);
                false
            }
        };
        Self { timeout_ms, armed }
    }

    /// Record one completed tick.
    pub fn feed(&self) {
        if self.armed {
            reset();
        }
    }

    /// `true` when the poll-loop task is subscribed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

#[cfg(target_os = "espidf")]
fn arm(timeout_ms: u32) -> Result<(), i32> {
    let cfg = esp_task_wdt_config_t {
        timeout_ms,
        idle_core_mask: 0,
        trigger_panic: true,
    };
    // SAFETY: called once from main() before the poll loop.
    let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
    if ret != ESP_OK {
        // Already initialised by the IDF with its own timeout; keep going.
        warn!("Watchdog: reconfigure returned {}", ret);
    }
    // SAFETY: a null handle subscribes the calling task.
    let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
fn arm(_timeout_ms: u32) -> Result<(), i32> {
    // ESP_ERR_NOT_SUPPORTED
    Err(0x106)
}

#[cfg(target_os = "espidf")]
fn reset() {
    // SAFETY: only reached once the calling task is subscribed.
    unsafe {
        esp_task_wdt_reset();
    }
}

#[cfg(not(target_os = "espidf"))]
fn reset() {}
