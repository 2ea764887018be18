//! Inter-task communication channels

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;
use rover_core::units::Length;
use rover_core::ReadError;

use crate::commands::DriveCommand;

/// Latest drive request, from the telemetry link or navigation
pub static DRIVE_CMD: Signal<CriticalSectionRawMutex, DriveCommand> = Signal::new();

/// Latest rangefinder result, replaced by each measurement
pub static DISTANCE: Signal<CriticalSectionRawMutex, Result<Length, ReadError>> = Signal::new();

/// Motor stops forced by the command timeout since boot
///
/// thumbv6m has no atomic read-modify-write; portable-atomic falls back to
/// a critical section.
pub static FAILSAFE_STOPS: AtomicU32 = AtomicU32::new(0);
