//! Plain async loops binding each `linksched-core`/`linksched-driver`
//! component to an `embassy_time` cadence (§5: "single-threaded cooperative
//! per component"). None of these are `#[embassy_executor::task]` functions
//! themselves — see the module-level doc comment in `lib.rs` for why — the
//! application wraps each one in its own concrete task and spawns it.

use embassy_time::{Duration, Timer};
use rand_core::RngCore;

use linksched_core::{BurstProducer, Clock, PeriodicProducer, Scheduler};
use linksched_driver::{LinkRx, LinkTx, PowerCtl};

use crate::quality::LinkQuality;

/// Drives the scheduler's tick, sleeping `tick_interval_ms` between calls.
/// Grounded on `station_example_main.c`'s fixed-period scheduling loop; here
/// the sleep is a cooperative `Timer::after` instead of a blocking delay.
pub async fn run_scheduler<L: LinkTx>(
    scheduler: &Scheduler<'_>,
    clock: &impl Clock,
    link: &mut L,
    tick_interval_ms: u32,
) -> ! {
    loop {
        scheduler.tick(clock, link).await;
        Timer::after(Duration::from_millis(tick_interval_ms as u64)).await;
    }
}

/// Drives one per-class periodic producer on its own configured period.
pub async fn run_periodic_producer(scheduler: &Scheduler<'_>, clock: &impl Clock, producer: &mut PeriodicProducer) -> ! {
    loop {
        producer.produce_once(scheduler, clock).await;
        Timer::after(Duration::from_millis(producer.period_ms() as u64)).await;
    }
}

/// Drives the burst/jitter producer; the interval to the next sample is
/// recomputed after every submission since it depends on whether the
/// producer is currently inside its burst window (§4.5).
pub async fn run_burst_producer(
    scheduler: &Scheduler<'_>,
    clock: &impl Clock,
    producer: &mut BurstProducer,
    rng: &mut impl RngCore,
) -> ! {
    loop {
        producer.produce_once(scheduler, clock).await;
        let next_ms = producer.next_interval_ms(clock.now_ms(), rng);
        Timer::after(Duration::from_millis(next_ms as u64)).await;
    }
}

/// Polls `link` for received frames without ever blocking the executor:
/// `try_receive` returning `None` is the common case, so the loop yields
/// instead of busy-spinning. Every received frame's `ReceiveControl` is
/// recorded in `quality` for `run_power_ctl` to pick up; `on_frame` gets the
/// raw bytes to hand to a `ReceiverDecoder`.
pub async fn run_receiver<R: LinkRx>(link: &mut R, quality: &LinkQuality, mut on_frame: impl FnMut(&[u8])) -> ! {
    let mut buf = [0u8; linksched_wire::FRAME_CAPACITY];
    loop {
        match link.try_receive(&mut buf) {
            Some((len, control)) => {
                quality.record(control);
                on_frame(&buf[..len]);
            }
            None => {
                embassy_futures::yield_now().await;
            }
        }
    }
}

/// Drives `PowerCtl` on its own configured cadence, consuming whatever
/// `LinkQuality` reading has most recently arrived. Only spawned by the
/// application when `auto_tx_power` is enabled (§4.7); otherwise this
/// component is simply never started.
pub async fn run_power_ctl<L: LinkTx>(
    power: &mut PowerCtl,
    quality: &LinkQuality,
    link: &mut L,
    interval_ms: u32,
) -> ! {
    loop {
        if let Some(reading) = quality.take() {
            power.on_rssi_sample(reading.rssi_dbm, link);
        }
        Timer::after(Duration::from_millis(interval_ms as u64)).await;
    }
}
