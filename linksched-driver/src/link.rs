//! The boundary the core calls across to reach the radio. Both traits are
//! implemented by an external radio collaborator; the core never inspects a
//! `LinkTx`/`LinkRx` implementation's internals, only its pass/fail outcome.

/// Opaque transmit/receive failure. The core counts and logs these (§7); it
/// never retries or inspects the cause.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LinkError;

/// A radio write, performed by the (external) radio collaborator.
pub trait LinkTx {
    /// Sends `frame_bytes` as a single unit. The core does not inspect `Ok`
    /// beyond "the transmit was accepted"; it treats the write as
    /// fire-and-forget (§4.4: "send once, best-effort").
    fn transmit(&mut self, frame_bytes: &[u8]) -> Result<(), LinkError>;

    /// Changes the radio's transmit power. Driven by [`crate::power::PowerCtl`]
    /// when `auto_tx_power` is enabled.
    fn set_tx_power(&mut self, power: crate::power::PowerLevel) -> Result<(), LinkError>;
}

/// A small receive-control record accompanying every frame the radio hands
/// up. The scheduler core forwards `rssi` to [`crate::power::PowerCtl`] and
/// otherwise ignores this record; only `bytes` and the local MAC matter to
/// decoding.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveControl {
    pub rssi_dbm: i32,
    pub channel: u8,
}

/// A subscription the core registers with the radio collaborator to receive
/// raw bytes plus a [`ReceiveControl`] record per frame.
pub trait LinkRx {
    /// Polls for the next received frame without blocking. Returns `None`
    /// when nothing is pending; the core treats this as a normal, frequent
    /// outcome rather than an error.
    fn try_receive(&mut self, buf: &mut [u8]) -> Option<(usize, ReceiveControl)>;
}
